//! Built-in equipment models
//!
//! Each module exposes a `build` function for the registry and the number of
//! parts it declares. Shared fixtures (bolt circles, straight pipes) live here.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::geometry::Geometry;
use crate::material::Material;
use crate::part::{Part, PartMesh};
use crate::registry::{AssemblyBuilder, BuildFn};
use crate::Transform3D;

pub mod cmg;
pub mod ogs;
pub mod pump;
pub mod sarj;
pub mod wpa;

/// Built-in models in catalog order
pub const BUILTIN: &[(&str, BuildFn)] = &[
    ("sarj", sarj::build),
    ("wpa", wpa::build),
    ("pump", pump::build),
    ("cmg", cmg::build),
    ("ogs", ogs::build),
];

/// Part count each built-in model declares
pub fn declared_part_count(id: &str) -> Option<usize> {
    match id {
        "sarj" => Some(sarj::PART_COUNT),
        "wpa" => Some(wpa::PART_COUNT),
        "pump" => Some(pump::PART_COUNT),
        "cmg" => Some(cmg::PART_COUNT),
        "ogs" => Some(ogs::PART_COUNT),
        _ => None,
    }
}

/// Evenly spaced bolts on a circle, bolt shafts along `normal`
#[derive(Clone, Copy, Debug)]
pub struct BoltCircle {
    pub center: Vec3,
    pub normal: Vec3,
    pub radius: f32,
    pub count: usize,
}

impl BoltCircle {
    pub fn new(center: Vec3, normal: Vec3, radius: f32, count: usize) -> Self {
        Self { center, normal, radius, count }
    }

    /// Transform of each bolt, starting at the in-plane X direction
    pub fn placements(&self) -> impl Iterator<Item = Transform3D> + '_ {
        let orient = Quat::from_rotation_arc(Vec3::Y, self.normal.normalize_or(Vec3::Y));
        let u = orient * Vec3::X;
        let v = self.normal.normalize_or(Vec3::Y).cross(u);
        (0..self.count).map(move |i| {
            let angle = i as f32 / self.count as f32 * TAU;
            let position = self.center + (u * angle.cos() + v * angle.sin()) * self.radius;
            Transform3D::from_position_rotation(position, orient)
        })
    }
}

fn bolt_geometry() -> Arc<Geometry> {
    Arc::new(Geometry::cylinder(0.04, 0.04, 0.1, 8))
}

fn bolt_material() -> Arc<Material> {
    Arc::new(Material::new(0x1a202c).with_pbr(0.9, 0.1))
}

/// One part per bolt
pub(crate) fn add_bolts(b: &mut AssemblyBuilder<'_>, circle: BoltCircle, component: usize, offset: Option<Vec3>) {
    let geometry = bolt_geometry();
    let material = bolt_material();
    for placement in circle.placements() {
        let mut part = Part::new(geometry.clone(), material.clone()).with_component(component);
        part.placement = placement;
        if let Some(offset) = offset {
            part = part.exploding(offset);
        }
        b.add(part);
    }
}

/// Bolts as meshes of an enclosing part
pub(crate) fn bolt_meshes(circle: BoltCircle) -> Vec<PartMesh> {
    let geometry = bolt_geometry();
    let material = bolt_material();
    circle
        .placements()
        .map(|placement| PartMesh {
            geometry: geometry.clone(),
            material: material.clone(),
            local: placement,
        })
        .collect()
}

/// Straight static pipe from `start` to `end`
pub(crate) fn add_pipe(b: &mut AssemblyBuilder<'_>, start: Vec3, end: Vec3, material: &Arc<Material>) {
    let span = end - start;
    let geometry = Arc::new(Geometry::tube(0.05, span.length(), 8));
    b.add_mesh(&geometry, material, |p| {
        p.at(start + span * 0.5).rotated(Quat::from_rotation_arc(Vec3::Y, span.normalize_or(Vec3::Y)))
    });
}

/// Point on a circle of `radius` in the XY plane
pub(crate) fn on_xy_circle(angle: f32, radius: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0)
}
