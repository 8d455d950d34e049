//! Primitive geometry and tessellation
//!
//! Every [`Geometry`] is tessellated once, when it is created, into an indexed
//! triangle list. Parts share geometry through `Arc`, so a bolt circle of
//! sixteen bolts carries one tessellated cylinder.
//!
//! Conventions (right-handed, counter-clockwise front faces):
//! - cylinders and cones run along +Y, centered on the origin
//! - tori lie in the XY plane, the tube sweeping around +Z
//! - spheres have their poles on the Y axis

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parametric description of a primitive
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        open_ended: bool,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
}

/// Indexed triangle mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as (min, max); zero box when empty
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut iter = self.positions.iter().map(|p| Vec3::from(*p));
        let Some(first) = iter.next() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
    }

    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

/// An immutable tessellated primitive
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    primitive: Primitive,
    mesh: MeshData,
}

impl Geometry {
    /// Tessellate a primitive
    pub fn new(primitive: Primitive) -> Self {
        let mesh = match primitive {
            Primitive::Cuboid { width, height, depth } => cuboid_mesh(width, height, depth),
            Primitive::Cylinder { radius_top, radius_bottom, height, radial_segments, open_ended } => {
                cylinder_mesh(radius_top, radius_bottom, height, radial_segments.max(3), open_ended)
            }
            Primitive::Sphere { radius, width_segments, height_segments } => {
                sphere_mesh(radius, width_segments.max(3), height_segments.max(2))
            }
            Primitive::Torus { radius, tube, radial_segments, tubular_segments } => {
                torus_mesh(radius, tube, radial_segments.max(3), tubular_segments.max(3))
            }
        };
        Self { primitive, mesh }
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::new(Primitive::Cuboid { width, height, depth })
    }

    /// Capped cylinder (or cone frustum when the radii differ)
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self::new(Primitive::Cylinder { radius_top, radius_bottom, height, radial_segments, open_ended: false })
    }

    /// Open-ended tube of the given length along +Y, used for pipes
    pub fn tube(radius: f32, length: f32, radial_segments: u32) -> Self {
        Self::new(Primitive::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height: length,
            radial_segments,
            open_ended: true,
        })
    }

    /// UV sphere
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::new(Primitive::Sphere { radius, width_segments, height_segments })
    }

    /// Torus in the XY plane
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Self::new(Primitive::Torus { radius, tube, radial_segments, tubular_segments })
    }

    /// The primitive this geometry was built from
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Tessellated triangles
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }
}

fn cuboid_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vec3::new(width, height, depth) * 0.5;
    // (normal, u, v) with u x v == normal
    let faces = [
        (Vec3::X, -Vec3::Z, Vec3::Y),
        (-Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, -Vec3::Z),
        (-Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (-Vec3::Z, -Vec3::X, Vec3::Y),
    ];
    let extent = |axis: Vec3| (axis * axis).dot(half);

    let mut mesh = MeshData::default();
    for (n, u, v) in faces {
        let center = n * extent(n);
        let du = u * extent(u);
        let dv = v * extent(v);
        let a = mesh.push(center - du - dv, n);
        let b = mesh.push(center + du - dv, n);
        let c = mesh.push(center + du + dv, n);
        let d = mesh.push(center - du + dv, n);
        mesh.triangle(a, b, c);
        mesh.triangle(a, c, d);
    }
    mesh
}

fn cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, segments: u32, open_ended: bool) -> MeshData {
    let mut mesh = MeshData::default();
    let half = height * 0.5;
    let slope = if height > 0.0 { (radius_bottom - radius_top) / height } else { 0.0 };

    // Side: one column per segment boundary, seam duplicated
    let mut top = Vec::with_capacity(segments as usize + 1);
    let mut bottom = Vec::with_capacity(segments as usize + 1);
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        let normal = Vec3::new(sin, slope, cos).normalize();
        top.push(mesh.push(Vec3::new(radius_top * sin, half, radius_top * cos), normal));
        bottom.push(mesh.push(Vec3::new(radius_bottom * sin, -half, radius_bottom * cos), normal));
    }
    for i in 0..segments as usize {
        mesh.triangle(top[i], bottom[i], top[i + 1]);
        mesh.triangle(bottom[i], bottom[i + 1], top[i + 1]);
    }

    if !open_ended {
        if radius_top > 0.0 {
            cap(&mut mesh, radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            cap(&mut mesh, radius_bottom, -half, segments, false);
        }
    }
    mesh
}

fn cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, is_top: bool) {
    let normal = if is_top { Vec3::Y } else { -Vec3::Y };
    let center = mesh.push(Vec3::new(0.0, y, 0.0), normal);
    let ring: Vec<u32> = (0..=segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.push(Vec3::new(radius * sin, y, radius * cos), normal)
        })
        .collect();
    for i in 0..segments as usize {
        if is_top {
            mesh.triangle(center, ring[i], ring[i + 1]);
        } else {
            mesh.triangle(center, ring[i + 1], ring[i]);
        }
    }
}

fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let row = (0..=width_segments)
            .map(|ix| {
                let u = ix as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let (sin_theta, cos_theta) = (v * PI).sin_cos();
                let dir = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                mesh.push(dir * radius, dir)
            })
            .collect();
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // Skip the degenerate triangle at each pole
            if iy != 0 {
                mesh.triangle(a, b, d);
            }
            if iy != height_segments as usize - 1 {
                mesh.triangle(b, c, d);
            }
        }
    }
    mesh
}

fn torus_mesh(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push(position, (position - center).normalize_or_zero());
        }
    }

    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            mesh.triangle(a, b, d);
            mesh.triangle(b, c, d);
        }
    }
    mesh
}
