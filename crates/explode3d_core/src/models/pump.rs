//! Centrifugal pump with BLDC drive
//!
//! The volute housing and mechanical seal stay put; the impeller slides
//! forward, the motor back, and the flange bolts split up and down.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::{add_bolts, BoltCircle};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::registry::AssemblyBuilder;

pub const PART_COUNT: usize = 59;

const HOUSING: u32 = 0x2D3748;
const IMPELLER: u32 = 0x4A5568;
const MOTOR: u32 = 0xE53E3E;
const SEAL: u32 = 0x718096;
const VFD: u32 = 0x48BB78;

const BLADES: usize = 6;
const FINS: usize = 12;

pub fn build(b: &mut AssemblyBuilder<'_>) {
    let motor_offset = Vec3::new(0.0, 0.0, -1.0);
    let impeller_offset = Vec3::new(0.0, 0.0, 1.0);
    let along_z = Quat::from_rotation_x(FRAC_PI_2);

    let housing = Arc::new(b.brushed(HOUSING, 0.85, 0.25));
    b.add_mesh(&Arc::new(Geometry::cylinder(1.0, 1.2, 2.0, 32)), &housing, |p| {
        p.with_component(0).with_name("Housing").rotated(along_z)
    });
    add_bolts(b, BoltCircle::new(Vec3::new(0.0, 0.0, 0.9), Vec3::Z, 1.05, 16), 0, Some(Vec3::new(0.0, 0.5, 0.0)));
    add_bolts(b, BoltCircle::new(Vec3::new(0.0, 0.0, -0.9), Vec3::Z, 1.05, 16), 0, Some(Vec3::new(0.0, -0.5, 0.0)));

    let impeller = Arc::new(Material::new(IMPELLER).with_pbr(0.98, 0.05));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.3, 0.4, 24)), &impeller, |p| {
        p.with_component(1).with_name("Impeller").exploding(impeller_offset)
    });
    let blade = Arc::new(Geometry::cuboid(0.1, 0.7, 0.3));
    for i in 0..BLADES {
        let angle = i as f32 / BLADES as f32 * TAU;
        b.add_mesh(&blade, &impeller, |p| {
            p.with_component(1)
                .at(Vec3::new(angle.cos() * 0.5, 0.0, angle.sin() * 0.5))
                .rotated(Quat::from_rotation_x(FRAC_PI_8) * Quat::from_rotation_y(angle))
                .exploding(impeller_offset)
        });
    }

    let motor = Arc::new(b.brushed(MOTOR, 0.7, 0.35).with_emissive(0x991b1b, 0.2));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.6, 0.6, 1.2, 32)), &motor, |p| {
        p.with_component(2)
            .with_name("BLDC Motor")
            .at(motor_offset)
            .rotated(along_z)
            .exploding(motor_offset)
    });
    let fin = Arc::new(Geometry::cuboid(0.05, 0.8, 0.3));
    for i in 0..FINS {
        let angle = i as f32 / FINS as f32 * TAU;
        b.add_mesh(&fin, &motor, |p| {
            p.with_component(2)
                .at(Vec3::new(angle.cos() * 0.7, 0.0, angle.sin() * 0.7))
                .rotated(Quat::from_rotation_y(angle))
                .exploding(motor_offset)
        });
    }

    let seal = Arc::new(Material::new(SEAL).with_pbr(0.95, 0.05));
    b.add_mesh(&Arc::new(Geometry::torus(0.8, 0.15, 20, 32)), &seal, |p| {
        p.with_component(3).with_name("Mech Seal")
    });

    let vfd_offset = Vec3::new(1.0, 0.5, 0.0);
    let vfd = Arc::new(Material::new(VFD).with_pbr(0.5, 0.6).with_emissive(0x16a34a, 0.4));
    b.add_mesh(&Arc::new(Geometry::cuboid(0.9, 0.7, 0.35)), &vfd, |p| {
        p.with_component(4).with_name("VFD").at(Vec3::new(1.4, 0.5, 0.0)).exploding(vfd_offset)
    });
    let connector = Arc::new(Geometry::cylinder(0.08, 0.08, 0.2, 8));
    let connector_mat = Arc::new(Material::new(0x4a5568).with_pbr(0.8, 0.3));
    for i in 0..4 {
        b.add_mesh(&connector, &connector_mat, |p| {
            p.with_component(4)
                .at(Vec3::new(1.4, 0.25 + i as f32 * 0.15, -0.3))
                .exploding(vfd_offset)
        });
    }
}
