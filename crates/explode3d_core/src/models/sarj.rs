//! SARJ: Solar Alpha Rotary Joint
//!
//! Race ring with a 32-bearing raceway, BAPTA drive motor, lubrication lines
//! and resolver sensors with status LEDs. Everything explodes radially except
//! the ring and the motor, which slides out along +Z.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::on_xy_circle;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::registry::AssemblyBuilder;

pub const PART_COUNT: usize = 98;

const RING: u32 = 0x4A5568;
const BEARING: u32 = 0x718096;
const MOTOR: u32 = 0x2D3748;
const LUBE: u32 = 0xE53E3E;
const RESOLVER: u32 = 0x3182CE;

pub fn build(b: &mut AssemblyBuilder<'_>) {
    let ring = Arc::new(b.brushed(RING, 0.9, 0.2));
    b.add_mesh(&Arc::new(Geometry::torus(3.0, 0.3, 24, 64)), &ring, |p| {
        p.with_component(0).with_name("Race Ring")
    });

    let ball = Arc::new(Geometry::sphere(0.12, 20, 20));
    let ball_mat = Arc::new(Material::new(BEARING).with_pbr(0.95, 0.05));
    let cage = Arc::new(Geometry::torus(0.12, 0.02, 16, 32));
    let cage_mat = Arc::new(Material::new(0x4a5568).with_pbr(0.9, 0.1));
    for i in 0..32 {
        let angle = i as f32 / 32.0 * TAU;
        let offset = on_xy_circle(angle, 0.5);
        let pos = on_xy_circle(angle, 3.0);
        b.add_mesh(&ball, &ball_mat, |p| {
            p.with_component(1).with_name("Bearing").at(pos).exploding(offset)
        });
        b.add_mesh(&cage, &cage_mat, |p| {
            p.with_component(1).at(pos).rotated(Quat::from_rotation_x(FRAC_PI_2)).exploding(offset)
        });
    }

    let motor = Arc::new(b.brushed(MOTOR, 0.7, 0.4));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.8, 0.8, 1.2, 32)), &motor, |p| {
        p.with_component(2)
            .with_name("Motor BAPTA")
            .rotated(Quat::from_rotation_x(FRAC_PI_2))
            .exploding(Vec3::new(0.0, 0.0, 1.8))
    });

    let tube = Arc::new(Geometry::cylinder(0.08, 0.08, 2.5, 16));
    let tube_mat = Arc::new(Material::new(LUBE).with_pbr(0.6, 0.4).with_emissive(0x7f1d1d, 0.1));
    for i in 0..8 {
        let angle = i as f32 / 8.0 * TAU;
        b.add_mesh(&tube, &tube_mat, |p| {
            p.with_component(3)
                .with_name("Lube Line")
                .at(on_xy_circle(angle, 2.5))
                .rotated(Quat::from_rotation_z(angle + FRAC_PI_2))
                .exploding(on_xy_circle(angle, 0.8))
        });
    }

    let sensor = Arc::new(Geometry::cuboid(0.15, 0.15, 0.25));
    let sensor_mat = Arc::new(Material::new(RESOLVER).with_pbr(0.5, 0.6).with_emissive(0x2563eb, 0.3));
    let led = Arc::new(Geometry::sphere(0.03, 16, 16));
    let led_mat = Arc::new(Material::new(0x10b981).with_emissive(0x10b981, 1.5));
    for i in 0..12 {
        let angle = i as f32 / 12.0 * TAU;
        let offset = on_xy_circle(angle, 0.4) + Vec3::new(0.0, 0.0, 0.9);
        let pos = on_xy_circle(angle, 3.2) + Vec3::new(0.0, 0.0, 0.4);
        b.add_mesh(&sensor, &sensor_mat, |p| {
            p.with_component(4).with_name("Resolver").at(pos).exploding(offset)
        });
        b.add_mesh(&led, &led_mat, |p| {
            p.with_component(4).at(Vec3::new(pos.x, pos.y, 0.55)).exploding(offset)
        });
    }
}
