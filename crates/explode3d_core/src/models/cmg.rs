//! CMG: Control Moment Gyroscope
//!
//! Carbon flywheel on an axle inside two gimbal rings. The rotor stack is the
//! static core; torque motors move out radially, the base drops and the
//! electronics box lifts off the front.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::{add_bolts, on_xy_circle, BoltCircle};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::registry::AssemblyBuilder;
use crate::texture::SurfaceDetail;

pub const PART_COUNT: usize = 24;

const ROTOR: u32 = 0x2C5282;
const AXLE: u32 = 0x718096;
const GIMBAL: u32 = 0x4299E1;
const SPIN_MOTOR: u32 = 0xE53E3E;
const TORQUE_MOTOR: u32 = 0xF59E0B;
const ELECTRONICS: u32 = 0x48BB78;

const TORQUE_MOTORS: usize = 4;

pub fn build(b: &mut AssemblyBuilder<'_>) {
    let along_z = Quat::from_rotation_x(FRAC_PI_2);
    let base = Arc::new(Material::new(0x1a202c).with_pbr(0.9, 0.1));

    b.add_mesh(&Arc::new(Geometry::cuboid(4.0, 0.2, 4.0)), &base, |p| {
        p.with_name("Mounting Base").at(Vec3::new(0.0, -2.0, 0.0)).exploding(Vec3::new(0.0, -2.0, 0.0))
    });

    let weave = b.surface(ROTOR, SurfaceDetail::CarbonWeave);
    let rotor = Arc::new(Material::new(ROTOR).with_pbr(0.98, 0.01).with_surface(weave));
    b.add_mesh(&Arc::new(Geometry::cylinder(1.5, 1.5, 0.6, 64)), &rotor, |p| {
        p.with_component(0).with_name("Flywheel").rotated(along_z)
    });
    let hub = Arc::new(Material::new(0xaaaaaa).with_pbr(0.9, 0.1));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.3, 0.8, 32)), &hub, |p| {
        p.with_component(0).rotated(along_z)
    });
    add_bolts(b, BoltCircle::new(Vec3::new(0.0, 0.0, 0.4), Vec3::Z, 0.2, 8), 0, None);

    let axle = Arc::new(Material::new(AXLE).with_pbr(0.9, 0.2));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.3, 3.0, 32)), &axle, |p| {
        p.with_component(1).with_name("Axle").rotated(along_z)
    });

    let gimbal = Arc::new(Material::new(GIMBAL).with_pbr(0.85, 0.2).with_opacity(0.9));
    b.add_mesh(&Arc::new(Geometry::torus(1.7, 0.2, 16, 64)), &gimbal, |p| {
        p.with_component(2).with_name("Inner Gimbal").rotated(along_z)
    });
    b.add_mesh(&Arc::new(Geometry::torus(2.0, 0.15, 16, 64)), &gimbal, |p| {
        p.with_component(2).with_name("Outer Gimbal").rotated(Quat::from_rotation_y(FRAC_PI_2))
    });

    let spin = Arc::new(Material::new(SPIN_MOTOR).with_pbr(0.7, 0.35).with_emissive(0x991b1b, 0.5));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.4, 0.4, 0.5, 32)), &spin, |p| {
        p.with_component(3).with_name("Spin Motor").rotated(along_z)
    });

    let torque = Arc::new(Material::new(TORQUE_MOTOR).with_pbr(0.7, 0.3).with_emissive(0x92400e, 0.3));
    let motor = Arc::new(Geometry::cuboid(0.5, 0.3, 0.3));
    let pin = Arc::new(Geometry::cylinder(0.05, 0.05, 0.4, 8));
    for i in 0..TORQUE_MOTORS {
        let angle = i as f32 / TORQUE_MOTORS as f32 * TAU + FRAC_PI_4;
        let offset = on_xy_circle(angle, 0.7);
        b.add_mesh(&motor, &torque, |p| {
            p.with_component(4)
                .with_name("Torque Motor")
                .at(on_xy_circle(angle, 2.2))
                .rotated(Quat::from_rotation_z(angle + FRAC_PI_2))
                .exploding(offset)
        });
        // mounting pin toward the gimbal
        b.add_mesh(&pin, &base, |p| {
            p.with_component(4)
                .at(on_xy_circle(angle, 2.2 - 0.25))
                .rotated(Quat::from_rotation_z(FRAC_PI_2))
                .exploding(offset)
        });
    }

    let electronics = Arc::new(Material::new(ELECTRONICS).with_pbr(0.5, 0.6).with_emissive(0x16a34a, 0.5));
    b.add_mesh(&Arc::new(Geometry::cuboid(1.2, 0.8, 0.5)), &electronics, |p| {
        p.with_component(5)
            .with_name("IMU & Cntl")
            .at(Vec3::new(0.0, 0.0, 1.5))
            .exploding(Vec3::new(0.0, 0.0, 1.5))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AssemblyRegistry, AssemblySource};
    use crate::texture::FlatTextures;

    #[test]
    fn test_rotor_stack_is_static() {
        let mut registry = AssemblyRegistry::with_builtin_models(Box::new(FlatTextures));
        let cmg = registry.build("cmg").unwrap();
        assert!(cmg.parts().iter().filter(|p| p.component.map_or(false, |c| c <= 3)).all(|p| p.is_static()));
        assert_eq!(cmg.moving_parts().count(), 1 + TORQUE_MOTORS * 2 + 1);
    }

    #[test]
    fn test_flywheel_has_carbon_weave() {
        let mut registry = AssemblyRegistry::with_builtin_models(Box::new(FlatTextures));
        let cmg = registry.build("cmg").unwrap();
        let flywheel = cmg
            .parts()
            .iter()
            .find(|p| p.display_name.as_deref() == Some("Flywheel"))
            .unwrap();
        let surface = flywheel.meshes[0].material.surface.as_ref().unwrap();
        assert_eq!(surface.detail, SurfaceDetail::CarbonWeave);
    }
}
