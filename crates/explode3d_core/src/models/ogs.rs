//! OGS: Oxygen Generation System
//!
//! Electrolyzer module with a PEM cell stack, gas separator, finned heat
//! exchanger, pressure regulator and gas sensors inside a translucent frame.
//! O2 and H2 plumbing is routed between fixed endpoints and never moves.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6};
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::{add_bolts, add_pipe, BoltCircle};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::part::PartMesh;
use crate::registry::AssemblyBuilder;

pub const PART_COUNT: usize = 37;

const MODULE: u32 = 0x2C5282;
const PEM: u32 = 0x4299E1;
const SEPARATOR: u32 = 0x90CDF4;
const EXCHANGER: u32 = 0x38B2AC;
const REGULATOR: u32 = 0x48BB78;
const SENSOR: u32 = 0xF59E0B;

const PEM_CELLS: usize = 12;
const EXCHANGER_FINS: usize = 20;
const GAS_SENSORS: usize = 3;

pub fn build(b: &mut AssemblyBuilder<'_>) {
    let electrolyzer = Vec3::new(0.0, 0.5, 0.0);
    let exchanger_pos = Vec3::new(0.0, -1.5, 0.0);

    let frame = Arc::new(Material::new(0x1a202c).with_pbr(0.9, 0.1).with_opacity(0.1));
    b.add_mesh(&Arc::new(Geometry::cuboid(3.0, 3.5, 1.8)), &frame, |p| {
        p.with_name("Protective Frame").scaled(Vec3::splat(1.05))
    });

    let module = Arc::new(b.brushed(MODULE, 0.8, 0.4));
    b.add_mesh(&Arc::new(Geometry::cuboid(2.5, 1.5, 1.5)), &module, |p| {
        p.with_component(0).with_name("Electrolyzer Module").at(electrolyzer).exploding(electrolyzer)
    });
    add_bolts(b, BoltCircle::new(Vec3::new(-1.0, 1.0, 0.75), Vec3::Z, 0.1, 4), 0, Some(electrolyzer));

    let cell = Arc::new(Geometry::cuboid(1.0, 1.0, 0.05));
    let cell_mat = Arc::new(
        Material::new(PEM)
            .with_pbr(0.6, 0.3)
            .with_opacity(0.8)
            .with_emissive(0x4299e1, 0.1),
    );
    let cells = (0..PEM_CELLS)
        .map(|i| PartMesh::new(cell.clone(), cell_mat.clone()).at(Vec3::new(0.0, 0.0, -0.6 + i as f32 * 0.1)))
        .collect();
    b.add_group(cells, |p| {
        p.with_component(1)
            .with_name("PEM Stack")
            .at(Vec3::new(1.25, 0.5, 0.0))
            .rotated(Quat::from_rotation_y(FRAC_PI_2))
            .exploding(Vec3::new(1.5, 0.5, 0.0))
    });

    let separator = Arc::new(b.brushed(SEPARATOR, 0.7, 0.5));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.7, 1.2, 32)), &separator, |p| {
        p.with_component(2)
            .with_name("Gas Separator")
            .at(Vec3::new(-1.0, 2.0, -0.5))
            .rotated(Quat::from_rotation_x(-FRAC_PI_6))
            .exploding(Vec3::new(-1.0, 1.5, -0.5))
    });

    let exchanger = Arc::new(b.brushed(EXCHANGER, 0.9, 0.1));
    b.add_mesh(&Arc::new(Geometry::cuboid(2.0, 0.5, 1.5)), &exchanger, |p| {
        p.with_component(3).with_name("Heat Exchanger").at(exchanger_pos).exploding(exchanger_pos)
    });
    let fin = Arc::new(Geometry::cuboid(0.02, 0.5, 1.3));
    for i in 0..EXCHANGER_FINS {
        b.add_mesh(&fin, &exchanger, |p| {
            p.with_component(3)
                .at(Vec3::new(-0.95 + i as f32 * 0.1, exchanger_pos.y, 0.0))
                .exploding(exchanger_pos)
        });
    }

    let regulator_pos = Vec3::new(-1.0, 0.0, 0.8);
    let regulator = Arc::new(Material::new(REGULATOR).with_pbr(0.7, 0.3).with_emissive(0x16a34a, 0.3));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.3, 0.5, 32)), &regulator, |p| {
        p.with_component(4).with_name("Regulator").at(regulator_pos).exploding(regulator_pos)
    });

    let sensor = Arc::new(Geometry::cuboid(0.15, 0.15, 0.15));
    let sensor_mat = Arc::new(Material::new(SENSOR).with_pbr(0.5, 0.6).with_emissive(0xf59e0b, 0.5));
    for i in 0..GAS_SENSORS {
        let pos = Vec3::new(-0.5 + i as f32 * 0.5, 1.0, 0.8);
        b.add_mesh(&sensor, &sensor_mat, |p| {
            p.with_component(5)
                .with_name(format!("Gas Sensor {}", i + 1))
                .at(pos)
                .exploding(pos)
        });
    }

    let o2 = Arc::new(Material::new(0x3182ce).with_pbr(0.9, 0.1));
    // separator outlet riser
    add_pipe(b, Vec3::new(-1.0, 2.6, -0.5), Vec3::new(-1.0, 2.9, -0.5), &o2);
    // riser down to the exchanger
    add_pipe(b, Vec3::new(-1.0, 2.9, -0.5), Vec3::new(0.0, -1.2, 0.6), &o2);
    // exchanger to regulator
    add_pipe(b, Vec3::new(0.0, -1.2, 0.4), Vec3::new(-1.0, 0.3, 0.8), &o2);

    let h2 = Arc::new(Material::new(0xe53e3e).with_pbr(0.9, 0.1));
    add_pipe(b, Vec3::new(-1.0, 1.4, -0.5), Vec3::new(-1.5, 0.9, -1.0), &h2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AssemblyRegistry, AssemblySource};
    use crate::texture::FlatTextures;

    #[test]
    fn test_pipes_and_frame_are_static() {
        let mut registry = AssemblyRegistry::with_builtin_models(Box::new(FlatTextures));
        let ogs = registry.build("ogs").unwrap();
        let statics = ogs.parts().iter().filter(|p| p.is_static()).count();
        // frame + 4 pipes
        assert_eq!(statics, 5);
    }

    #[test]
    fn test_h2_pipe_is_not_degenerate() {
        let mut registry = AssemblyRegistry::with_builtin_models(Box::new(FlatTextures));
        let ogs = registry.build("ogs").unwrap();
        let h2 = ogs.parts().last().unwrap();
        let bounds = h2.meshes[0].geometry.mesh().bounds();
        let length = bounds.1.y - bounds.0.y;
        let expected = (Vec3::new(-1.5, 0.9, -1.0) - Vec3::new(-1.0, 1.4, -0.5)).length();
        assert!((length - expected).abs() < 1e-4);
    }

    #[test]
    fn test_sensor_names_are_numbered() {
        let mut registry = AssemblyRegistry::with_builtin_models(Box::new(FlatTextures));
        let ogs = registry.build("ogs").unwrap();
        let names: Vec<_> = ogs
            .parts()
            .iter()
            .filter(|p| p.component == Some(5))
            .filter_map(|p| p.display_name.clone())
            .collect();
        assert_eq!(names, vec!["Gas Sensor 1", "Gas Sensor 2", "Gas Sensor 3"]);
    }
}
