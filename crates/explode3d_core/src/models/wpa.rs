//! WPA: Water Processing Assembly
//!
//! Wastewater tank, centrifugal pump, a three-stage filter column, catalytic
//! reactor and a conductivity sensor on a support rack. The filter column and
//! the plumbing are structural and stay put when exploded.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use super::{add_bolts, add_pipe, bolt_meshes, BoltCircle};
use crate::geometry::Geometry;
use crate::material::Material;
use crate::part::PartMesh;
use crate::registry::AssemblyBuilder;

pub const PART_COUNT: usize = 22;

const TANK: u32 = 0x2C5282;
const PUMP: u32 = 0x4299E1;
const FILTER: u32 = 0x90CDF4;
const REACTOR: u32 = 0x805AD5;
const SENSOR: u32 = 0x38B2AC;

const FILTER_STAGES: usize = 3;

pub fn build(b: &mut AssemblyBuilder<'_>) {
    let tank_offset = Vec3::new(-1.5, 0.0, 0.0);
    let pump_offset = Vec3::new(0.0, 1.5, 0.0);
    let reactor_offset = Vec3::new(1.5, 0.0, 0.0);

    let rack = Arc::new(Material::new(0x1a202c).with_pbr(0.9, 0.15));
    b.add_mesh(&Arc::new(Geometry::cuboid(4.0, 3.5, 1.5)), &rack, |p| {
        p.with_name("Support Rack").at(Vec3::new(0.0, -1.75, 0.0)).scaled(Vec3::new(1.0, 1.0, 0.05))
    });

    let tank = Arc::new(b.brushed(TANK, 0.8, 0.2));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.8, 0.8, 2.8, 32)), &tank, |p| {
        p.with_component(0).with_name("Wastewater Tank").at(tank_offset).exploding(tank_offset)
    });
    // lid bolts
    let lid = BoltCircle::new(tank_offset + Vec3::new(0.0, 1.4, 0.0), Vec3::Y, 0.7, 12);
    add_bolts(b, lid, 0, Some(tank_offset));

    let housing = Arc::new(b.brushed(PUMP, 0.85, 0.15));
    let pump_center = pump_offset + Vec3::new(0.0, 0.0, 0.2);
    b.add_mesh(&Arc::new(Geometry::torus(0.7, 0.2, 16, 32)), &housing, |p| {
        p.with_component(1).with_name("Pump Housing").at(pump_center).exploding(pump_offset)
    });
    let motor = Arc::new(Material::new(0x2563eb).with_pbr(0.7, 0.3).with_emissive(0x1e40af, 0.4));
    b.add_mesh(&Arc::new(Geometry::cylinder(0.3, 0.3, 0.8, 32)), &motor, |p| {
        p.with_component(1)
            .at(pump_center + Vec3::new(0.4, 0.0, 0.0))
            .rotated(Quat::from_rotation_x(FRAC_PI_2))
            .exploding(pump_offset)
    });

    // Filter column: one static part, stage bodies plus their cap bolts
    let stage = Arc::new(Geometry::cylinder(0.4, 0.4, 0.7, 24));
    let stage_mat = Arc::new(Material::new(FILTER).with_pbr(0.5, 0.6).with_opacity(0.8));
    let mut column = Vec::new();
    let mut top_stage_y = 0.0;
    for i in 0..FILTER_STAGES {
        let y = -1.2 + i as f32 * 0.8;
        column.push(PartMesh::new(stage.clone(), stage_mat.clone()).at(Vec3::new(0.0, y, 0.0)));
        column.extend(bolt_meshes(BoltCircle::new(Vec3::new(0.0, y + 0.35, 0.0), Vec3::Y, 0.35, 8)));
        top_stage_y = y;
    }
    b.add_group(column, |p| p.with_component(2).with_name("Filter Stages").at(reactor_offset));

    let reactor = Arc::new(b.brushed(REACTOR, 0.6, 0.3).with_emissive(0x6b21a8, 0.4));
    let reactor_pos = reactor_offset + Vec3::new(0.0, 1.5, 0.0);
    b.add_mesh(&Arc::new(Geometry::sphere(0.7, 32, 32)), &reactor, |p| {
        p.with_component(3).with_name("Catalyst Reactor").at(reactor_pos).exploding(reactor_offset)
    });

    let pipe = Arc::new(Material::new(0xaaaaaa).with_pbr(0.9, 0.1));
    // tank -> pump
    add_pipe(
        b,
        Vec3::new(tank_offset.x, 1.4, 0.4),
        Vec3::new(pump_offset.x - 0.5, pump_offset.y + 0.4, 0.4),
        &pipe,
    );
    // pump -> filters
    add_pipe(
        b,
        Vec3::new(pump_offset.x + 0.5, pump_offset.y + 0.4, 0.4),
        Vec3::new(reactor_offset.x - 0.5, 0.5, 0.4),
        &pipe,
    );
    // filters -> reactor
    add_pipe(
        b,
        Vec3::new(reactor_offset.x, top_stage_y, 0.4),
        Vec3::new(reactor_pos.x, reactor_pos.y - 0.7, 0.4),
        &pipe,
    );

    let sensor = Arc::new(Material::new(SENSOR).with_pbr(0.5, 0.6).with_emissive(0x14b8a6, 0.8));
    b.add_mesh(&Arc::new(Geometry::cuboid(0.3, 0.2, 0.15)), &sensor, |p| {
        p.with_component(4)
            .with_name("Conductivity Sensor")
            .at(tank_offset + Vec3::new(0.0, 1.6, 0.4))
            .exploding(tank_offset)
    });
}
