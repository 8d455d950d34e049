//! Assemblies: one equipment's ordered part list
//!
//! An [`Assembly`] owns its parts exclusively. It carries the whole-assembly
//! yaw driven by auto-rotation and dirty flags the renderer uses to decide
//! what to re-upload.

use bitflags::bitflags;
use glam::{Quat, Vec3};

use crate::part::Part;
use crate::Transform3D;

bitflags! {
    /// What changed since the renderer last consumed the assembly
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        /// Part displacements or assembly yaw changed
        const TRANSFORM = 1 << 0;
        /// Parts, meshes or materials changed (full rebuild)
        const TOPOLOGY = 1 << 1;
        const ALL = Self::TRANSFORM.bits() | Self::TOPOLOGY.bits();
    }
}

/// A built equipment assembly
#[derive(Clone, Debug)]
pub struct Assembly {
    id: String,
    parts: Vec<Part>,
    yaw: f32,
    dirty: DirtyFlags,
}

impl Assembly {
    /// Create an assembly; part ids are renumbered to their index
    pub fn new(id: impl Into<String>, mut parts: Vec<Part>) -> Self {
        for (index, part) in parts.iter_mut().enumerate() {
            part.id = index;
        }
        Self {
            id: id.into(),
            parts,
            yaw: 0.0,
            dirty: DirtyFlags::ALL,
        }
    }

    /// Registry id this assembly was built from
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Mutable parts; marks transforms dirty
    pub fn parts_mut(&mut self) -> &mut [Part] {
        self.dirty |= DirtyFlags::TRANSFORM;
        &mut self.parts
    }

    /// Part by id
    pub fn part(&self, id: usize) -> Option<&Part> {
        self.parts.get(id)
    }

    /// Number of parts
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Total number of meshes across all parts
    pub fn mesh_count(&self) -> usize {
        self.parts.iter().map(|p| p.meshes.len()).sum()
    }

    /// Parts that move when exploded
    pub fn moving_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| !p.is_static())
    }

    /// Accumulated auto-rotation around +Y (radians)
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        if yaw != self.yaw {
            self.yaw = yaw;
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }

    /// Assembly-to-world transform (origin, yaw only)
    pub fn world_transform(&self) -> Transform3D {
        Transform3D::from_position_rotation(Vec3::ZERO, Quat::from_rotation_y(self.yaw))
    }

    /// Current displacement of every part, in part order
    pub fn displacements(&self) -> Vec<Vec3> {
        self.parts.iter().map(Part::displacement).collect()
    }

    /// Apply displacements produced by a step function; returns whether any changed
    ///
    /// Extra entries are ignored, missing entries leave parts untouched.
    pub fn apply_displacements(&mut self, displacements: &[Vec3]) -> bool {
        let mut changed = false;
        for (part, &d) in self.parts.iter_mut().zip(displacements) {
            if part.displacement() != d {
                part.set_displacement(d);
                changed |= part.displacement() == d;
            }
        }
        if changed {
            self.dirty |= DirtyFlags::TRANSFORM;
        }
        changed
    }

    /// Put every part back at its assembled position and clear the yaw
    pub fn reset_pose(&mut self) {
        for part in &mut self.parts {
            part.reset_displacement();
        }
        self.yaw = 0.0;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Independent copy in the assembled pose
    ///
    /// Part state is copied; immutable geometry and materials stay shared.
    pub fn assembled_snapshot(&self) -> Assembly {
        let mut snapshot = self.clone();
        snapshot.reset_pose();
        snapshot.dirty = DirtyFlags::ALL;
        snapshot
    }

    /// True when every part is within `epsilon` of its assembled position
    pub fn is_assembled(&self, epsilon: f32) -> bool {
        self.parts.iter().all(|p| p.displacement().length() <= epsilon)
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }
}
