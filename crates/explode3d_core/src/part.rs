//! Parts: the animated unit of an assembly
//!
//! A [`Part`] is one or more meshes placed by an assembled transform
//! (`placement`). The explode animation never touches the placement; it moves
//! the part by a separate `displacement`, which is zero in the assembled pose.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::geometry::Geometry;
use crate::material::Material;
use crate::Transform3D;

/// How a part behaves when the assembly explodes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartMotion {
    /// Structural part (frame, rack, manifold) that never moves
    Static,
    /// Moves toward `rest_offset * k` when exploded
    Exploding { rest_offset: Vec3 },
}

/// One renderable mesh inside a part
#[derive(Clone, Debug)]
pub struct PartMesh {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
    /// Placement relative to the owning part
    pub local: Transform3D,
}

impl PartMesh {
    /// Mesh at the part's origin
    pub fn new(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self {
            geometry,
            material,
            local: Transform3D::identity(),
        }
    }

    /// Mesh offset inside the part
    pub fn at(mut self, position: Vec3) -> Self {
        self.local.position = position;
        self
    }

    /// Rotate the mesh inside the part
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.local.rotation = rotation;
        self
    }
}

/// A component of an assembly
#[derive(Clone, Debug)]
pub struct Part {
    /// Index within the owning assembly, assigned when the part is added
    pub id: usize,
    /// Label shown for the part (e.g. "Motor BAPTA")
    pub display_name: Option<String>,
    /// Index into the catalog's component list; `None` for structural parts
    pub component: Option<usize>,
    /// Assembled transform in the assembly frame
    pub placement: Transform3D,
    pub motion: PartMotion,
    pub meshes: Vec<PartMesh>,
    displacement: Vec3,
}

impl Part {
    /// Static part with a single mesh
    pub fn new(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self::from_meshes(vec![PartMesh::new(geometry, material)])
    }

    /// Static part made of several meshes
    pub fn from_meshes(meshes: Vec<PartMesh>) -> Self {
        Self {
            id: 0,
            display_name: None,
            component: None,
            placement: Transform3D::identity(),
            motion: PartMotion::Static,
            meshes,
            displacement: Vec3::ZERO,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the catalog component index
    pub fn with_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    /// Set the assembled position
    pub fn at(mut self, position: Vec3) -> Self {
        self.placement.position = position;
        self
    }

    /// Set the assembled rotation
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.placement.rotation = rotation;
        self
    }

    /// Set a non-uniform scale on the assembled transform
    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.placement.scale = scale;
        self
    }

    /// Give the part an explosion offset
    pub fn exploding(mut self, rest_offset: Vec3) -> Self {
        self.motion = PartMotion::Exploding { rest_offset };
        self
    }

    /// Explosion offset, `None` for static parts
    pub fn rest_offset(&self) -> Option<Vec3> {
        match self.motion {
            PartMotion::Static => None,
            PartMotion::Exploding { rest_offset } => Some(rest_offset),
        }
    }

    /// True when the part can never leave its assembled position
    pub fn is_static(&self) -> bool {
        self.rest_offset().map_or(true, |offset| offset == Vec3::ZERO)
    }

    /// Current offset from the assembled position
    pub fn displacement(&self) -> Vec3 {
        self.displacement
    }

    /// Move the part relative to its assembled position; ignored for static parts
    pub fn set_displacement(&mut self, displacement: Vec3) {
        if !matches!(self.motion, PartMotion::Static) {
            self.displacement = displacement;
        }
    }

    /// Return to the assembled position
    pub fn reset_displacement(&mut self) {
        self.displacement = Vec3::ZERO;
    }

    /// Transform at the current animation state
    pub fn live_transform(&self) -> Transform3D {
        let mut transform = self.placement;
        transform.translate(self.displacement);
        transform
    }

    /// Live position in the assembly frame
    pub fn position(&self) -> Vec3 {
        self.placement.position + self.displacement
    }
}
