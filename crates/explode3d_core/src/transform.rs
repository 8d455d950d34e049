//! 3D Transform (position, rotation, scale)
//!
//! A Transform3D places a part or mesh inside its parent's coordinate frame.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform with position, rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position in the parent frame
    pub position: Vec3,
    /// Rotation as a unit quaternion
    pub rotation: Quat,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Replace the rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// True when position, rotation and scale are all neutral
    pub fn is_identity(&self) -> bool {
        self.position == Vec3::ZERO && self.rotation.is_near_identity() && self.scale == Vec3::ONE
    }

    /// Transform a point from local space to parent space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.position
    }

    /// Transform a surface normal (inverse-transpose of rotation * scale)
    pub fn transform_normal(&self, n: Vec3) -> Vec3 {
        (self.rotation * (n / self.scale)).normalize_or_zero()
    }

    /// Compose two transforms: result = self * other
    ///
    /// The composed transform applies `other` first, then `self`. Exact for
    /// uniform scale, which is all the assemblies use at part level.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(other.position),
            rotation: (self.rotation * other.rotation).normalize(),
            scale: self.scale * other.scale,
        }
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// TRS matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
