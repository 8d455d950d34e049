//! Surface materials
//!
//! Metallic/roughness materials with emission and optional transparency.
//! Colors are authored in sRGB (hex literals) and converted to linear space
//! by the renderer and the exporter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::texture::{PixelBuffer, SurfaceDetail};

/// An sRGB color with components in 0.0-1.0
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from sRGB components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Quantize to 8-bit sRGB
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), 255]
    }

    /// Convert to linear RGB
    pub fn to_linear(self) -> [f32; 3] {
        [srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b)]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A generated surface-detail image attached to a material
#[derive(Clone, Debug)]
pub struct SurfaceTexture {
    pub detail: SurfaceDetail,
    pub pixels: Arc<PixelBuffer>,
}

/// PBR material with metallic/roughness parameters
#[derive(Clone, Debug)]
pub struct Material {
    /// Base color (sRGB)
    pub base_color: Color,
    /// 0.0 = dielectric, 1.0 = metal
    pub metalness: f32,
    /// 0.0 = mirror, 1.0 = fully diffuse
    pub roughness: f32,
    /// Emitted color (sRGB)
    pub emissive: Color,
    /// Multiplier applied to `emissive`
    pub emissive_intensity: f32,
    /// Alpha, only honored when `transparent` is set
    pub opacity: f32,
    pub transparent: bool,
    pub surface: Option<SurfaceTexture>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            surface: None,
        }
    }
}

impl Material {
    /// Opaque material with the given `0xRRGGBB` base color
    pub fn new(hex: u32) -> Self {
        Self {
            base_color: Color::from_hex(hex),
            ..Self::default()
        }
    }

    /// Set metalness and roughness
    pub fn with_pbr(mut self, metalness: f32, roughness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Set the emissive color and its intensity
    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = Color::from_hex(hex);
        self.emissive_intensity = intensity.max(0.0);
        self
    }

    /// Make the material transparent with the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Attach a surface-detail texture
    pub fn with_surface(mut self, surface: SurfaceTexture) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Effective alpha
    pub fn alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }

    /// Linear emissive radiance (color times intensity)
    pub fn emission(&self) -> [f32; 3] {
        let [r, g, b] = self.emissive.to_linear();
        let k = self.emissive_intensity;
        [r * k, g * k, b * k]
    }

    /// True when the material emits any light
    pub fn is_emissive(&self) -> bool {
        self.emission().iter().any(|c| *c > 0.0)
    }
}
