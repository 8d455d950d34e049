//! Procedural surface-detail textures
//!
//! Assemblies ask a [`TextureProvider`] for detail images (brushed metal
//! speckle, carbon weave). The provider owns its random source, so a seeded
//! provider yields the same pixels on every run.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// Style of generated surface detail
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceDetail {
    /// Base color with random light/dark speckles and faint scratches
    BrushedMetal,
    /// Dark square weave grid
    CarbonWeave,
}

impl SurfaceDetail {
    /// Square image size generated for this style
    pub fn resolution(self) -> u32 {
        match self {
            SurfaceDetail::BrushedMetal => 512,
            SurfaceDetail::CarbonWeave => 256,
        }
    }
}

/// RGBA8 image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PixelBuffer {
    /// Create an image filled with one color
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); `None` outside the image
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Raw pixels, row-major
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Tightly packed RGBA bytes (for GPU upload)
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Overwrite a pixel, ignoring out-of-bounds coordinates
    pub fn set(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Alpha-blend `rgb` over a pixel with coverage `alpha`
    pub fn blend(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let dst = &mut self.pixels[i];
        for c in 0..3 {
            let mixed = dst[c] as f32 * (1.0 - alpha) + rgb[c] as f32 * alpha;
            dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }
}

/// Supplies surface-detail images for materials
pub trait TextureProvider {
    /// Generate a detail image for `base` in the given style
    fn surface_detail(&mut self, base: Color, detail: SurfaceDetail) -> Arc<PixelBuffer>;
}

const SPECKLE_COUNT: usize = 5000;
const SCRATCH_COUNT: usize = 20;
const SCRATCH_ALPHA: f32 = 0.1;
const WEAVE_BASE: [u8; 4] = [0x1a, 0x1a, 0x1a, 255];
const WEAVE_LINE: [u8; 4] = [0x2a, 0x2a, 0x2a, 255];
const WEAVE_PITCH: usize = 8;

/// Canvas-style procedural generator backed by a `StdRng`
pub struct ProceduralTextures {
    rng: StdRng,
}

impl ProceduralTextures {
    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is configured, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    fn brushed_metal(&mut self, base: Color) -> PixelBuffer {
        let size = SurfaceDetail::BrushedMetal.resolution();
        let mut image = PixelBuffer::filled(size, size, base.to_rgba8());
        let extent = size as f32;

        for _ in 0..SPECKLE_COUNT {
            let x = self.rng.gen_range(0.0..extent) as i64;
            let y = self.rng.gen_range(0.0..extent) as i64;
            let brightness: f32 = self.rng.gen_range(-25.0..25.0);
            let shade = if brightness > 0.0 { [255; 3] } else { [0; 3] };
            let alpha = brightness.abs() / 100.0;
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                image.blend(x + dx, y + dy, shade, alpha);
            }
        }

        for _ in 0..SCRATCH_COUNT {
            let from = (self.rng.gen_range(0.0..extent), self.rng.gen_range(0.0..extent));
            let to = (self.rng.gen_range(0.0..extent), self.rng.gen_range(0.0..extent));
            draw_line(&mut image, from, to, [255; 3], SCRATCH_ALPHA);
        }
        image
    }
}

impl Default for ProceduralTextures {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl TextureProvider for ProceduralTextures {
    fn surface_detail(&mut self, base: Color, detail: SurfaceDetail) -> Arc<PixelBuffer> {
        let image = match detail {
            SurfaceDetail::BrushedMetal => self.brushed_metal(base),
            SurfaceDetail::CarbonWeave => carbon_weave(),
        };
        Arc::new(image)
    }
}

/// Weave is deterministic: a 2-px grid line every 8 px over a dark fill
fn carbon_weave() -> PixelBuffer {
    let size = SurfaceDetail::CarbonWeave.resolution();
    let mut image = PixelBuffer::filled(size, size, WEAVE_BASE);
    for line in (0..size as i64).step_by(WEAVE_PITCH) {
        for along in 0..size as i64 {
            for across in [line - 1, line] {
                image.set(across, along, WEAVE_LINE);
                image.set(along, across, WEAVE_LINE);
            }
        }
    }
    image
}

/// DDA line, one blended pixel per step
fn draw_line(image: &mut PixelBuffer, from: (f32, f32), to: (f32, f32), rgb: [u8; 3], alpha: f32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (from.0 + dx * t).floor() as i64;
        let y = (from.1 + dy * t).floor() as i64;
        image.blend(x, y, rgb, alpha);
    }
}

/// Provider that returns a flat image of the base color, for headless tests
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTextures;

impl TextureProvider for FlatTextures {
    fn surface_detail(&mut self, base: Color, _detail: SurfaceDetail) -> Arc<PixelBuffer> {
        Arc::new(PixelBuffer::filled(1, 1, base.to_rgba8()))
    }
}
