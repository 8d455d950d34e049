//! Assembly registry
//!
//! Maps assembly ids to builder functions. Every `build` call runs the builder
//! from scratch, so two builds never share mutable part state.

use std::fmt;
use std::sync::Arc;

use crate::assembly::Assembly;
use crate::geometry::Geometry;
use crate::material::{Color, Material, SurfaceTexture};
use crate::models;
use crate::part::{Part, PartMesh};
use crate::texture::{ProceduralTextures, SurfaceDetail, TextureProvider};

/// Error type for assembly lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No builder registered under this id
    NotFound(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "Assembly not found: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Anything that can produce a fresh [`Assembly`] for an id
pub trait AssemblySource {
    /// Build a new, independent assembly
    fn build(&mut self, id: &str) -> Result<Assembly, RegistryError>;

    /// Whether `build(id)` can succeed
    fn contains(&self, id: &str) -> bool;
}

/// Function that adds an assembly's parts to a builder
pub type BuildFn = fn(&mut AssemblyBuilder<'_>);

/// Collects parts while a builder function runs
pub struct AssemblyBuilder<'a> {
    parts: Vec<Part>,
    textures: &'a mut dyn TextureProvider,
}

impl<'a> AssemblyBuilder<'a> {
    pub fn new(textures: &'a mut dyn TextureProvider) -> Self {
        Self {
            parts: Vec::new(),
            textures,
        }
    }

    /// Add a part; returns its id
    pub fn add(&mut self, part: Part) -> usize {
        let id = self.parts.len();
        self.parts.push(part);
        id
    }

    /// Add a single-mesh part built from shared geometry and material
    pub fn add_mesh(&mut self, geometry: &Arc<Geometry>, material: &Arc<Material>, configure: impl FnOnce(Part) -> Part) -> usize {
        self.add(configure(Part::new(geometry.clone(), material.clone())))
    }

    /// Add a part made of several meshes
    pub fn add_group(&mut self, meshes: Vec<PartMesh>, configure: impl FnOnce(Part) -> Part) -> usize {
        self.add(configure(Part::from_meshes(meshes)))
    }

    /// Request a surface-detail texture tinted by `hex`
    pub fn surface(&mut self, hex: u32, detail: SurfaceDetail) -> SurfaceTexture {
        SurfaceTexture {
            detail,
            pixels: self.textures.surface_detail(Color::from_hex(hex), detail),
        }
    }

    /// Metallic material with a brushed-metal detail texture in its own color
    pub fn brushed(&mut self, hex: u32, metalness: f32, roughness: f32) -> Material {
        let surface = self.surface(hex, SurfaceDetail::BrushedMetal);
        Material::new(hex).with_pbr(metalness, roughness).with_surface(surface)
    }

    /// Number of parts added so far
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn finish(self, id: impl Into<String>) -> Assembly {
        Assembly::new(id, self.parts)
    }
}

/// Registry of assembly builders behind a texture provider
pub struct AssemblyRegistry {
    builders: Vec<(String, BuildFn)>,
    textures: Box<dyn TextureProvider>,
}

impl AssemblyRegistry {
    /// Empty registry
    pub fn new(textures: Box<dyn TextureProvider>) -> Self {
        Self {
            builders: Vec::new(),
            textures,
        }
    }

    /// Registry with the built-in equipment models
    pub fn with_builtin_models(textures: Box<dyn TextureProvider>) -> Self {
        let mut registry = Self::new(textures);
        for (id, build) in models::BUILTIN {
            registry.register(*id, *build);
        }
        registry
    }

    /// Built-in models with a seeded (or entropy-seeded) procedural texture source
    pub fn builtin(seed: Option<u64>) -> Self {
        Self::with_builtin_models(Box::new(ProceduralTextures::from_seed_option(seed)))
    }

    /// Register a builder, replacing any existing builder with the same id
    pub fn register(&mut self, id: impl Into<String>, build: BuildFn) {
        let id = id.into();
        match self.builders.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = build,
            None => self.builders.push((id, build)),
        }
    }

    /// Registered ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.builders.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl AssemblySource for AssemblyRegistry {
    fn build(&mut self, id: &str) -> Result<Assembly, RegistryError> {
        let build = self
            .builders
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, build)| *build)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let mut builder = AssemblyBuilder::new(self.textures.as_mut());
        build(&mut builder);
        let assembly = builder.finish(id);
        log::debug!("Built assembly '{}' with {} parts", id, assembly.part_count());
        Ok(assembly)
    }

    fn contains(&self, id: &str) -> bool {
        self.builders.iter().any(|(existing, _)| existing == id)
    }
}
