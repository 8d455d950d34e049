//! Equipment catalog
//!
//! Descriptive data for each assembly (name, specs, components, known issues),
//! loaded from RON. The built-in catalog ships inside the crate; a catalog on
//! disk can replace it.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::material::Color;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.ron");

/// One entry in an assembly's component list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub name: String,
    pub detail: String,
    /// Swatch color as `#RRGGBB`
    pub color: String,
}

impl ComponentInfo {
    /// Parsed swatch color, `None` if malformed
    pub fn swatch(&self) -> Option<Color> {
        Color::parse_hex(&self.color)
    }
}

/// Descriptive data for one assembly
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssemblyInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub weight: String,
    pub power: String,
    #[serde(default)]
    pub components: Vec<ComponentInfo>,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl AssemblyInfo {
    /// Component by the index parts carry
    pub fn component(&self, index: usize) -> Option<&ComponentInfo> {
        self.components.get(index)
    }
}

/// Ordered list of assemblies
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub assemblies: Vec<AssemblyInfo>,
}

impl Catalog {
    /// The catalog bundled with the crate
    pub fn builtin() -> Self {
        match Self::from_ron_str(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Bundled catalog is invalid: {}", e);
                Self::default()
            }
        }
    }

    /// Load a catalog from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, CatalogError> {
        let catalog = ron::from_str(contents)?;
        Ok(catalog)
    }

    /// Entry by assembly id
    pub fn get(&self, id: &str) -> Option<&AssemblyInfo> {
        self.assemblies.iter().find(|a| a.id == id)
    }

    /// Assembly ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.assemblies.iter().map(|a| a.id.as_str())
    }

    /// Index of an id in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.assemblies.iter().position(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssemblyInfo> {
        self.assemblies.iter()
    }

    pub fn len(&self) -> usize {
        self.assemblies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}

/// Error loading a catalog
#[derive(Debug)]
pub enum CatalogError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for CatalogError {
    fn from(e: io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<ron::error::SpannedError> for CatalogError {
    fn from(e: ron::error::SpannedError) -> Self {
        CatalogError::Parse(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "IO error: {}", e),
            CatalogError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}
