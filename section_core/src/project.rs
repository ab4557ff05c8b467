//! # Section Projects
//!
//! A `SectionProject` is the saved state of one compound-section study:
//! its components, analysis settings and any user-defined materials.
//! Projects serialize to `.sct` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! SectionProject
//! ├── meta: ProjectMetadata (version, title, engineer, timestamps)
//! ├── settings: AnalysisSettings (arc fidelity, reference material)
//! ├── materials: Vec<Material> (custom materials only)
//! └── components: ComponentList (outline file + material, in order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use section_core::project::SectionProject;
//!
//! let mut project = SectionProject::new("Composite deck", "Jane Engineer");
//! project.add_component("beam.dxf", "steel").unwrap();
//! project.add_component("slab.dxf", "concrete").unwrap();
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("beam.dxf"));
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{analyze_components, PolygonAnalyzer, SectionProperties};
use crate::components::{ComponentList, SectionComponent};
use crate::config::AnalysisSettings;
use crate::errors::SectionResult;
use crate::import::DxfImporter;
use crate::materials::{Material, MaterialRegistry};

/// Current schema version for .sct files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container, serialized to `.sct` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProject {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: AnalysisSettings,

    /// User-defined materials; built-in materials are not stored
    #[serde(default)]
    pub materials: Vec<Material>,

    #[serde(default)]
    pub components: ComponentList,
}

impl SectionProject {
    /// Create an empty project with default settings.
    pub fn new(title: impl Into<String>, engineer: impl Into<String>) -> Self {
        let now = Utc::now();
        SectionProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                title: title.into(),
                engineer: engineer.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            materials: Vec::new(),
            components: ComponentList::new(),
        }
    }

    /// Built-in materials plus this project's custom materials
    pub fn material_registry(&self) -> MaterialRegistry {
        let mut registry = MaterialRegistry::with_defaults();
        for material in &self.materials {
            registry.insert(material.clone());
        }
        registry
    }

    /// Validate and store a custom material. Returns its identifier.
    pub fn register_material(
        &mut self,
        name: &str,
        elastic_modulus_mpa: f64,
        poissons_ratio: f64,
        density_kg_per_mm3: f64,
        yield_strength_mpa: f64,
        color: &str,
    ) -> SectionResult<String> {
        let mut registry = self.material_registry();
        let id = registry.register_custom(
            name,
            elastic_modulus_mpa,
            poissons_ratio,
            density_kg_per_mm3,
            yield_strength_mpa,
            color,
        )?;
        self.materials = registry.custom_materials();
        self.touch();
        Ok(id)
    }

    /// Append a component. The material must be registered.
    pub fn add_component(&mut self, file: impl Into<PathBuf>, material: &str) -> SectionResult<Uuid> {
        self.material_registry().get(material)?;
        let id = self.components.add(SectionComponent::new(file, material));
        self.touch();
        Ok(id)
    }

    /// Remove the component at `index` (0-based).
    pub fn remove_component(&mut self, index: usize) -> SectionResult<SectionComponent> {
        let removed = self.components.remove(index)?;
        self.touch();
        Ok(removed)
    }

    /// Import every component and compute the section properties.
    pub fn analyze(&self) -> SectionResult<SectionProperties> {
        let registry = self.material_registry();
        let importer = DxfImporter::from_settings(&self.settings)?;
        analyze_components(&self.components, &registry, &self.settings, &importer, &PolygonAnalyzer)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for SectionProject {
    fn default() -> Self {
        SectionProject::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub title: String,
    pub engineer: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
