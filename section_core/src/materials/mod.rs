//! # Materials Registry
//!
//! Material definitions for compound sections. Each component of a section is
//! assigned a material; the elastic modulus weights its contribution to the
//! section properties and the reference material transforms the results.
//!
//! Units follow the drawing convention (N, mm):
//!
//! - Elastic modulus and yield strength in MPa (N/mm²)
//! - Density in kg/mm³
//!
//! ## Example
//!
//! ```rust
//! use section_core::materials::MaterialRegistry;
//!
//! let mut registry = MaterialRegistry::with_defaults();
//! let steel = registry.get("steel").unwrap();
//! assert_eq!(steel.elastic_modulus_mpa, 210e3);
//!
//! let id = registry
//!     .register_custom("Stainless 316", 193e3, 0.3, 8.0e-6, 205.0, "silver")
//!     .unwrap();
//! assert_eq!(id, "stainless_316");
//! ```

pub mod defaults;

pub use defaults::default_materials;

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// Physical constants of one material. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name (e.g. "Steel")
    pub name: String,
    /// Elastic modulus E (MPa)
    pub elastic_modulus_mpa: f64,
    /// Poisson's ratio ν
    pub poissons_ratio: f64,
    /// Density ρ (kg/mm³)
    pub density_kg_per_mm3: f64,
    /// Yield strength fy (MPa)
    pub yield_strength_mpa: f64,
    /// Display colour name used when drawing the section
    pub color: String,
}

impl Material {
    /// Create a material, validating its constants.
    ///
    /// # Errors
    /// `InvalidInput` when the name is blank, `E <= 0`, `ν` outside `[0, 0.5)`,
    /// or density/yield strength negative or non-finite.
    pub fn new(
        name: impl Into<String>,
        elastic_modulus_mpa: f64,
        poissons_ratio: f64,
        density_kg_per_mm3: f64,
        yield_strength_mpa: f64,
        color: impl Into<String>,
    ) -> SectionResult<Self> {
        let material = Material {
            name: name.into(),
            elastic_modulus_mpa,
            poissons_ratio,
            density_kg_per_mm3,
            yield_strength_mpa,
            color: color.into(),
        };
        material.validate()?;
        Ok(material)
    }

    fn validate(&self) -> SectionResult<()> {
        if self.name.trim().is_empty() {
            return Err(SectionError::invalid_input("name", "\"\"", "Material name cannot be empty"));
        }
        if !(self.elastic_modulus_mpa > 0.0) || !self.elastic_modulus_mpa.is_finite() {
            return Err(SectionError::invalid_input(
                "elastic_modulus_mpa",
                self.elastic_modulus_mpa.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        if !(0.0..0.5).contains(&self.poissons_ratio) {
            return Err(SectionError::invalid_input(
                "poissons_ratio",
                self.poissons_ratio.to_string(),
                "Poisson's ratio must be in [0, 0.5)",
            ));
        }
        if !(self.density_kg_per_mm3 >= 0.0) || !self.density_kg_per_mm3.is_finite() {
            return Err(SectionError::invalid_input(
                "density_kg_per_mm3",
                self.density_kg_per_mm3.to_string(),
                "Density cannot be negative",
            ));
        }
        if !(self.yield_strength_mpa >= 0.0) || !self.yield_strength_mpa.is_finite() {
            return Err(SectionError::invalid_input(
                "yield_strength_mpa",
                self.yield_strength_mpa.to_string(),
                "Yield strength cannot be negative",
            ));
        }
        Ok(())
    }

    /// Normalized registry identifier for this material's name
    pub fn id(&self) -> String {
        normalize_id(&self.name)
    }

    /// Density in kg/m³
    pub fn density_kg_per_m3(&self) -> f64 {
        self.density_kg_per_mm3 * 1e9
    }

    /// Bulleted summary of the material constants
    pub fn properties_text(&self) -> String {
        use crate::report::format_thousands;

        [
            format!("• Name: {}", self.name),
            format!("• Elastic Modulus: {} MPa", format_thousands(self.elastic_modulus_mpa, 2)),
            format!("• Poisson's Ratio: {:.3}", self.poissons_ratio),
            format!("• Density: {} kg/m³", format_thousands(self.density_kg_per_m3(), 3)),
            format!("• Yield Strength: {} MPa", format_thousands(self.yield_strength_mpa, 2)),
        ]
        .join("\n")
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Registry identifier for a material name: trimmed, lowercase, spaces to underscores.
pub fn normalize_id(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Ordered mapping from identifier to [`Material`].
///
/// Identifiers are normalized with [`normalize_id`]; lookups accept any
/// spelling that normalizes to a registered identifier. Registering an
/// existing identifier replaces its material in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRegistry {
    entries: Vec<(String, Material)>,
}

impl MaterialRegistry {
    /// An empty registry
    pub fn new() -> Self {
        MaterialRegistry { entries: Vec::new() }
    }

    /// Registry seeded with the built-in materials
    pub fn with_defaults() -> Self {
        let mut registry = MaterialRegistry::new();
        for material in default_materials() {
            registry.insert(material.clone());
        }
        registry
    }

    /// Insert (or replace) a material under its normalized name. Returns the identifier.
    pub fn insert(&mut self, material: Material) -> String {
        let id = material.id();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = material,
            None => self.entries.push((id.clone(), material)),
        }
        id
    }

    /// Validate and register a user-defined material. Returns its identifier.
    pub fn register_custom(
        &mut self,
        name: &str,
        elastic_modulus_mpa: f64,
        poissons_ratio: f64,
        density_kg_per_mm3: f64,
        yield_strength_mpa: f64,
        color: &str,
    ) -> SectionResult<String> {
        let material = Material::new(
            name,
            elastic_modulus_mpa,
            poissons_ratio,
            density_kg_per_mm3,
            yield_strength_mpa,
            color,
        )?;
        Ok(self.insert(material))
    }

    pub fn lookup(&self, id: &str) -> Option<&Material> {
        let id = normalize_id(id);
        self.entries.iter().find(|(key, _)| *key == id).map(|(_, m)| m)
    }

    /// Look up a material, failing with `MaterialNotFound`
    pub fn get(&self, id: &str) -> SectionResult<&Material> {
        self.lookup(id).ok_or_else(|| SectionError::material_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    /// Identifiers in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.entries.iter().map(|(key, m)| (key.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materials that differ from (or are absent in) the built-in set
    pub fn custom_materials(&self) -> Vec<Material> {
        let defaults = default_materials();
        self.entries
            .iter()
            .filter(|(_, m)| !defaults.contains(m))
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Formatted material summary, or `MaterialNotFound`
    pub fn properties_text(&self, id: &str) -> SectionResult<String> {
        self.get(id).map(Material::properties_text)
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        MaterialRegistry::with_defaults()
    }
}
