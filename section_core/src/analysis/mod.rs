//! # Section Analysis
//!
//! Elastic properties of compound (multi-material) sections.
//!
//! Each component contributes in proportion to its elastic modulus. The
//! modulus-weighted results (`e_*`) are divided by the reference material's
//! modulus to give transformed properties (`ixx`, `zxx_plus`, ...), i.e. the
//! properties of an equivalent section made entirely of the reference
//! material.
//!
//! ## Example
//!
//! ```rust
//! use section_core::analysis::{PolygonAnalyzer, SectionAnalyzer};
//! use section_core::geometry::{CompoundGeometry, Geometry, Point2D, Polygon};
//! use section_core::materials::MaterialRegistry;
//!
//! let registry = MaterialRegistry::with_defaults();
//! let steel = registry.get("steel").unwrap().clone();
//! let plate = Polygon::new(vec![
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(100.0, 0.0),
//!     Point2D::new(100.0, 10.0),
//!     Point2D::new(0.0, 10.0),
//! ]);
//! let section = CompoundGeometry::from(Geometry::new("plate", steel.clone(), vec![plate]));
//!
//! let props = PolygonAnalyzer::new().analyze(&section, &steel).unwrap();
//! assert!((props.area - 1000.0).abs() < 1e-9);
//! ```

pub mod polygon;

pub use polygon::{PolygonAnalyzer, SectionIntegrals};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::components::ComponentList;
use crate::config::AnalysisSettings;
use crate::errors::SectionResult;
use crate::geometry::{CompoundGeometry, Point2D};
use crate::import::GeometryImporter;
use crate::materials::{Material, MaterialRegistry};

/// Elastic properties of a compound section.
///
/// Lengths in mm, moduli in MPa. Second moments are centroidal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Net cross-sectional area (mm²)
    pub area: f64,
    /// Total length of exterior boundaries (mm)
    pub perimeter: f64,
    /// Modulus-weighted centroid (mm)
    pub centroid: Point2D,

    /// E·Ixx (N·mm²)
    pub e_ixx: f64,
    /// E·Iyy (N·mm²)
    pub e_iyy: f64,
    /// E·Ixy (N·mm²)
    pub e_ixy: f64,

    /// Transformed Ixx (mm⁴)
    pub ixx: f64,
    /// Transformed Iyy (mm⁴)
    pub iyy: f64,
    /// Transformed Ixy (mm⁴)
    pub ixy: f64,

    /// Elastic modulus to the top fibre (mm³)
    pub zxx_plus: f64,
    /// Elastic modulus to the bottom fibre (mm³)
    pub zxx_minus: f64,
    /// Elastic modulus to the right fibre (mm³)
    pub zyy_plus: f64,
    /// Elastic modulus to the left fibre (mm³)
    pub zyy_minus: f64,

    /// Major principal second moment (mm⁴)
    pub i1: f64,
    /// Minor principal second moment (mm⁴)
    pub i2: f64,
    /// Principal axis angle (degrees)
    pub phi: f64,
}

impl SectionProperties {
    /// Smaller of the two x-axis moduli
    pub fn governing_section_modulus(&self) -> f64 {
        self.zxx_plus.min(self.zxx_minus)
    }
}

/// Computes section properties of a compound section.
pub trait SectionAnalyzer {
    /// Analyze `section`, transforming by `reference`'s elastic modulus.
    fn analyze(&self, section: &CompoundGeometry, reference: &Material) -> SectionResult<SectionProperties>;
}

/// Import every component and assemble the compound section.
///
/// # Errors
/// * `InvalidInput` - no components
/// * `MaterialNotFound` - a component names an unregistered material
/// * `ImportFailed` - a component file could not be imported
pub fn build_section(
    components: &ComponentList,
    registry: &MaterialRegistry,
    importer: &dyn GeometryImporter,
) -> SectionResult<CompoundGeometry> {
    let geometries = components
        .iter()
        .map(|component| {
            let material = registry.get(&component.material)?;
            let mut geometry = importer.import(&component.file, material)?;
            geometry.name = component.display_name.clone();
            Ok(geometry)
        })
        .collect::<SectionResult<Vec<_>>>()?;

    CompoundGeometry::new(geometries)
}

/// Import, assemble and analyze a list of components.
pub fn analyze_components(
    components: &ComponentList,
    registry: &MaterialRegistry,
    settings: &AnalysisSettings,
    importer: &dyn GeometryImporter,
    analyzer: &dyn SectionAnalyzer,
) -> SectionResult<SectionProperties> {
    settings.validate(registry)?;
    let reference = registry.get(&settings.reference_material)?;

    let section = build_section(components, registry, importer)?;
    info!(
        components = section.len(),
        reference = %reference.name,
        "analyzing compound section"
    );

    analyzer.analyze(&section, reference)
}
