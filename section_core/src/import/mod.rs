//! # Geometry Import
//!
//! Loading component outlines from drawing files.
//!
//! ## Importers
//!
//! - [`DxfImporter`] - closed `LWPOLYLINE`, `POLYLINE` and `CIRCLE` entities
//!   from DXF drawings, with polyline arcs discretized from their bulge values

pub mod drawing;

pub use drawing::{DxfImporter, ImportReport};

use std::path::Path;

use crate::errors::SectionResult;
use crate::geometry::Geometry;
use crate::materials::Material;

/// Reads one component outline and assigns it a material.
pub trait GeometryImporter {
    /// Import the outline stored at `path`.
    ///
    /// # Errors
    /// `ImportFailed` when the file is missing, unreadable, or holds no
    /// closed outline.
    fn import(&self, path: &Path, material: &Material) -> SectionResult<Geometry>;
}
