//! # section_core - Compound Section Analysis Engine
//!
//! `section_core` computes elastic properties of multi-material cross-sections
//! drawn as DXF outlines. Polyline arcs are discretized from their bulge
//! values, rings are nested into polygons with holes, and the properties are
//! integrated exactly over the polygon boundaries.
//!
//! ## Design Philosophy
//!
//! - **JSON-First**: inputs, results and errors implement Serialize/Deserialize
//! - **Rich Errors**: structured error types with stable codes
//! - **No meshing**: properties come from boundary integrals
//!
//! ## Quick Start
//!
//! ```rust
//! use section_core::geometry::{arc_points_from_bulge, Point2D};
//!
//! let arc = arc_points_from_bulge(Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), 1.0, 10.0).unwrap();
//! assert_eq!(arc.len(), 19);
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Points, bulge arcs, rings and polygons
//! - [`import`] - DXF outline import
//! - [`materials`] - Material definitions and registry
//! - [`components`] - Ordered list of section components
//! - [`analysis`] - Section property calculation
//! - [`report`] - Text rendering of results
//! - [`config`] - Analysis settings and configuration files
//! - [`project`] - Project container
//! - [`file_io`] - Project files with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod components;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod geometry;
pub mod import;
pub mod materials;
pub mod project;
pub mod report;

pub use analysis::{PolygonAnalyzer, SectionAnalyzer, SectionProperties};
pub use config::{AnalysisSettings, AppConfig};
pub use errors::{SectionError, SectionResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::SectionProject;
