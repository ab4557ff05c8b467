//! DXF outline import.
//!
//! Every closed polyline or circle in the drawing becomes a ring. Rings are
//! nested into polygons by containment, so a ring drawn inside another ring
//! becomes a hole. Z coordinates are ignored.

use std::f64::consts::TAU;
use std::path::Path;

use dxf::entities::EntityType;
use dxf::Drawing;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::GeometryImporter;
use crate::config::AnalysisSettings;
use crate::errors::{SectionError, SectionResult};
use crate::geometry::arc::{validate_degrees_per_segment, DEFAULT_DEGREES_PER_SEGMENT};
use crate::geometry::{arc_points, assemble_polygons, expand_bulge_ring, BulgeVertex, Geometry, Point2D};
use crate::materials::Material;

/// Counts gathered while reading a drawing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rings taken from the drawing
    pub closed_outlines: usize,
    /// Arc segments dropped because their endpoints coincide
    pub skipped_segments: usize,
    /// Open polylines, unsupported entities and degenerate outlines
    pub skipped_entities: usize,
}

/// Imports component outlines from DXF files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxfImporter {
    degrees_per_segment: f64,
}

impl Default for DxfImporter {
    fn default() -> Self {
        DxfImporter {
            degrees_per_segment: DEFAULT_DEGREES_PER_SEGMENT,
        }
    }
}

impl DxfImporter {
    /// Importer sampling arcs every `degrees_per_segment` degrees.
    pub fn new(degrees_per_segment: f64) -> SectionResult<Self> {
        validate_degrees_per_segment(degrees_per_segment)?;
        Ok(DxfImporter { degrees_per_segment })
    }

    pub fn from_settings(settings: &AnalysisSettings) -> SectionResult<Self> {
        Self::new(settings.degrees_per_segment)
    }

    pub fn degrees_per_segment(&self) -> f64 {
        self.degrees_per_segment
    }

    /// Read a drawing from disk.
    pub fn load_drawing(path: &Path) -> SectionResult<Drawing> {
        if !path.exists() {
            return Err(SectionError::import_failed(
                path.display().to_string(),
                "DXF file not found",
            ));
        }
        Drawing::load_file(path).map_err(|e| SectionError::import_failed(path.display().to_string(), e.to_string()))
    }

    /// Collect the closed outlines of a drawing as point rings.
    pub fn extract_rings(&self, drawing: &Drawing) -> SectionResult<(Vec<Vec<Point2D>>, ImportReport)> {
        let mut rings = Vec::new();
        let mut report = ImportReport::default();

        for entity in drawing.entities() {
            let outline = match &entity.specific {
                EntityType::LwPolyline(lw) => {
                    let vertices: Vec<BulgeVertex> = lw
                        .vertices
                        .iter()
                        .map(|v| BulgeVertex::new(v.x, v.y, v.bulge))
                        .collect();
                    self.polyline_ring(vertices, lw.is_closed(), &mut report)?
                }
                EntityType::Polyline(poly) => {
                    let vertices: Vec<BulgeVertex> = poly
                        .vertices()
                        .map(|v| BulgeVertex::new(v.location.x, v.location.y, v.bulge))
                        .collect();
                    self.polyline_ring(vertices, poly.is_closed(), &mut report)?
                }
                EntityType::Circle(circle) => {
                    if circle.radius > 0.0 {
                        let center = Point2D::new(circle.center.x, circle.center.y);
                        let mut ring = arc_points(0.0, TAU, circle.radius, center, self.degrees_per_segment);
                        ring.pop();
                        Some(ring)
                    } else {
                        warn!(radius = circle.radius, "skipping circle without positive radius");
                        None
                    }
                }
                other => {
                    warn!(entity = entity_kind(other), "skipping unsupported entity");
                    None
                }
            };

            match outline {
                Some(ring) if ring.len() >= 3 => {
                    report.closed_outlines += 1;
                    rings.push(ring);
                }
                _ => report.skipped_entities += 1,
            }
        }

        Ok((rings, report))
    }

    fn polyline_ring(
        &self,
        mut vertices: Vec<BulgeVertex>,
        closed: bool,
        report: &mut ImportReport,
    ) -> SectionResult<Option<Vec<Point2D>>> {
        // A polyline that returns to its first vertex is closed even without the flag
        let implicitly_closed = vertices.len() >= 3
            && vertices.first().map(|v| v.point) == vertices.last().map(|v| v.point);
        if implicitly_closed {
            vertices.pop();
        } else if !closed {
            warn!(vertices = vertices.len(), "skipping open polyline");
            return Ok(None);
        }

        let expanded = expand_bulge_ring(&vertices, true, self.degrees_per_segment)?;
        report.skipped_segments += expanded.skipped_segments;
        Ok(Some(expanded.points))
    }

    /// Build a geometry from an already loaded drawing.
    pub fn import_drawing(
        &self,
        drawing: &Drawing,
        name: &str,
        material: &Material,
    ) -> SectionResult<(Geometry, ImportReport)> {
        let (rings, report) = self.extract_rings(drawing)?;
        if rings.is_empty() {
            return Err(SectionError::import_failed(name, "no closed outline found in drawing"));
        }

        let polygons = assemble_polygons(rings);
        info!(
            name,
            polygons = polygons.len(),
            outlines = report.closed_outlines,
            skipped_entities = report.skipped_entities,
            skipped_segments = report.skipped_segments,
            material = %material.name,
            "imported outline"
        );

        Ok((Geometry::new(name, material.clone(), polygons), report))
    }
}

impl GeometryImporter for DxfImporter {
    fn import(&self, path: &Path, material: &Material) -> SectionResult<Geometry> {
        let drawing = Self::load_drawing(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.import_drawing(&drawing, &name, material)
            .map(|(geometry, _)| geometry)
            .map_err(|e| match e {
                SectionError::ImportFailed { reason, .. } => {
                    SectionError::import_failed(path.display().to_string(), reason)
                }
                other => other,
            })
    }
}

fn entity_kind(entity: &EntityType) -> &'static str {
    match entity {
        EntityType::Line(_) => "LINE",
        EntityType::Arc(_) => "ARC",
        EntityType::Spline(_) => "SPLINE",
        EntityType::Ellipse(_) => "ELLIPSE",
        EntityType::Text(_) | EntityType::MText(_) => "TEXT",
        EntityType::Insert(_) => "INSERT",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::ring_signed_area;
    use crate::materials::MaterialRegistry;
    use dxf::entities::{Circle, Entity, Line, LwPolyline};
    use dxf::{LwPolylineVertex, Point};

    fn steel() -> Material {
        MaterialRegistry::with_defaults().get("steel").unwrap().clone()
    }

    fn lw_polyline(points: &[(f64, f64, f64)], closed: bool) -> Entity {
        let mut lw = LwPolyline::default();
        lw.set_is_closed(closed);
        lw.vertices = points
            .iter()
            .map(|&(x, y, bulge)| {
                let mut vertex = LwPolylineVertex::default();
                vertex.x = x;
                vertex.y = y;
                vertex.bulge = bulge;
                vertex
            })
            .collect();
        Entity::new(EntityType::LwPolyline(lw))
    }

    fn square(x0: f64, y0: f64, size: f64) -> Entity {
        lw_polyline(
            &[
                (x0, y0, 0.0),
                (x0 + size, y0, 0.0),
                (x0 + size, y0 + size, 0.0),
                (x0, y0 + size, 0.0),
            ],
            true,
        )
    }

    #[test]
    fn test_square_with_hole() {
        let mut drawing = Drawing::new();
        drawing.add_entity(square(0.0, 0.0, 100.0));
        drawing.add_entity(square(25.0, 25.0, 50.0));

        let (geometry, report) = DxfImporter::default()
            .import_drawing(&drawing, "box.dxf", &steel())
            .unwrap();
        assert_eq!(report.closed_outlines, 2);
        assert_eq!(geometry.polygons.len(), 1);
        assert_eq!(geometry.polygons[0].holes.len(), 1);
        assert!((geometry.area() - 7_500.0).abs() < 1e-9);
        assert_eq!(geometry.material.name, "Steel");
    }

    #[test]
    fn test_bulged_polyline_is_discretized() {
        // D-shape: flat bottom, semicircular top
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(&[(0.0, 0.0, 0.0), (20.0, 0.0, 1.0)], true));

        let importer = DxfImporter::new(10.0).unwrap();
        let (rings, report) = importer.extract_rings(&drawing).unwrap();
        assert_eq!(report.closed_outlines, 1);
        // Two vertices plus 17 interior points on the 18-chord semicircle
        assert_eq!(rings[0].len(), 19);

        let area = ring_signed_area(&rings[0]).abs();
        let exact = std::f64::consts::PI * 100.0 / 2.0;
        assert!((area - exact).abs() / exact < 0.01);
    }

    #[test]
    fn test_circle_becomes_ring() {
        let mut drawing = Drawing::new();
        drawing.add_entity(Entity::new(EntityType::Circle(Circle::new(Point::new(5.0, 5.0, 0.0), 10.0))));

        let (rings, _) = DxfImporter::new(10.0).unwrap().extract_rings(&drawing).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 36);
        assert!(rings[0]
            .iter()
            .all(|p| (p.distance_to(Point2D::new(5.0, 5.0)) - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_open_and_unsupported_entities_skipped() {
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0)], false));
        drawing.add_entity(Entity::new(EntityType::Line(Line::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ))));
        drawing.add_entity(square(0.0, 0.0, 10.0));

        let (rings, report) = DxfImporter::default().extract_rings(&drawing).unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(report.skipped_entities, 2);
    }

    #[test]
    fn test_repeated_end_vertex_closes_polyline() {
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(
            &[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0), (0.0, 0.0, 0.0)],
            false,
        ));
        let (rings, report) = DxfImporter::default().extract_rings(&drawing).unwrap();
        assert_eq!(report.closed_outlines, 1);
        assert_eq!(rings[0].len(), 3);
    }

    #[test]
    fn test_two_arc_circle_closes_on_repeated_vertex() {
        // Full circle drawn as two semicircular bulges returning to the start
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(&[(0.0, 0.0, 1.0), (10.0, 0.0, 1.0), (0.0, 0.0, 0.0)], false));

        let (geometry, report) = DxfImporter::new(10.0)
            .unwrap()
            .import_drawing(&drawing, "disc.dxf", &steel())
            .unwrap();
        assert_eq!(report.closed_outlines, 1);
        assert_eq!(report.skipped_entities, 0);

        let ring = &geometry.polygons[0].exterior;
        assert_eq!(ring.len(), 36);
        assert!(ring
            .iter()
            .all(|p| (p.distance_to(Point2D::new(5.0, 0.0)) - 5.0).abs() < 1e-9));
        let exact = std::f64::consts::PI * 25.0;
        assert!((geometry.area() - exact).abs() / exact < 0.01);
    }

    #[test]
    fn test_straight_out_and_back_is_skipped() {
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 0.0, 0.0)], false));
        let (rings, report) = DxfImporter::default().extract_rings(&drawing).unwrap();
        assert!(rings.is_empty());
        assert_eq!(report.skipped_entities, 1);
    }

    #[test]
    fn test_degenerate_arc_segment_counted() {
        let mut drawing = Drawing::new();
        drawing.add_entity(lw_polyline(
            &[(0.0, 0.0, 0.0), (10.0, 0.0, 0.5), (10.0, 0.0, 0.0), (10.0, 10.0, 0.0)],
            true,
        ));
        let (_, report) = DxfImporter::default().extract_rings(&drawing).unwrap();
        assert_eq!(report.skipped_segments, 1);
        assert_eq!(report.closed_outlines, 1);
    }

    #[test]
    fn test_empty_drawing_fails() {
        let err = DxfImporter::default()
            .import_drawing(&Drawing::new(), "blank.dxf", &steel())
            .unwrap_err();
        assert_eq!(err.error_code(), "IMPORT_FAILED");
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DxfImporter::default()
            .import(&dir.path().join("absent.dxf"), &steel())
            .unwrap_err();
        assert_eq!(err.error_code(), "IMPORT_FAILED");
    }

    #[test]
    fn test_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rod.dxf");

        let mut drawing = Drawing::new();
        drawing.add_entity(Entity::new(EntityType::Circle(Circle::new(Point::new(0.0, 0.0, 0.0), 25.0))));
        drawing.save_file(&path).unwrap();

        let geometry = DxfImporter::new(5.0).unwrap().import(&path, &steel()).unwrap();
        assert_eq!(geometry.name, "rod.dxf");
        assert_eq!(geometry.polygons.len(), 1);
        let exact = std::f64::consts::PI * 625.0;
        assert!((geometry.area() - exact).abs() / exact < 0.005);
    }

    #[test]
    fn test_invalid_fidelity_rejected() {
        assert!(DxfImporter::new(0.0).is_err());
        let settings = AnalysisSettings::default().with_degrees_per_segment(-1.0);
        assert!(DxfImporter::from_settings(&settings).is_err());
    }
}
