use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use dxf::entities::{Circle, Entity, EntityType, LwPolyline};
use dxf::enums::AcadVersion;
use dxf::{Drawing, LwPolylineVertex, Point};

use section_core::file_io::{load_project, save_project};
use section_core::report::{format_properties, summary_text, ReportStyle};
use section_core::SectionProject;

fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Entity {
    let mut lw = LwPolyline::default();
    lw.set_is_closed(true);
    lw.vertices = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
        .iter()
        .map(|&(x, y)| {
            let mut vertex = LwPolylineVertex::default();
            vertex.x = x;
            vertex.y = y;
            vertex
        })
        .collect();
    Entity::new(EntityType::LwPolyline(lw))
}

fn write_drawing(dir: &Path, name: &str, entities: Vec<Entity>) -> PathBuf {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;
    for entity in entities {
        drawing.add_entity(entity);
    }
    let path = dir.join(name);
    drawing.save_file(&path).unwrap();
    path
}

#[test]
fn plate_with_bolt_hole() {
    let dir = tempfile::tempdir().unwrap();
    let plate = write_drawing(
        dir.path(),
        "plate.dxf",
        vec![
            rectangle(0.0, 0.0, 100.0, 200.0),
            Entity::new(EntityType::Circle(Circle::new(Point::new(50.0, 100.0, 0.0), 25.0))),
        ],
    );

    let mut project = SectionProject::new("Plate", "Test");
    project.settings.degrees_per_segment = 5.0;
    project.settings.reference_material = "steel".to_string();
    project.add_component(&plate, "steel").unwrap();

    let props = project.analyze().unwrap();
    let area = 20_000.0 - PI * 625.0;
    let ixx = 100.0 * 200f64.powi(3) / 12.0 - PI * 25f64.powi(4) / 4.0;
    assert!((props.area - area).abs() / area < 1e-3);
    assert!(props.centroid.approx_eq(section_core::geometry::Point2D::new(50.0, 100.0), 1e-6));
    assert!((props.ixx - ixx).abs() / ixx < 1e-3);
    assert!((props.perimeter - 600.0).abs() < 1e-9);

    let report = format_properties(&props, &project.settings.reference_material, ReportStyle::Markdown);
    assert!(report.contains("**Transformed Properties (Ref: Steel):**"));
    assert!(summary_text(&props).starts_with("Area = 18,0"));
}

#[test]
fn two_material_project_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let web = write_drawing(dir.path(), "web.dxf", vec![rectangle(0.0, 0.0, 100.0, 100.0)]);
    let flange = write_drawing(dir.path(), "flange.dxf", vec![rectangle(100.0, 0.0, 200.0, 100.0)]);

    let mut project = SectionProject::new("Bimetal", "Test");
    project.settings.reference_material = "steel".to_string();
    project.add_component(&web, "Steel").unwrap();
    project.add_component(&flange, "Aluminium").unwrap();

    let path = dir.path().join("bimetal.sct");
    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();
    assert_eq!(loaded.components.len(), 2);

    let props = loaded.analyze().unwrap();
    assert!((props.area - 20_000.0).abs() < 1e-6);
    assert!((props.centroid.x - 75.0).abs() < 1e-9);
    assert!((props.centroid.y - 50.0).abs() < 1e-9);

    let rows = loaded.components.table();
    assert_eq!(rows[0].file, "web.dxf");
    assert_eq!(rows[1].material, "Aluminium");
}

#[test]
fn missing_component_file_reports_import_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut project = SectionProject::default();
    project.add_component(dir.path().join("nowhere.dxf"), "glass").unwrap();

    let err = project.analyze().unwrap_err();
    assert_eq!(err.error_code(), "IMPORT_FAILED");
    assert!(err.to_string().contains("nowhere.dxf"));
}
