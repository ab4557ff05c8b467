//! Command handlers. Each returns `SectionResult` so failures reach `main`
//! as structured errors.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use section_core::analysis::{analyze_components, PolygonAnalyzer, SectionProperties};
use section_core::components::{ComponentList, SectionComponent};
use section_core::file_io::{load_project, load_project_with_lock_check, save_project, FileLock};
use section_core::geometry::arc_points_from_bulge;
use section_core::import::DxfImporter;
use section_core::materials::MaterialRegistry;
use section_core::report::{format_properties, summary_text, ReportStyle};
use section_core::{AnalysisSettings, AppConfig, SectionError, SectionProject, SectionResult};

use crate::{AnalyzeArgs, ArcArgs, Command, OutputArgs, ProjectCommand};

pub fn run(command: &Command, config: &AppConfig) -> SectionResult<()> {
    match command {
        Command::Analyze(args) => analyze(args, &config.analysis),
        Command::Materials { id } => materials(id.as_deref()),
        Command::Arc(args) => arc(args, &config.analysis),
        Command::Project(command) => project(command, &config.analysis),
    }
}

/// Split `FILE:MATERIAL` at the last colon, so drive letters survive.
pub fn parse_component(arg: &str) -> SectionResult<(PathBuf, String)> {
    match arg.rsplit_once(':') {
        Some((file, material)) if !file.is_empty() && !material.trim().is_empty() => {
            Ok((PathBuf::from(file), material.trim().to_string()))
        }
        Some((file, _)) if !file.is_empty() => Err(SectionError::missing_field(format!("material for '{}'", file))),
        _ => Err(SectionError::invalid_input(
            "component",
            arg,
            "expected FILE:MATERIAL, e.g. web.dxf:steel",
        )),
    }
}

fn override_settings(
    base: &AnalysisSettings,
    reference: Option<&str>,
    degrees_per_segment: Option<f64>,
) -> AnalysisSettings {
    let mut settings = base.clone();
    if let Some(reference) = reference {
        settings.reference_material = reference.to_string();
    }
    if let Some(degrees) = degrees_per_segment {
        settings.degrees_per_segment = degrees;
    }
    settings
}

fn analyze(args: &AnalyzeArgs, base: &AnalysisSettings) -> SectionResult<()> {
    let settings = override_settings(base, args.reference.as_deref(), args.degrees_per_segment);
    let registry = MaterialRegistry::with_defaults();

    let mut components = ComponentList::new();
    for arg in &args.components {
        let (file, material) = parse_component(arg)?;
        components.add(SectionComponent::new(file, &material));
    }

    let importer = DxfImporter::from_settings(&settings)?;
    let props = analyze_components(&components, &registry, &settings, &importer, &PolygonAnalyzer)?;
    emit(&props, &settings.reference_material, &args.output)
}

/// Render the properties as requested and print or write them.
fn emit(props: &SectionProperties, reference: &str, output: &OutputArgs) -> SectionResult<()> {
    let text = render(props, reference, output)?;
    match &output.output {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| SectionError::file_error("write report", path.display().to_string(), e.to_string()))?;
            info!(path = %path.display(), "report written");
            Ok(())
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

pub fn render(props: &SectionProperties, reference: &str, output: &OutputArgs) -> SectionResult<String> {
    if output.json {
        return serde_json::to_string_pretty(props).map_err(SectionError::serialization);
    }
    let style = if output.plain {
        ReportStyle::Plain
    } else {
        ReportStyle::Markdown
    };
    Ok(format!(
        "{}\n\n{}",
        format_properties(props, reference, style),
        summary_text(props)
    ))
}

fn materials(id: Option<&str>) -> SectionResult<()> {
    let registry = MaterialRegistry::with_defaults();
    match id {
        Some(id) => println!("{}", registry.properties_text(id)?),
        None => {
            for (id, material) in registry.iter() {
                println!(
                    "{:<12} E = {:>9.0} MPa   fy = {:>6.1} MPa   {}",
                    id, material.elastic_modulus_mpa, material.yield_strength_mpa, material.color
                );
            }
        }
    }
    Ok(())
}

fn arc(args: &ArcArgs, base: &AnalysisSettings) -> SectionResult<()> {
    for p in arc_rows(args, base)? {
        println!("{}", p);
    }
    Ok(())
}

/// Discretize the requested arc into tab-separated `x y` rows.
fn arc_rows(args: &ArcArgs, base: &AnalysisSettings) -> SectionResult<Vec<String>> {
    let settings = override_settings(base, None, args.degrees_per_segment);
    settings.validate(&MaterialRegistry::with_defaults())?;
    let points = arc_points_from_bulge(
        (args.x1, args.y1).into(),
        (args.x2, args.y2).into(),
        args.bulge,
        settings.degrees_per_segment,
    )?;
    Ok(points.iter().map(|p| format!("{:.6}\t{:.6}", p.x, p.y)).collect())
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Load, modify and atomically save a project while holding its lock.
fn update_project<T>(path: &Path, edit: impl FnOnce(&mut SectionProject) -> SectionResult<T>) -> SectionResult<T> {
    let _lock = FileLock::acquire(path, current_user())?;
    let mut project = load_project(path)?;
    let value = edit(&mut project)?;
    save_project(&project, path)?;
    Ok(value)
}

fn project(command: &ProjectCommand, base: &AnalysisSettings) -> SectionResult<()> {
    match command {
        ProjectCommand::New {
            path,
            title,
            engineer,
            reference,
            degrees_per_segment,
        } => {
            if path.exists() {
                return Err(SectionError::file_error(
                    "create",
                    path.display().to_string(),
                    "file already exists",
                ));
            }
            let mut project = SectionProject::new(title.as_str(), engineer.as_str());
            project.settings = override_settings(base, reference.as_deref(), *degrees_per_segment);
            project.settings.validate(&project.material_registry())?;

            let _lock = FileLock::acquire(path, current_user())?;
            save_project(&project, path)?;
            println!("Created {}", path.display());
        }
        ProjectCommand::Add {
            path,
            file,
            material,
            name,
        } => {
            // Stored absolute so the project can be analyzed from any directory
            let file = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
            let count = update_project(path, |project| {
                let id = project.add_component(file.clone(), material)?;
                if let (Some(name), Some(component)) = (name, project.components.get_mut_by_id(&id)) {
                    component.display_name = name.clone();
                }
                Ok(project.components.len())
            })?;
            println!("Added {} ({} components)", file.display(), count);
        }
        ProjectCommand::Remove { path, index } => {
            let removed = update_project(path, |project| {
                let position = index.checked_sub(1).ok_or_else(|| {
                    SectionError::component_not_found(format!("index {}", index))
                })?;
                project.remove_component(position)
            })?;
            println!("Removed {}", removed.display_name);
        }
        ProjectCommand::Show { path } => {
            let (project, holder) = load_project_with_lock_check(path)?;
            print!("{}", describe_project(&project));
            if let Some(holder) = holder {
                println!("Locked by {} ({}) since {}", holder.user_id, holder.machine, holder.locked_at.to_rfc3339());
            }
        }
        ProjectCommand::Analyze { path, output } => {
            let project = load_project(path)?;
            let props = project.analyze()?;
            emit(&props, &project.settings.reference_material, output)?;
        }
    }
    Ok(())
}

pub fn describe_project(project: &SectionProject) -> String {
    let mut out = String::new();
    out.push_str(&format!("Title:      {}\n", project.meta.title));
    out.push_str(&format!("Engineer:   {}\n", project.meta.engineer));
    out.push_str(&format!("Modified:   {}\n", project.meta.modified.to_rfc3339()));
    out.push_str(&format!(
        "Settings:   {}° per segment, reference {}\n",
        project.settings.degrees_per_segment, project.settings.reference_material
    ));
    for material in &project.materials {
        out.push_str(&format!("Material:   {} (E = {} MPa)\n", material.name, material.elastic_modulus_mpa));
    }
    out.push('\n');
    if project.components.is_empty() {
        out.push_str("No components\n");
    }
    for row in project.components.table() {
        out.push_str(&format!("{:>3}  {:<30} {}\n", row.index, row.file, row.material));
    }
    out
}
