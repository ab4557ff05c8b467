//! # Section CLI
//!
//! Command line front end for compound section analysis.
//!
//! ```text
//! section analyze web.dxf:steel slab.dxf:concrete --reference steel
//! section materials steel
//! section arc 0 0 10 0 1.0 --degrees-per-segment 45
//! section project new deck.sct --title "Composite deck"
//! section project add deck.sct web.dxf steel
//! section project analyze deck.sct --json
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use section_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "section", version, about = "Elastic properties of compound cross-sections drawn in DXF")]
pub struct Cli {
    /// Configuration file (defaults to $SECTION_CONFIG, then ./config/default.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `section_core=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a compound section given as FILE:MATERIAL pairs
    Analyze(AnalyzeArgs),

    /// List materials, or show one material's properties
    Materials {
        /// Material identifier
        id: Option<String>,
    },

    /// Discretize one bulge arc and print its points
    Arc(ArcArgs),

    /// Manage a saved section project
    #[command(subcommand)]
    Project(ProjectCommand),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Components as FILE:MATERIAL, e.g. `web.dxf:steel`
    #[arg(required = true, value_name = "FILE:MATERIAL")]
    pub components: Vec<String>,

    /// Reference material for transformed properties
    #[arg(long)]
    pub reference: Option<String>,

    /// Arc fidelity in degrees per chord
    #[arg(long)]
    pub degrees_per_segment: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Plain text report (no markdown emphasis)
    #[arg(long, conflicts_with = "json")]
    pub plain: bool,

    /// Print the properties as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ArcArgs {
    #[arg(allow_negative_numbers = true)]
    pub x1: f64,
    #[arg(allow_negative_numbers = true)]
    pub y1: f64,
    #[arg(allow_negative_numbers = true)]
    pub x2: f64,
    #[arg(allow_negative_numbers = true)]
    pub y2: f64,
    /// tan(θ/4); positive is counter-clockwise
    #[arg(allow_negative_numbers = true)]
    pub bulge: f64,

    /// Arc fidelity in degrees per chord
    #[arg(long)]
    pub degrees_per_segment: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create an empty project file
    New {
        path: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        engineer: String,
        /// Reference material for transformed properties
        #[arg(long)]
        reference: Option<String>,
        /// Arc fidelity in degrees per chord
        #[arg(long)]
        degrees_per_segment: Option<f64>,
    },

    /// Append a component
    Add {
        path: PathBuf,
        file: PathBuf,
        material: String,
        /// Name shown in listings
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a component by its 1-based position
    Remove { path: PathBuf, index: usize },

    /// Print project details and components
    Show { path: PathBuf },

    /// Analyze the project's components
    Analyze {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so reports and JSON on stdout stay clean
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = AppConfig::discover(cli.config.as_deref()).and_then(|config| {
        init_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));
        commands::run(&cli.command, &config)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_recoverable() {
                eprintln!("The project is in use; try again once it is released.");
            }
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
