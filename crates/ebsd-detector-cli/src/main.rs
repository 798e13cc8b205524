//! Command-line front end for EBSD detector geometry.
//!
//! Every subcommand reads a detector config JSON (see `DetectorConfig`)
//! and either prints derived geometry, exports projection centers in a
//! vendor convention, crops the detector, or renders SVG diagnostics.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use ebsd_detector_core::{
    Convention, ConventionError, CropError, CropExtent, DetectorConfig, DetectorError,
    DetectorIoError, EbsdDetector, GeometryReport, PcArray,
};
use ebsd_detector_plot::{
    detector_diagram, pc_plot, CoordinateFrame, DiagramOptions, Orientation, PcPlotOptions,
    PlotError, PlotMode,
};

#[derive(Parser)]
#[command(
    name = "ebsd-detector",
    about = "EBSD detector geometry utilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the detector summary and derived geometry.
    Info {
        /// Detector config JSON.
        config: PathBuf,
        /// Write the full geometry report JSON here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Export projection centers in a vendor convention.
    Convert {
        /// Detector config JSON.
        config: PathBuf,
        /// Target convention (bruker, tsl/edax/amatek, oxford/aztec,
        /// emsoft, emsoft4, emsoft5).
        #[arg(long)]
        to: String,
        /// Write the converted PC triples as JSON instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Crop the detector and write the resulting config JSON.
    Crop {
        /// Detector config JSON.
        config: PathBuf,
        #[arg(long)]
        top: i64,
        #[arg(long)]
        bottom: i64,
        #[arg(long)]
        left: i64,
        #[arg(long)]
        right: i64,
        /// Output config JSON path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Render an SVG diagnostic plot.
    Plot {
        /// Detector config JSON.
        config: PathBuf,
        /// What to draw.
        #[arg(long, value_enum, default_value = "screen")]
        kind: PlotKind,
        /// Coordinate frame for the screen diagram.
        #[arg(long, value_enum, default_value = "detector")]
        coordinates: Frame,
        /// Draw gnomonic angle circles on the screen diagram.
        #[arg(long)]
        circles: bool,
        /// PC plot mode (map or scatter).
        #[arg(long, default_value = "map")]
        mode: String,
        /// Label scatter points with their scan index.
        #[arg(long)]
        annotate: bool,
        /// Output SVG path.
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlotKind {
    /// Detector screen with the average PC.
    Screen,
    /// Projection center distribution over the scan.
    Pc,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Frame {
    Detector,
    Gnomonic,
}

impl From<Frame> for CoordinateFrame {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Detector => Self::Detector,
            Frame::Gnomonic => Self::Gnomonic,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ConfigIo(#[from] DetectorIoError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Convention(#[from] ConventionError),
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Info { config, report } => info_cmd(&config, report.as_deref()),
        Command::Convert { config, to, output } => convert_cmd(&config, &to, output.as_deref()),
        Command::Crop {
            config,
            top,
            bottom,
            left,
            right,
            output,
        } => crop_cmd(
            &config,
            CropExtent {
                top,
                bottom,
                left,
                right,
            },
            &output,
        ),
        Command::Plot {
            config,
            kind,
            coordinates,
            circles,
            mode,
            annotate,
            output,
        } => plot_cmd(&config, kind, coordinates, circles, &mode, annotate, &output),
    }
}

fn load_detector(path: &std::path::Path) -> Result<EbsdDetector, CliError> {
    let cfg = DetectorConfig::load_json(path)?;
    info!("loaded detector config from {}", path.display());
    Ok(cfg.build()?)
}

fn info_cmd(config: &std::path::Path, report: Option<&std::path::Path>) -> Result<(), CliError> {
    let det = load_detector(config)?;
    println!("{det}");

    let b = det.average_gnomonic_bounds();
    println!(
        "navigation shape {:?}, aspect ratio {:.4}",
        det.navigation_shape().dims(),
        det.aspect_ratio()
    );
    println!(
        "gnomonic bounds [{:.4}, {:.4}, {:.4}, {:.4}]",
        b.x_min, b.x_max, b.y_min, b.y_max
    );

    if let Some(path) = report {
        GeometryReport::from_detector(&det).write_json(path)?;
        println!("wrote geometry report to {}", path.display());
    }
    Ok(())
}

fn pc_triples(pc: &PcArray) -> Vec<[f64; 3]> {
    pc.entries().iter().map(|v| [v.x, v.y, v.z]).collect()
}

fn convert_cmd(
    config: &std::path::Path,
    to: &str,
    output: Option<&std::path::Path>,
) -> Result<(), CliError> {
    let convention: Convention = to.parse()?;
    let det = load_detector(config)?;
    let triples = pc_triples(&det.pc_in(convention));
    let json = serde_json::to_string_pretty(&triples)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("wrote {} PC(s) in {convention} to {}", triples.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn crop_cmd(
    config: &std::path::Path,
    extent: CropExtent,
    output: &std::path::Path,
) -> Result<(), CliError> {
    let det = load_detector(config)?;
    let cropped = det.crop(extent)?;
    cropped.to_config().write_json(output)?;
    println!("{cropped}");
    println!("wrote cropped detector config to {}", output.display());
    Ok(())
}

fn plot_cmd(
    config: &std::path::Path,
    kind: PlotKind,
    coordinates: Frame,
    circles: bool,
    mode: &str,
    annotate: bool,
    output: &std::path::Path,
) -> Result<(), CliError> {
    let det = load_detector(config)?;
    let svg = match kind {
        PlotKind::Screen => {
            let opts = DiagramOptions {
                coordinates: coordinates.into(),
                gnomonic_circles: circles,
                ..DiagramOptions::default()
            };
            detector_diagram(&det, &opts)
        }
        PlotKind::Pc => {
            let opts = PcPlotOptions {
                mode: mode.parse::<PlotMode>()?,
                orientation: Orientation::Horizontal,
                annotate,
            };
            pc_plot(&det, &opts)?
        }
    };
    fs::write(output, svg)?;
    println!("wrote SVG to {}", output.display());
    Ok(())
}
