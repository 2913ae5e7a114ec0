//! Command-line front end for the Olex to GPX converter.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use olex2gpx::{
    ConvertOptions, LeafletMap, MapRenderer, NoMap, OutputMode, convert_file, parser::parse_gpx,
    pipeline::default_output_path,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "olex2gpx", version, about = "Convert Olex .gz route files to GPX")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an Olex .gz file to GPX and render a map next to it
    Convert(ConvertArgs),
    /// Print what a GPX file contains
    Inspect {
        /// GPX file to read
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Olex file (.gz)
    input: PathBuf,

    /// GPX output path (default: input with .gpx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Shape of the GPX body
    #[arg(short, long, value_enum, default_value_t = Mode::Waypoints)]
    mode: Mode,

    /// Shorthand for --mode route
    #[arg(long, conflicts_with = "mode")]
    route: bool,

    /// Do not render the HTML map
    #[arg(long)]
    no_map: bool,

    /// File name of the HTML map, created next to the GPX output
    #[arg(long, default_value = olex2gpx::options::DEFAULT_MAP_FILE_NAME)]
    map_name: String,

    /// Initial map zoom level
    #[arg(long, default_value_t = olex2gpx::options::DEFAULT_ZOOM)]
    zoom: u8,

    /// Write GPX without indentation
    #[arg(long)]
    compact: bool,

    /// Value of the GPX creator attribute
    #[arg(long, default_value = olex2gpx::options::DEFAULT_CREATOR)]
    creator: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// One <wpt> per record
    Waypoints,
    /// A single ordered <rte>
    Route,
}

impl ConvertArgs {
    fn options(&self) -> ConvertOptions {
        let mode = match (self.route, self.mode) {
            (true, _) | (false, Mode::Route) => OutputMode::Route,
            (false, Mode::Waypoints) => OutputMode::Waypoints,
        };
        ConvertOptions {
            mode,
            creator: self.creator.clone(),
            indent: !self.compact,
            map: !self.no_map,
            map_file_name: self.map_name.clone(),
            zoom: self.zoom,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => cmd_convert(&args),
        Command::Inspect { file } => cmd_inspect(&file),
    }
}

fn init_tracing(verbose: u8) {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// A non-empty, valid `RUST_LOG` wins; otherwise `-v` picks the level.
fn env_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn cmd_convert(args: &ConvertArgs) -> Result<()> {
    let opts = args.options();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let leaflet = LeafletMap {
        zoom: opts.zoom,
        mode: opts.mode,
    };
    let renderer: &dyn MapRenderer = if opts.map { &leaflet } else { &NoMap };

    let summary = convert_file(&args.input, &output, &opts, renderer)
        .with_context(|| format!("converting {}", args.input.display()))?;
    println!("{summary}");
    Ok(())
}

fn cmd_inspect(file: &Path) -> Result<()> {
    let xml = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let data = parse_gpx(&xml).with_context(|| format!("parsing {}", file.display()))?;

    println!(
        "GPX {} created by {}",
        data.version.as_deref().unwrap_or("?"),
        data.creator.as_deref().unwrap_or("?")
    );
    println!("{} waypoints", data.waypoints.len());
    for (i, route) in data.routes.iter().enumerate() {
        println!("route {}: {} points", i + 1, route.len());
    }
    for wpt in data.waypoints.iter().chain(data.routes.iter().flatten()) {
        println!("{:>12.6} {:>12.6}  {}  {}", wpt.lat, wpt.lon, wpt.time, wpt.name);
    }
    Ok(())
}
