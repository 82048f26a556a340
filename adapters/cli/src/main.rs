#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and inspects Starmap galaxies.

mod transfer;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use starmap_core::{GeneratorTuning, Layout};
use starmap_world::{validate, Galaxy, GalaxyGenerator, GalaxyRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::transfer::GalaxySnapshot;

/// Starmap galaxy generator.
#[derive(Debug, Parser)]
#[command(name = "starmap", version, about, propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a galaxy and print it.
    Generate(GenerateArgs),
    /// Decode a transfer string and report on its topology.
    Inspect(InspectArgs),
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Number of territories to place.
    #[arg(long, default_value_t = 40)]
    size: u32,

    /// Shape of the galaxy.
    #[arg(long, default_value_t = Layout::Organic, value_parser = parse_layout)]
    layout: Layout,

    /// Number of players the galaxy is generated for.
    #[arg(long, default_value_t = 4)]
    players: u32,

    /// Base seed; omit to draw a fresh one.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding generator tuning.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    tuning: Option<PathBuf>,

    /// Output representation.
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

#[derive(Debug, clap::Args)]
struct InspectArgs {
    /// Transfer string produced by `generate --format transfer`.
    snapshot: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable statistics.
    Summary,
    /// Pretty-printed JSON document.
    Json,
    /// Single-line transfer string.
    Transfer,
}

/// Entry point for the Starmap command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_layout(value: &str) -> Result<Layout, String> {
    value.parse::<Layout>().map_err(|error| error.to_string())
}

fn load_tuning(path: Option<&PathBuf>) -> Result<GeneratorTuning> {
    let Some(path) = path else {
        return Ok(GeneratorTuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not read tuning file {}", path.display()))?;
    let tuning = GeneratorTuning::from_toml_str(&contents)
        .with_context(|| format!("invalid tuning file {}", path.display()))?;
    info!(path = %path.display(), "loaded generator tuning");
    Ok(tuning)
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let tuning = load_tuning(args.tuning.as_ref())?;
    let mut request = GalaxyRequest::new(args.size, args.layout, args.players);
    if let Some(seed) = args.seed {
        request = request.with_seed(seed);
    }

    let galaxy = GalaxyGenerator::new(&tuning).generate(&request);
    info!(
        seed = galaxy.seed(),
        territories = galaxy.territories().len(),
        "galaxy generated"
    );

    match args.format {
        OutputFormat::Summary => print_summary(&galaxy),
        OutputFormat::Json => {
            let snapshot = GalaxySnapshot::capture(&galaxy);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Transfer => {
            println!("{}", GalaxySnapshot::capture(&galaxy).encode()?);
        }
    }
    Ok(())
}

fn print_summary(galaxy: &Galaxy) {
    let stats = galaxy.stats();
    let dimensions = galaxy.dimensions();

    println!("layout:      {}", galaxy.layout());
    println!("seed:        {}", galaxy.seed());
    println!(
        "map:         {:.1} x {:.1}",
        dimensions.width(),
        dimensions.height()
    );
    println!(
        "territories: {} placed of {} requested",
        stats.placed(),
        stats.requested()
    );
    println!(
        "lanes:       {} ({} backbone, {} augmented, {} bridges)",
        stats.total_lanes(),
        stats.backbone_edges(),
        stats.augmented_edges(),
        stats.bridge_edges()
    );
    if stats.triangulation_fallback() {
        println!("candidates:  {} (all-pairs fallback)", stats.candidate_edges());
    } else {
        println!("candidates:  {}", stats.candidate_edges());
    }
    if stats.clipping_bridges() > 0 {
        println!("warning:     {} bridge(s) clip a star", stats.clipping_bridges());
    }
    println!("validation:  {}", validate(galaxy.territories()));
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let snapshot =
        GalaxySnapshot::decode(&args.snapshot).context("could not decode galaxy transfer string")?;
    let dimensions = snapshot.dimensions();
    let report = validate(&snapshot.territories);

    println!("layout:      {}", snapshot.layout);
    println!("seed:        {}", snapshot.seed);
    println!(
        "map:         {:.1} x {:.1}",
        dimensions.width(),
        dimensions.height()
    );
    println!("validation:  {report}");

    let outside = snapshot
        .territories
        .iter()
        .filter(|territory| !dimensions.contains(territory.position()))
        .count();
    if outside > 0 {
        bail!("{outside} territories lie outside the map");
    }
    if !report.is_valid() {
        bail!("galaxy topology is invalid");
    }
    Ok(())
}
