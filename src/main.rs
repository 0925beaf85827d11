// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};

use eikonal_front::core::{CostMap, Grid, Point};
use eikonal_front::engine::ProgressInfo;
use eikonal_front::harness::{self, Variant};
use eikonal_front::io::{self, FileFormat};
use eikonal_front::neighborhood::Topology;
use eikonal_front::transit::TransitKind;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Npy,
    Mat,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Npy => FileFormat::Npy,
            Format::Mat => FileFormat::Mat,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "eikonal-front",
    about = "Single-seed Dijkstra / Fast Marching front propagation on a 2D grid"
)]
struct Cli {
    /// Seed coordinates, comma-separated (e.g., 0,0)
    #[arg(long, default_value = "0,0", allow_hyphen_values = true)]
    seed: String,

    /// Grid corner with minimal coordinates
    #[arg(long, default_value = "-5,-5", allow_hyphen_values = true)]
    min: String,

    /// Grid corner with maximal coordinates
    #[arg(long, default_value = "15,15", allow_hyphen_values = true)]
    max: String,

    /// Grid spacing
    #[arg(long, default_value = "1.0")]
    step: f64,

    /// Maximum number of accepted points
    #[arg(short = 'n', long, default_value = "300")]
    iterations: usize,

    /// Neighborhood topology (repeatable; default: all)
    #[arg(long, value_enum)]
    topology: Vec<Topology>,

    /// Transit computation (repeatable; default: all)
    #[arg(long, value_enum)]
    transit: Vec<TransitKind>,

    /// Sampling resolution of simplex transit, in (0, 1]
    #[arg(long, default_value = "0.01")]
    eps: f64,

    /// Time this many runs per variant instead of printing cost grids
    #[arg(long)]
    trials: Option<usize>,

    /// Directory receiving one cost file per variant
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Format of the cost files
    #[arg(long, value_enum, default_value = "npy")]
    format: Format,

    /// Number of Rayon worker threads running variants concurrently
    #[arg(long)]
    threads: Option<usize>,

    /// Do not print cost grids
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Print propagation progress to stderr (runs variants one at a time)
    #[arg(long)]
    progress: bool,

    /// Progress reporting interval in milliseconds (used with --progress)
    #[arg(long, default_value = "500")]
    progress_interval: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_point(s: &str, flag: &str) -> Result<Point> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid --{}: expected comma-separated floats", flag))?;
    if parts.len() != 2 {
        bail!("--{} has {} components, expected 2", flag, parts.len());
    }
    Ok(Point::new(parts[0], parts[1]))
}

fn selected_variants(cli: &Cli) -> Vec<Variant> {
    Variant::STANDARD
        .into_iter()
        .filter(|v| cli.topology.is_empty() || cli.topology.contains(&v.topology))
        .filter(|v| cli.transit.is_empty() || cli.transit.contains(&v.transit))
        .collect()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_progress(info: ProgressInfo) {
    eprintln!(
        "[{:.1}s] iterations={} frontier={} costed={}",
        info.elapsed.as_secs_f64(),
        info.iterations,
        info.frontier_size,
        info.costed,
    );
}

fn run_timing(cli: &Cli, grid: Grid, seed: Point, variants: &[Variant], trials: usize) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for variant in variants {
        let engine = variant.engine(grid, cli.eps)?;
        let stats = harness::evaluate(&engine, seed, cli.iterations, trials)
            .with_context(|| format!("timing {} failed", variant))?;
        writeln!(stdout, "{}", variant)?;
        writeln!(stdout, "{}", stats)?;
    }
    Ok(())
}

fn propagate(cli: &Cli, grid: Grid, seed: Point, variants: &[Variant]) -> Result<Vec<(Variant, CostMap)>> {
    if !cli.progress {
        return Ok(harness::run_variants(
            grid,
            cli.eps,
            variants,
            seed,
            cli.iterations,
            cli.threads,
        )?);
    }

    let mut results = Vec::with_capacity(variants.len());
    for variant in variants {
        let engine = variant
            .engine(grid, cli.eps)?
            .with_progress_interval(Duration::from_millis(cli.progress_interval))
            .with_progress(Box::new(print_progress));
        tracing::info!(%variant, %seed, iterations = cli.iterations, "running variant");
        let costs = engine
            .run(seed, cli.iterations)
            .with_context(|| format!("{} failed", variant))?;
        results.push((*variant, costs));
    }
    Ok(results)
}

fn export(dir: &Path, format: FileFormat, grid: &Grid, results: &[(Variant, CostMap)]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    for (variant, costs) in results {
        let path = dir.join(format!("{}.{}", variant.slug(), format.extension()));
        io::save_grid(costs, grid, &path)
            .with_context(|| format!("cannot write {}", path.display()))?;
        tracing::info!(%variant, path = %path.display(), "costs saved");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let seed = parse_point(&cli.seed, "seed")?;
    let min = parse_point(&cli.min, "min")?;
    let max = parse_point(&cli.max, "max")?;
    let grid = Grid::new(cli.step, min, max).context("invalid grid")?;
    grid.check_seed(&seed)?;
    tracing::debug!(step = grid.step(), min = %grid.min(), max = %grid.max(), "grid");

    let variants = selected_variants(&cli);
    if variants.is_empty() {
        bail!("no variant selected");
    }

    if let Some(trials) = cli.trials {
        return run_timing(&cli, grid, seed, &variants, trials);
    }

    if !cli.quiet || cli.output_dir.is_some() {
        let (rows, cols) = grid
            .shape()
            .context("grid cannot be printed or exported (try a coarser --step)")?;
        tracing::debug!(rows, cols, "grid layout");
    }

    let results = propagate(&cli, grid, seed, &variants)?;

    if !cli.quiet {
        let mut stdout = std::io::stdout().lock();
        for (variant, costs) in &results {
            writeln!(stdout, "{}", variant)?;
            io::write_grid(&mut stdout, costs, &grid)?;
        }
    }

    if let Some(dir) = &cli.output_dir {
        export(dir, cli.format.into(), &grid, &results)?;
    }

    Ok(())
}
