use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crystal_common::LatticeConfig;
use crystal_kernel::{Crystal, Lattice, raw_edge_counts};
use crystal_render::{DebugTextRenderer, LineBatch, PointBatch, Renderer};
use crystal_tools::LatticeInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crystal-cli", about = "CLI tool for crystal lattice operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a lattice and report geometry counts
    Build {
        #[command(flatten)]
        lattice: LatticeArgs,
    },
    /// Run the fracture/heal animation on a simulated clock
    Simulate {
        #[command(flatten)]
        lattice: LatticeArgs,
        /// Simulated seconds to run
        #[arg(short, long, default_value = "10")]
        seconds: f64,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
        /// RNG seed for batch selection
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Print a text frame of the animating edges at the end
        #[arg(long)]
        dump: bool,
    },
    /// Print the effective configuration as YAML
    Config {
        #[command(flatten)]
        lattice: LatticeArgs,
    },
}

/// Lattice parameters: an optional file, then per-field overrides.
#[derive(Args, Debug, Default)]
struct LatticeArgs {
    /// YAML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    depth: Option<u32>,
    #[arg(long)]
    radius: Option<f64>,
    /// Fracture phase length in seconds
    #[arg(long)]
    breaking: Option<f64>,
    /// Heal phase length in seconds
    #[arg(long)]
    healing: Option<f64>,
    #[arg(long)]
    point_radius: Option<f64>,
}

impl LatticeArgs {
    /// Load the file (if any), apply overrides, and clamp into valid ranges.
    fn resolve(&self) -> Result<LatticeConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => LatticeConfig::default(),
        };
        if let Some(v) = self.width {
            cfg.grid_width = v;
        }
        if let Some(v) = self.height {
            cfg.grid_height = v;
        }
        if let Some(v) = self.depth {
            cfg.grid_depth = v;
        }
        if let Some(v) = self.radius {
            cfg.radius = v;
        }
        if let Some(v) = self.breaking {
            cfg.breaking_duration_secs = v;
        }
        if let Some(v) = self.healing {
            cfg.healing_duration_secs = v;
        }
        if let Some(v) = self.point_radius {
            cfg.point_radius = v;
        }

        if let Err(e) = cfg.validate() {
            tracing::warn!("{e}; clamping configuration");
        }
        Ok(cfg.clamped())
    }
}

fn load_config(path: &Path) -> Result<LatticeConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: LatticeConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        _ => serde_yaml::from_str(&text)
            .with_context(|| format!("parsing YAML config {}", path.display()))?,
    };
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("crystal-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", crystal_render::crate_info());
            println!("tools: {}", crystal_tools::crate_info());
            println!(
                "dedup tolerance: {:e}, pick attempts per slot: {}",
                crystal_kernel::EPSILON,
                crystal_kernel::MAX_PICK_ATTEMPTS
            );
        }
        Commands::Build { lattice } => {
            let cfg = lattice.resolve()?;
            let built = Lattice::generate(&cfg, 0);
            let (rings, pillars) =
                raw_edge_counts(cfg.grid_width, cfg.grid_height, cfg.grid_depth);
            let points = PointBatch::from_lattice(&built);

            println!(
                "Lattice {}x{}x{} radius={}",
                cfg.grid_width, cfg.grid_height, cfg.grid_depth, cfg.radius
            );
            println!("Raw edges: {} ({rings} ring + {pillars} pillar)", built.raw_edge_count());
            println!(
                "Unique edges: {} ({} duplicates removed)",
                built.edge_count(),
                built.raw_edge_count() - built.edge_count()
            );
            println!(
                "Unique vertices: {} ({} bytes of point instances)",
                built.points().len(),
                points.as_bytes().len()
            );
        }
        Commands::Simulate {
            lattice,
            seconds,
            fps,
            seed,
            dump,
        } => {
            let cfg = lattice.resolve()?;
            if fps == 0 {
                anyhow::bail!("fps must be at least 1");
            }
            let frame = Duration::from_secs_f64(1.0 / fps as f64);
            let frames = (seconds.max(0.0) * fps as f64).round() as u64;

            println!("Simulate: seed={seed}, fps={fps}, frames={frames}");

            let mut crystal = Crystal::new(&cfg, seed);
            let mut lines = LineBatch::new();
            let t0 = Instant::now();
            let mut issued = 0;

            for i in 0..frames {
                let now = t0 + frame * i as u32;
                if let Some(report) = crystal.tick(now) {
                    issued += report.issued;
                }
                lines.refresh(crystal.lattice());

                if (i + 1) % fps as u64 == 0 {
                    let summary = LatticeInspector::summary(&crystal, now);
                    println!("  t={:>5.1}s {summary}", (i + 1) as f64 / fps as f64);
                }
            }

            println!(
                "Done: {} batches, {issued} fractures started, {} line vertices",
                crystal.scheduler().batches_issued(),
                lines.vertex_count()
            );
            if dump {
                print!("{}", DebugTextRenderer::new().render(crystal.lattice()));
            }
        }
        Commands::Config { lattice } => {
            let cfg = lattice.resolve()?;
            print!("{}", serde_yaml::to_string(&cfg)?);
        }
    }

    Ok(())
}
