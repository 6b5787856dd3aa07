// spider-nav: build and query surface-walking navigation grids.
//
// Commands:
//
// - `spider-nav build --scene scene.json [--config cfg.json] [--out grid.json]`
// - `spider-nav path --grid grid.json --from x,y,z --to x,y,z`
// - `spider-nav next --grid grid.json --from x,y,z --to x,y,z`
// - `spider-nav info --grid grid.json`
//
// Every command prints its answer as JSON on stdout. Logs go to stderr and
// are filtered through `RUST_LOG` (default `spider_nav=info`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use spider_nav::Vec3;
use spider_nav_cli::{parse_point, run_build, run_info, run_next, run_path};
use std::path::PathBuf;

/// Surface-walking navigation grids
#[derive(Parser)]
#[command(name = "spider-nav")]
#[command(about = "Build and query surface-walking navigation grids", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a grid from a scene file
    Build {
        /// Scene file: build volume plus box objects
        #[arg(long)]
        scene: PathBuf,

        /// Build config (defaults apply to missing fields)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to write the grid (defaults to the config's save path)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Find a path between the nodes nearest two points
    Path {
        #[arg(long)]
        grid: PathBuf,

        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec3,

        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec3,
    },

    /// Location and normal of the next node toward a target
    Next {
        #[arg(long)]
        grid: PathBuf,

        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Vec3,

        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Vec3,
    },

    /// Node and edge counts of a saved grid
    Info {
        #[arg(long)]
        grid: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spider_nav=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { scene, config, out } => {
            print_json(&run_build(&scene, config.as_deref(), out.as_deref())?)
        }
        Commands::Path { grid, from, to } => print_json(&run_path(&grid, from, to)?),
        Commands::Next { grid, from, to } => print_json(&run_next(&grid, from, to)?),
        Commands::Info { grid } => print_json(&run_info(&grid)?),
    }
}
