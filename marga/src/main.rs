//! Marga - generate a waypoint roadmap for a ROS map
//!
//! ```text
//! marga maps/office.yaml --config configs/marga.yaml --svg office.svg --list
//! ```
//!
//! Logs a summary, optionally prints every waypoint and edge, and optionally
//! writes an SVG of the roadmap over the map.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use marga::{
    GenerationBudget, MargaConfig, RoadmapBuilder, RoadmapError, SvgOptions, load_map, render_svg,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map YAML file (ROS map_server format)
    map: PathBuf,

    /// Configuration file (defaults to configs/marga.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (overrides the configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generation timeout in milliseconds (overrides the configuration)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write an SVG visualization to this path
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Label waypoints in the SVG
    #[arg(long)]
    labels: bool,

    /// Print every waypoint and edge
    #[arg(short, long)]
    list: bool,
}

fn load_config(path: Option<&Path>) -> Result<MargaConfig, String> {
    let config = match path {
        Some(path) => MargaConfig::load(path),
        None => MargaConfig::load_default(),
    };
    config.map_err(|e| format!("Failed to load config: {}", e))
}

fn run(args: Args) -> Result<bool, String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.roadmap.seed = Some(seed);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.roadmap.timeout_ms = Some(timeout_ms);
    }

    let grid = load_map(&args.map, &config.map).map_err(|e| e.to_string())?;

    // `q` + Enter on stdin stops generation and keeps what was built
    let cancel = Arc::new(AtomicBool::new(false));
    let budget = GenerationBudget::unlimited().with_cancel_flag(cancel.clone());
    std::thread::Builder::new()
        .name("stdin-cancel".into())
        .spawn(move || {
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_ok() && line.trim() == "q" {
                cancel.store(true, Ordering::Relaxed);
            }
        })
        .map_err(|e| format!("Failed to spawn stdin listener: {}", e))?;

    let roadmap = match RoadmapBuilder::new(&grid, config.roadmap)
        .with_budget(budget)
        .build()
    {
        Ok(roadmap) => roadmap,
        Err(e @ RoadmapError::InsufficientFreeSpace { .. }) => {
            return Err(format!("{} (is the map mostly unknown?)", e));
        }
        Err(e) => return Err(e.to_string()),
    };

    let stats = roadmap.stats();
    log::info!(
        "Status: {} | {} waypoints | {} edges ({} local, {} repair) | {:.1}ms",
        roadmap.status(),
        roadmap.len(),
        roadmap.edge_count(),
        stats.local_edges,
        stats.repair_edges,
        stats.elapsed.as_secs_f64() * 1000.0
    );

    if args.list {
        for wp in roadmap.waypoint_list() {
            println!("waypoint {} {:.3} {:.3}", wp.id, wp.x, wp.y);
        }
        for edge in roadmap.edge_list() {
            println!("edge {} {}", edge.a, edge.b);
        }
    }

    if let Some(svg_path) = &args.svg {
        let options = SvgOptions {
            labels: args.labels,
            ..SvgOptions::default()
        };
        std::fs::write(svg_path, render_svg(&grid, &roadmap, &options))
            .map_err(|e| format!("Failed to write {}: {}", svg_path.display(), e))?;
        log::info!("Wrote {}", svg_path.display());
    }

    Ok(roadmap.is_connected())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
