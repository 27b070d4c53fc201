use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use karst_pipeline::{CaveParams, generate, load_params_from_path};

#[derive(Parser, Debug)]
#[command(name = "karst", about = "Cave skeleton generator", version)]
struct Args {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Only log warnings and errors.
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let mut params = match &args.config {
        Some(path) => match load_params_from_path(path) {
            Ok(params) => params,
            Err(e) => {
                eprintln!("failed to load config {}: {e}", path.display());
                return ExitCode::from(2);
            }
        },
        None => CaveParams::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = Some(seed);
    }

    let skeleton = match generate(&params) {
        Ok(skeleton) => skeleton,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let corridor_count = skeleton.corridor.iter().filter(|&&c| c).count();
    let total_cost: f32 = skeleton.paths.iter().map(|p| p.cost()).sum();
    log::info!(
        "seed={} spheres={} paths={} corridor_spheres={} total_cost={:.2}",
        skeleton.seed,
        skeleton.field.spheres.len(),
        skeleton.paths.len(),
        corridor_count,
        total_cost
    );
    let t = skeleton.timings;
    log::info!(
        "timings ms: pack={} connect={} search={} prune={} branch={}",
        t.pack_ms,
        t.connect_ms,
        t.search_ms,
        t.prune_ms,
        t.branch_ms
    );

    // A disconnected graph legitimately yields fewer paths than key-point
    // pairs; the skeleton is still usable.
    if skeleton.connected_pairs < skeleton.requested_pairs {
        log::warn!(
            "network is incomplete: {} of {} key-point pairs connected",
            skeleton.connected_pairs,
            skeleton.requested_pairs
        );
    }

    ExitCode::SUCCESS
}
