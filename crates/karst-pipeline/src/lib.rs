//! One-shot orchestration of the cave skeleton phases.
#![forbid(unsafe_code)]

mod config;

pub use config::{
    Branching, Bounds, CaveConfig, CaveParams, ConfigError, Cost, Graph, HorizonDef, Packing,
    Pruning, load_params_from_path,
};

use std::time::Instant;

use karst_geom::Vec3;
use karst_graph::connect_neighbors;
use karst_routes::{CostField, Path, PathFinder, grow_branches, prune_paths};
use karst_spheres::SphereField;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// A world position the skeleton must route through. Supplied by the
/// host's scene placement; only the position matters here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyPoint {
    pub pos: Vec3,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseTimings {
    pub pack_ms: u32,
    pub connect_ms: u32,
    pub search_ms: u32,
    pub prune_ms: u32,
    pub branch_ms: u32,
}

/// Everything one generation pass produces. Re-running `generate`
/// replaces the whole structure; there is no incremental mode.
pub struct CaveSkeleton {
    pub field: SphereField,
    pub paths: Vec<Path>,
    /// Per sphere: whether any surviving path visits it. Lets the
    /// carving stage pick out corridor spheres without re-walking paths.
    pub corridor: Vec<bool>,
    /// Key-point pairs requested / actually connected by the search
    /// phase, before pruning and branching. Unequal counts mean the
    /// graph did not connect every pair — a usable, incomplete network.
    pub requested_pairs: usize,
    pub connected_pairs: usize,
    pub furthest_edge: f32,
    pub timings: PhaseTimings,
    pub seed: u64,
}

impl CaveSkeleton {
    /// The polylines (plus per-path cost) the carving stage sweeps.
    pub fn polylines(&self) -> Vec<(Vec<Vec3>, f32)> {
        self.paths
            .iter()
            .map(|p| (p.positions(&self.field.spheres), p.cost()))
            .collect()
    }
}

fn ms_since(t: Instant) -> u32 {
    t.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Runs the full pass: pack, connect, pairwise key-point search, prune,
/// branch, mark. Packing and branching consume the seeded RNG
/// sequentially; the two fan-out phases collect in deterministic order,
/// so a fixed seed reproduces the skeleton bit for bit.
pub fn generate(params: &CaveParams) -> Result<CaveSkeleton, ConfigError> {
    params.validate()?;

    let seed = match params.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::thread_rng().next_u64();
            log::info!("seed drawn from entropy: {seed}");
            seed
        }
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let t0 = Instant::now();
    let mut field = SphereField::pack(
        params.bounds,
        params.min_radius,
        params.max_radius,
        params.spacing_limit,
        params.rejection_samples,
        &mut rng,
    );
    let pack_ms = ms_since(t0);
    log::info!(target: "perf", "ms={} phase=pack spheres={}", pack_ms, field.spheres.len());

    let t0 = Instant::now();
    let furthest_edge = connect_neighbors(&mut field, params.search_cells, params.ideal_neighbors);
    let connect_ms = ms_since(t0);
    log::info!(target: "perf", "ms={} phase=connect furthest_edge={:.3}", connect_ms, furthest_edge);

    let cost = CostField::new(
        params.horizons.clone(),
        params.fractures.clone(),
        params.horizon_weight,
        params.fracture_weight,
    );
    let finder = PathFinder::new(&field, &cost, furthest_edge, params.search_cells);

    let mut pairs = Vec::new();
    for i in 0..params.key_points.len() {
        for j in (i + 1)..params.key_points.len() {
            pairs.push((i, j));
        }
    }

    let t0 = Instant::now();
    let found: Vec<Option<Path>> = pairs
        .par_iter()
        .map(|&(i, j)| finder.find_path(params.key_points[i].pos, params.key_points[j].pos))
        .collect();
    let mut paths: Vec<Path> = found.into_iter().flatten().collect();
    let requested_pairs = pairs.len();
    let connected_pairs = paths.len();
    let search_ms = ms_since(t0);
    log::info!(
        target: "perf",
        "ms={} phase=search pairs={} found={}",
        search_ms,
        pairs.len(),
        paths.len()
    );

    let t0 = Instant::now();
    let before = paths.len();
    paths = prune_paths(paths, params.prune_exponent);
    let prune_ms = ms_since(t0);
    log::info!(
        target: "perf",
        "ms={} phase=prune dropped={} kept={}",
        prune_ms,
        before - paths.len(),
        paths.len()
    );

    let t0 = Instant::now();
    let branches = grow_branches(
        &finder,
        &paths,
        params.branch_per_node,
        params.branch_max_distance,
        params.branch_probability,
        &mut rng,
    );
    let branch_ms = ms_since(t0);
    log::info!(target: "perf", "ms={} phase=branch grown={}", branch_ms, branches.len());
    paths.extend(branches);

    let mut corridor = vec![false; field.spheres.len()];
    for path in &paths {
        for &p in path.points() {
            corridor[p as usize] = true;
        }
    }

    Ok(CaveSkeleton {
        field,
        paths,
        corridor,
        requested_pairs,
        connected_pairs,
        furthest_edge,
        timings: PhaseTimings {
            pack_ms,
            connect_ms,
            search_ms,
            prune_ms,
            branch_ms,
        },
        seed,
    })
}
