use karst_spheres::sample;
use rand::Rng;

use crate::finder::PathFinder;
use crate::path::Path;

/// Grows stochastic side tunnels off the trunk paths. Per trunk,
/// `ceil(point_count * per_node_coefficient)` attempts are made; each
/// fires with `spawn_probability`, picks a random trunk point, offsets
/// it by a uniform point inside a `max_branch_distance` ball, snaps the
/// offset to the nearest packed sphere and searches from the trunk point
/// to it. Attempts whose snap or search fails are skipped silently.
///
/// Returns the new branch paths only; the caller appends them to the
/// working set. Deterministic for a fixed RNG state.
pub fn grow_branches(
    finder: &PathFinder<'_>,
    trunks: &[Path],
    per_node_coefficient: f32,
    max_branch_distance: f32,
    spawn_probability: f32,
    rng: &mut impl Rng,
) -> Vec<Path> {
    let mut branches = Vec::new();
    for trunk in trunks {
        let attempts = (trunk.len() as f32 * per_node_coefficient).ceil() as usize;
        for _ in 0..attempts {
            if rng.gen_range(0.0f32..1.0) > spawn_probability {
                continue;
            }
            let anchor = trunk.points()[rng.gen_range(0..trunk.len())];
            let offset = sample::in_unit_ball(rng) * max_branch_distance;
            let target_pos = finder.field.spheres[anchor as usize].pos + offset;
            let Some(target) = finder.field.nearest_sphere(target_pos, finder.snap_cells) else {
                continue;
            };
            if let Some(path) = finder.find_between(anchor, target) {
                branches.push(path);
            }
        }
    }
    branches
}
