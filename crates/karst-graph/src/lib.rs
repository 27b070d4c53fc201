//! Directed K-nearest-neighbor graph over a packed sphere field.
#![forbid(unsafe_code)]

use karst_heap::IndexedHeap;
use karst_spheres::{EMPTY_CELL, Edge, NearCandidate, SphereField};
use rayon::prelude::*;

/// Populates every sphere's edge list with its `ideal_neighbors` closest
/// neighbors found within `search_cells` grid cells, and returns the
/// longest connected edge distance (consumed by the path-finder
/// heuristic).
///
/// Each sphere's nearest set is computed independently, so the graph is
/// *directed*: A holding an edge to B does not imply B holds one back to
/// A. Downstream cost math depends on this asymmetry; do not
/// symmetrize. Edge lists come out sorted ascending by distance and may
/// hold fewer than `ideal_neighbors` entries in sparse neighborhoods.
///
/// The per-sphere scans are independent reads of the shared grid, so the
/// phase shards across the rayon pool; results are collected in sphere
/// order to keep output deterministic for a fixed packing.
pub fn connect_neighbors(
    field: &mut SphereField,
    search_cells: i32,
    ideal_neighbors: usize,
) -> f32 {
    let width = (2 * search_cells + 1).max(1) as usize;
    let capacity = width * width * width;

    let snapshot: &SphereField = field;
    let built: Vec<(Vec<Edge>, f32)> = (0..snapshot.spheres.len())
        .into_par_iter()
        .map_init(
            || IndexedHeap::with_capacity(capacity),
            |heap, i| collect_edges(snapshot, i, search_cells, ideal_neighbors, heap),
        )
        .collect();

    let mut furthest = 0.0f32;
    for (sphere, (edges, local_max)) in field.spheres.iter_mut().zip(built) {
        sphere.edges = edges;
        furthest = furthest.max(local_max);
    }
    furthest
}

fn collect_edges(
    field: &SphereField,
    sphere: usize,
    search_cells: i32,
    ideal_neighbors: usize,
    heap: &mut IndexedHeap<NearCandidate>,
) -> (Vec<Edge>, f32) {
    let pos = field.spheres[sphere].pos;
    heap.clear();
    for (x, y, z) in field.grid.cell_cube_around(pos, search_cells).iter() {
        let id = field.grid.get(x, y, z);
        if id == EMPTY_CELL {
            continue;
        }
        heap.push(NearCandidate::new(
            id,
            pos.distance_sq(field.spheres[id as usize].pos),
        ));
    }

    // The sphere occupies its own cell; discard it before taking the K
    // nearest in ascending order.
    heap.pop().expect("own cell is always occupied");

    let mut edges = Vec::with_capacity(ideal_neighbors.min(heap.len()));
    let mut local_max = 0.0f32;
    while edges.len() < ideal_neighbors {
        let Ok(mut candidate) = heap.pop() else {
            break;
        };
        candidate.resolve_dist();
        local_max = local_max.max(candidate.dist);
        edges.push(Edge {
            target: candidate.sphere,
            dist: candidate.dist,
        });
    }
    (edges, local_max)
}
