use std::cmp::Ordering;

use karst_geom::Vec3;
use karst_heap::{HeapItem, IndexedHeap};

use crate::SphereField;

/// Heap entry for proximity queries. Ordered so that the *nearest*
/// candidate is extracted first; the true distance is resolved with a
/// single square root only for candidates that survive extraction.
#[derive(Clone, Copy, Debug)]
pub struct NearCandidate {
    pub sphere: u32,
    pub dist_sq: f32,
    pub dist: f32,
    slot: usize,
}

impl NearCandidate {
    pub fn new(sphere: u32, dist_sq: f32) -> Self {
        Self {
            sphere,
            dist_sq,
            dist: 0.0,
            slot: 0,
        }
    }

    pub fn resolve_dist(&mut self) {
        self.dist = self.dist_sq.sqrt();
    }
}

impl HeapItem for NearCandidate {
    fn heap_slot(&self) -> usize {
        self.slot
    }
    fn set_heap_slot(&mut self, slot: usize) {
        self.slot = slot;
    }
}

impl PartialEq for NearCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.dist_sq.total_cmp(&other.dist_sq) == Ordering::Equal
    }
}

impl Eq for NearCandidate {}

impl PartialOrd for NearCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NearCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted: smaller squared distance ranks greater.
        other.dist_sq.total_cmp(&self.dist_sq)
    }
}

impl SphereField {
    /// Snaps a world position to the nearest packed sphere, scanning the
    /// cell cube within `search_cells` of the (clamped) position. `None`
    /// when the neighborhood holds no spheres at all.
    pub fn nearest_sphere(&self, pos: Vec3, search_cells: i32) -> Option<u32> {
        let pos = self.bounds.clamp(pos);
        let cube = self.grid.cell_cube_around(pos, search_cells);
        let mut heap = IndexedHeap::with_capacity(cube.cell_count());
        for (x, y, z) in cube.iter() {
            let id = self.grid.get(x, y, z);
            if id == crate::EMPTY_CELL {
                continue;
            }
            let other = self.spheres[id as usize].pos;
            heap.push(NearCandidate::new(id, pos.distance_sq(other)));
        }
        heap.pop().ok().map(|c| c.sphere)
    }
}
