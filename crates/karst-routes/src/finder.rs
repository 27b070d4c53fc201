use std::cmp::Ordering;

use karst_geom::Vec3;
use karst_heap::{HeapItem, IndexedHeap};
use karst_spheres::SphereField;

use crate::cost::CostField;
use crate::path::Path;

const NO_NODE: u32 = u32::MAX;

/// Search node arena entry. Back-pointers index the arena, not the
/// sphere list, so lazy deletion keeps every node's predecessor frozen
/// at push time.
#[derive(Clone, Copy)]
struct SearchNode {
    sphere: u32,
    prev: u32,
    g: f32,
    f: f32,
}

/// Open-set heap entry; ranks lower f-cost as greater so the cheapest
/// frontier node pops first.
#[derive(Clone, Copy)]
struct OpenEntry {
    node: u32,
    f: f32,
    slot: usize,
}

impl HeapItem for OpenEntry {
    fn heap_slot(&self) -> usize {
        self.slot
    }
    fn set_heap_slot(&mut self, slot: usize) {
        self.slot = slot;
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.total_cmp(&other.f) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

/// Weighted A* over the directed neighbor graph.
///
/// Edge traversal cost is the edge length scaled by
/// `1 + horizon_cost(target height) + fracture_cost(travel direction)`.
/// The heuristic inflates the Euclidean remainder by
/// `1 + cheapest_horizon / furthest_edge` to pull the frontier toward
/// cheap horizons. That inflation is *not* an admissible bound — it is a
/// topology-shaping tunable inherited from the source design, and
/// "fixing" it would change generated cave layouts.
pub struct PathFinder<'a> {
    pub field: &'a SphereField,
    pub cost: &'a CostField,
    /// Longest connected edge distance, from graph construction.
    pub furthest_edge: f32,
    /// Snap search radius in grid cells.
    pub snap_cells: i32,
}

impl<'a> PathFinder<'a> {
    pub fn new(
        field: &'a SphereField,
        cost: &'a CostField,
        furthest_edge: f32,
        snap_cells: i32,
    ) -> Self {
        Self {
            field,
            cost,
            furthest_edge,
            snap_cells,
        }
    }

    /// Snaps both world positions to their nearest packed spheres and
    /// searches between them. `None` when either snap finds no sphere or
    /// the graph does not connect the endpoints; the surrounding pass
    /// carries on either way.
    pub fn find_path(&self, start_pos: Vec3, end_pos: Vec3) -> Option<Path> {
        let start = self.field.nearest_sphere(start_pos, self.snap_cells);
        let end = self.field.nearest_sphere(end_pos, self.snap_cells);
        let (Some(start), Some(end)) = (start, end) else {
            log::warn!("key point snap failed; no spheres within range");
            return None;
        };
        self.find_between(start, end)
    }

    /// A* between two already-snapped spheres.
    pub fn find_between(&self, start: u32, end: u32) -> Option<Path> {
        let spheres = &self.field.spheres;
        let end_pos = spheres[end as usize].pos;

        let mut best_f = vec![f32::INFINITY; spheres.len()];
        let mut arena: Vec<SearchNode> = Vec::new();
        let mut open = IndexedHeap::with_capacity(64);

        let inflation = 1.0
            + if self.furthest_edge > 0.0 {
                self.cost.cheapest_horizon_cost() / self.furthest_edge
            } else {
                0.0
            };

        let h0 = spheres[start as usize].pos.distance(end_pos) * inflation;
        arena.push(SearchNode {
            sphere: start,
            prev: NO_NODE,
            g: 0.0,
            f: h0,
        });
        best_f[start as usize] = h0;
        open.push(OpenEntry {
            node: 0,
            f: h0,
            slot: 0,
        });

        let mut goal = None;
        while let Ok(entry) = open.pop() {
            let node = arena[entry.node as usize];
            // Lazy deletion: a better route to this sphere was pushed
            // after this entry.
            if best_f[node.sphere as usize] < node.f {
                continue;
            }
            if node.sphere == end {
                goal = Some(entry.node);
                break;
            }

            let u = &spheres[node.sphere as usize];
            for edge in &u.edges {
                let v = &spheres[edge.target as usize];
                let horizon = self.cost.horizon_cost(v.pos.y);
                let fracture = self.cost.fracture_cost((u.pos - v.pos).normalized());
                let g = node.g + edge.dist * (1.0 + horizon + fracture);
                let f = g + v.pos.distance(end_pos) * inflation;
                if best_f[edge.target as usize] < f {
                    continue;
                }
                best_f[edge.target as usize] = f;
                let id = arena.len() as u32;
                arena.push(SearchNode {
                    sphere: edge.target,
                    prev: entry.node,
                    g,
                    f,
                });
                open.push(OpenEntry {
                    node: id,
                    f,
                    slot: 0,
                });
            }
        }

        let Some(goal) = goal else {
            log::warn!("no path found between spheres {start} and {end}");
            return None;
        };

        let total = arena[goal as usize].g;
        let mut points = Vec::new();
        let mut walk = goal;
        while walk != NO_NODE {
            let node = arena[walk as usize];
            points.push(node.sphere);
            walk = node.prev;
        }
        points.reverse();
        Some(Path::new(points, total))
    }
}
