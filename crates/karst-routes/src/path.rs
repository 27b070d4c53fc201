use karst_geom::Vec3;
use karst_spheres::Sphere;

/// An ordered, non-empty run of sphere indices from start to end, plus
/// the accumulated traversal cost (the A* g-cost at the goal). Paths
/// reference spheres by index and never own them.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<u32>,
    cost: f32,
}

impl Path {
    pub fn new(points: Vec<u32>, cost: f32) -> Self {
        debug_assert!(!points.is_empty());
        Self { points, cost }
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.points[0]
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.points[self.points.len() - 1]
    }

    #[inline]
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Endpoint pair with the smaller index first, the pruner's lookup
    /// key.
    #[inline]
    pub fn endpoint_key(&self) -> (u32, u32) {
        let (a, b) = (self.start(), self.end());
        if a <= b { (a, b) } else { (b, a) }
    }

    /// The polyline the carving stage walks.
    pub fn positions(&self, spheres: &[Sphere]) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|&i| spheres[i as usize].pos)
            .collect()
    }
}
