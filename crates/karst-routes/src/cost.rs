use karst_geom::{Vec3, smoothstep};

/// A height band with a traversal cost, normally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Horizon {
    pub height: f32,
    pub cost: f32,
}

/// A preferred travel plane. Travel *along* the stored normal is
/// expensive; travel orthogonal to it (inside the fracture plane) is
/// cheap.
#[derive(Clone, Copy, Debug)]
pub struct Fracture {
    pub normal: Vec3,
}

impl Fracture {
    pub fn new(normal: Vec3) -> Self {
        Self {
            normal: normal.normalized(),
        }
    }
}

/// The two scalar cost contributors sampled during path search. Immutable
/// for the duration of one generation pass.
#[derive(Clone, Debug)]
pub struct CostField {
    horizons: Vec<Horizon>,
    fractures: Vec<Fracture>,
    horizon_weight: f32,
    fracture_weight: f32,
    cheapest_horizon: f32,
}

impl CostField {
    pub fn new(
        mut horizons: Vec<Horizon>,
        fractures: Vec<Fracture>,
        horizon_weight: f32,
        fracture_weight: f32,
    ) -> Self {
        horizons.sort_by(|a, b| a.height.total_cmp(&b.height));
        let cheapest_horizon = horizons
            .iter()
            .map(|h| h.cost)
            .fold(f32::INFINITY, f32::min);
        Self {
            horizons,
            fractures,
            horizon_weight,
            fracture_weight,
            // No horizons means no band discount anywhere; keeping this
            // finite keeps the search heuristic finite too.
            cheapest_horizon: if cheapest_horizon.is_finite() {
                cheapest_horizon
            } else {
                0.0
            },
        }
    }

    pub fn unweighted() -> Self {
        Self::new(Vec::new(), Vec::new(), 0.0, 0.0)
    }

    /// Height-banded cost: the smooth interpolation between the two
    /// bracketing horizons, scaled by the horizon weight.
    ///
    /// Outside the bracketed range the field is asymmetric by decision:
    /// below the lowest horizon the interpolation parameter clamps to 0,
    /// yielding the lowest horizon's cost; above the highest horizon —
    /// and whenever fewer than two horizons exist — the cost is 0.
    pub fn horizon_cost(&self, height: f32) -> f32 {
        for i in 1..self.horizons.len() {
            if height < self.horizons[i].height {
                let lo = self.horizons[i - 1];
                let hi = self.horizons[i];
                let t = (height - lo.height) / (hi.height - lo.height);
                return smoothstep(lo.cost, hi.cost, t) * self.horizon_weight;
            }
        }
        0.0
    }

    /// Direction-banded cost. Each fracture contributes nothing when
    /// travel is parallel to its normal and a full unit when orthogonal,
    /// subtracted from the fracture count — so travel along a normal is
    /// expensive, travel inside the fracture plane cheap. Asymmetric per
    /// edge direction by construction.
    pub fn fracture_cost(&self, direction: Vec3) -> f32 {
        let mut cost = self.fractures.len() as f32;
        for f in &self.fractures {
            let align = direction.dot(f.normal).abs();
            cost -= (1.0 - align) * (1.0 - align);
        }
        cost * self.fracture_weight
    }

    /// Raw (unweighted) minimum horizon cost; 0 with no horizons. Feeds
    /// the path-finder's heuristic inflation.
    pub fn cheapest_horizon_cost(&self) -> f32 {
        self.cheapest_horizon
    }
}
