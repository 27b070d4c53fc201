use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use karst_geom::{Aabb, Vec3};
use karst_routes::{Fracture, Horizon};

use crate::KeyPoint;

#[derive(Clone, Debug, Deserialize)]
pub struct CaveConfig {
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub packing: Packing,
    #[serde(default)]
    pub graph: Graph,
    #[serde(default)]
    pub cost: Cost,
    #[serde(default)]
    pub pruning: Pruning,
    #[serde(default)]
    pub branching: Branching,
    #[serde(default = "default_key_points")]
    pub key_points: Vec<[f32; 3]>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            packing: Packing::default(),
            graph: Graph::default(),
            cost: Cost::default(),
            pruning: Pruning::default(),
            branching: Branching::default(),
            key_points: default_key_points(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Bounds {
    #[serde(default = "default_bounds_min")]
    pub min: [f32; 3],
    #[serde(default = "default_bounds_max")]
    pub max: [f32; 3],
}
fn default_bounds_min() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}
fn default_bounds_max() -> [f32; 3] {
    [50.0, 50.0, 50.0]
}
impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: default_bounds_min(),
            max: default_bounds_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Packing {
    #[serde(default = "default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "default_spacing_limit")]
    pub spacing_limit: f32,
    #[serde(default = "default_rejection_samples")]
    pub rejection_samples: u32,
}
fn default_min_radius() -> f32 {
    1.0
}
fn default_max_radius() -> f32 {
    3.0
}
fn default_spacing_limit() -> f32 {
    2.0
}
fn default_rejection_samples() -> u32 {
    30
}
impl Default for Packing {
    fn default() -> Self {
        Self {
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            spacing_limit: default_spacing_limit(),
            rejection_samples: default_rejection_samples(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Graph {
    #[serde(default = "default_search_cells")]
    pub search_cells: i32,
    #[serde(default = "default_ideal_neighbors")]
    pub ideal_neighbors: usize,
}
fn default_search_cells() -> i32 {
    5
}
fn default_ideal_neighbors() -> usize {
    30
}
impl Default for Graph {
    fn default() -> Self {
        Self {
            search_cells: default_search_cells(),
            ideal_neighbors: default_ideal_neighbors(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Cost {
    #[serde(default = "default_horizon_weight")]
    pub horizon_weight: f32,
    #[serde(default = "default_fracture_weight")]
    pub fracture_weight: f32,
    #[serde(default)]
    pub horizons: Vec<HorizonDef>,
    #[serde(default)]
    pub fractures: Vec<[f32; 3]>,
}
fn default_horizon_weight() -> f32 {
    10.0
}
fn default_fracture_weight() -> f32 {
    10.0
}
impl Default for Cost {
    fn default() -> Self {
        Self {
            horizon_weight: default_horizon_weight(),
            fracture_weight: default_fracture_weight(),
            horizons: Vec::new(),
            fractures: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HorizonDef {
    pub height: f32,
    pub cost: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pruning {
    #[serde(default = "default_prune_exponent")]
    pub exponent: f32,
}
fn default_prune_exponent() -> f32 {
    1.0
}
impl Default for Pruning {
    fn default() -> Self {
        Self {
            exponent: default_prune_exponent(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Branching {
    #[serde(default = "default_branch_per_node")]
    pub per_node_coefficient: f32,
    #[serde(default = "default_branch_max_distance")]
    pub max_distance: f32,
    #[serde(default = "default_branch_probability")]
    pub spawn_probability: f32,
}
fn default_branch_per_node() -> f32 {
    0.5
}
fn default_branch_max_distance() -> f32 {
    10.0
}
fn default_branch_probability() -> f32 {
    0.5
}
impl Default for Branching {
    fn default() -> Self {
        Self {
            per_node_coefficient: default_branch_per_node(),
            max_distance: default_branch_max_distance(),
            spawn_probability: default_branch_probability(),
        }
    }
}

fn default_key_points() -> Vec<[f32; 3]> {
    vec![[5.0, 5.0, 5.0], [45.0, 45.0, 45.0]]
}

/// Flattened snapshot of the config, used by the generation pass.
#[derive(Clone, Debug)]
pub struct CaveParams {
    pub bounds: Aabb,
    pub min_radius: f32,
    pub max_radius: f32,
    pub spacing_limit: f32,
    pub rejection_samples: u32,
    pub search_cells: i32,
    pub ideal_neighbors: usize,
    pub horizon_weight: f32,
    pub fracture_weight: f32,
    pub horizons: Vec<Horizon>,
    pub fractures: Vec<Fracture>,
    pub prune_exponent: f32,
    pub branch_per_node: f32,
    pub branch_max_distance: f32,
    pub branch_probability: f32,
    pub key_points: Vec<KeyPoint>,
    pub seed: Option<u64>,
}

impl CaveParams {
    pub fn default() -> Self {
        Self::from_config(&CaveConfig::default())
    }

    pub fn from_config(cfg: &CaveConfig) -> Self {
        let v = |a: [f32; 3]| Vec3::new(a[0], a[1], a[2]);
        Self {
            bounds: Aabb::new(v(cfg.bounds.min), v(cfg.bounds.max)),
            min_radius: cfg.packing.min_radius,
            max_radius: cfg.packing.max_radius,
            spacing_limit: cfg.packing.spacing_limit,
            rejection_samples: cfg.packing.rejection_samples,
            search_cells: cfg.graph.search_cells,
            ideal_neighbors: cfg.graph.ideal_neighbors,
            horizon_weight: cfg.cost.horizon_weight,
            fracture_weight: cfg.cost.fracture_weight,
            horizons: cfg
                .cost
                .horizons
                .iter()
                .map(|h| Horizon {
                    height: h.height,
                    cost: h.cost,
                })
                .collect(),
            fractures: cfg.cost.fractures.iter().map(|&n| Fracture::new(v(n))).collect(),
            prune_exponent: cfg.pruning.exponent,
            branch_per_node: cfg.branching.per_node_coefficient,
            branch_max_distance: cfg.branching.max_distance,
            branch_probability: cfg.branching.spawn_probability,
            key_points: cfg.key_points.iter().map(|&p| KeyPoint { pos: v(p) }).collect(),
            seed: cfg.seed,
        }
    }

    /// Configuration-range preconditions (spec class (a)): fail fast
    /// before any packing work happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.min_radius));
        }
        if self.max_radius < self.min_radius {
            return Err(ConfigError::RadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !(self.spacing_limit >= 1.0) {
            return Err(ConfigError::SpacingBelowOne(self.spacing_limit));
        }
        if self.rejection_samples == 0 {
            return Err(ConfigError::NoRejectionSamples);
        }
        let size = self.bounds.size();
        if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
            return Err(ConfigError::EmptyBounds);
        }
        if self.search_cells < 1 {
            return Err(ConfigError::OutOfRange("graph.search_cells"));
        }
        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(ConfigError::OutOfRange("branching.spawn_probability"));
        }
        if !(self.branch_per_node >= 0.0) {
            return Err(ConfigError::OutOfRange("branching.per_node_coefficient"));
        }
        if !(self.branch_max_distance >= 0.0) {
            return Err(ConfigError::OutOfRange("branching.max_distance"));
        }
        if !(self.prune_exponent > 0.0) {
            return Err(ConfigError::OutOfRange("pruning.exponent"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    NonPositiveRadius(f32),
    RadiusRange { min: f32, max: f32 },
    SpacingBelowOne(f32),
    NoRejectionSamples,
    EmptyBounds,
    OutOfRange(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveRadius(r) => {
                write!(f, "packing.min_radius must be positive, got {r}")
            }
            ConfigError::RadiusRange { min, max } => {
                write!(f, "packing radius range is inverted: min {min} > max {max}")
            }
            ConfigError::SpacingBelowOne(s) => {
                write!(f, "packing.spacing_limit must be at least 1, got {s}")
            }
            ConfigError::NoRejectionSamples => {
                f.write_str("packing.rejection_samples must be at least 1")
            }
            ConfigError::EmptyBounds => f.write_str("bounds box has no volume"),
            ConfigError::OutOfRange(field) => write!(f, "{field} is out of range"),
        }
    }
}

impl Error for ConfigError {}

pub fn load_params_from_path(path: &Path) -> Result<CaveParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: CaveConfig = toml::from_str(&s)?;
    Ok(CaveParams::from_config(&cfg))
}
