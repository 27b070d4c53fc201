//! Cost fields, weighted A* path search, pruning and branch growth over
//! the sphere graph.
#![forbid(unsafe_code)]

mod branch;
mod cost;
mod finder;
mod path;
mod prune;

pub use branch::grow_branches;
pub use cost::{CostField, Fracture, Horizon};
pub use finder::PathFinder;
pub use path::Path;
pub use prune::prune_paths;
