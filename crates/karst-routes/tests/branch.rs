use karst_geom::{Aabb, Vec3};
use karst_graph::connect_neighbors;
use karst_routes::{CostField, Path, PathFinder, grow_branches};
use karst_spheres::SphereField;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct Fixture {
    field: SphereField,
    furthest: f32,
}

fn fixture() -> Fixture {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(15.0));
    let mut rng = ChaCha8Rng::seed_from_u64(1001);
    let mut field = SphereField::pack(bounds, 1.0, 1.5, 2.0, 30, &mut rng);
    let furthest = connect_neighbors(&mut field, 5, 8);
    Fixture { field, furthest }
}

fn trunk(fx: &Fixture, cost: &CostField) -> Path {
    let finder = PathFinder::new(&fx.field, cost, fx.furthest, 10);
    finder
        .find_path(Vec3::splat(1.0), Vec3::splat(14.0))
        .expect("dense packing connects the corners")
}

#[test]
fn branches_anchor_on_trunk_points() {
    let fx = fixture();
    let cost = CostField::unweighted();
    let trunk = trunk(&fx, &cost);
    let finder = PathFinder::new(&fx.field, &cost, fx.furthest, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let branches = grow_branches(&finder, std::slice::from_ref(&trunk), 2.0, 6.0, 1.0, &mut rng);
    assert!(!branches.is_empty());
    for b in &branches {
        assert!(trunk.points().contains(&b.start()));
    }
}

#[test]
fn zero_probability_grows_nothing() {
    let fx = fixture();
    let cost = CostField::unweighted();
    let trunk = trunk(&fx, &cost);
    let finder = PathFinder::new(&fx.field, &cost, fx.furthest, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let branches = grow_branches(&finder, std::slice::from_ref(&trunk), 2.0, 6.0, 0.0, &mut rng);
    assert!(branches.is_empty());
}

#[test]
fn zero_coefficient_grows_nothing() {
    let fx = fixture();
    let cost = CostField::unweighted();
    let trunk = trunk(&fx, &cost);
    let finder = PathFinder::new(&fx.field, &cost, fx.furthest, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let branches = grow_branches(&finder, std::slice::from_ref(&trunk), 0.0, 6.0, 1.0, &mut rng);
    assert!(branches.is_empty());
}

#[test]
fn growth_is_deterministic_per_seed() {
    let fx = fixture();
    let cost = CostField::unweighted();
    let trunk = trunk(&fx, &cost);
    let finder = PathFinder::new(&fx.field, &cost, fx.furthest, 10);

    let mut rng_a = ChaCha8Rng::seed_from_u64(31);
    let a = grow_branches(&finder, std::slice::from_ref(&trunk), 1.5, 5.0, 0.5, &mut rng_a);
    let mut rng_b = ChaCha8Rng::seed_from_u64(31);
    let b = grow_branches(&finder, std::slice::from_ref(&trunk), 1.5, 5.0, 0.5, &mut rng_b);
    assert_eq!(a, b);
}
