use karst_geom::{Aabb, Vec3};
use karst_graph::connect_neighbors;
use karst_spheres::SphereField;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn packed_and_connected(seed: u64, k: usize) -> (SphereField, f32) {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(15.0));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut field = SphereField::pack(bounds, 1.0, 1.5, 2.0, 30, &mut rng);
    let furthest = connect_neighbors(&mut field, 5, k);
    (field, furthest)
}

#[test]
fn edge_lists_respect_the_cap() {
    let (field, _) = packed_and_connected(11, 6);
    for s in &field.spheres {
        assert!(s.edges.len() <= 6, "sphere {} has {} edges", s.index, s.edges.len());
    }
}

#[test]
fn edges_sort_ascending_by_distance() {
    let (field, _) = packed_and_connected(11, 8);
    for s in &field.spheres {
        for pair in s.edges.windows(2) {
            assert!(pair[0].dist <= pair[1].dist + 1e-6);
        }
    }
}

#[test]
fn edge_distances_match_geometry() {
    let (field, _) = packed_and_connected(23, 8);
    for s in &field.spheres {
        for e in &s.edges {
            let true_dist = s.pos.distance(field.spheres[e.target as usize].pos);
            assert!((e.dist - true_dist).abs() < 1e-4);
            assert_ne!(e.target, s.index, "self edge on sphere {}", s.index);
        }
    }
}

#[test]
fn furthest_edge_is_the_maximum() {
    let (field, furthest) = packed_and_connected(5, 8);
    let max_edge = field
        .spheres
        .iter()
        .flat_map(|s| s.edges.iter())
        .fold(0.0f32, |acc, e| acc.max(e.dist));
    assert_eq!(furthest, max_edge);
    assert!(furthest > 0.0);
}

#[test]
fn connection_is_deterministic() {
    let (a, fa) = packed_and_connected(77, 8);
    let (b, fb) = packed_and_connected(77, 8);
    assert_eq!(fa, fb);
    for (x, y) in a.spheres.iter().zip(&b.spheres) {
        assert_eq!(x.edges, y.edges);
    }
}

// The nearest sets are computed per sphere, so the graph is directed:
// with K = 1, the middle sphere of an uneven line points one way only.
#[test]
fn one_way_edges_stay_one_way() {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
    let field = [
        (Vec3::new(1.0, 5.0, 5.0), 0.5), // A
        (Vec3::new(3.0, 5.0, 5.0), 0.5), // B, 2.0 from A
        (Vec3::new(4.4, 5.0, 5.0), 0.5), // C, 1.4 from B
    ];
    let mut field = SphereField::from_spheres(bounds, 0.5, field);
    connect_neighbors(&mut field, 20, 1);

    let a = &field.spheres[0];
    let b = &field.spheres[1];
    let c = &field.spheres[2];
    assert_eq!(a.edges.len(), 1);
    assert_eq!(a.edges[0].target, 1, "A's nearest is B");
    assert_eq!(b.edges[0].target, 2, "B's nearest is C");
    assert_eq!(c.edges[0].target, 1, "C's nearest is B");
    // B never points back at A: the asymmetry is load-bearing.
    assert!(b.edges.iter().all(|e| e.target != 0));
}

#[test]
fn sparse_neighborhoods_yield_short_edge_lists() {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));
    let mut field = SphereField::from_spheres(
        bounds,
        0.5,
        [(Vec3::new(1.0, 1.0, 1.0), 0.5), (Vec3::new(9.0, 9.0, 9.0), 0.5)],
    );
    // Search range too small to see across the box.
    connect_neighbors(&mut field, 2, 4);
    assert!(field.spheres[0].edges.is_empty());
    assert!(field.spheres[1].edges.is_empty());
}
