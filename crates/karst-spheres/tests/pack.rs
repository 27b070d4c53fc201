use karst_geom::{Aabb, Vec3};
use karst_spheres::SphereField;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn packed(seed: u64) -> SphereField {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(20.0));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    SphereField::pack(bounds, 1.0, 2.0, 2.0, 30, &mut rng)
}

#[test]
fn packing_is_non_empty() {
    assert!(packed(42).spheres.len() > 10);
}

#[test]
fn no_two_spheres_interpenetrate() {
    let field = packed(42);
    for a in &field.spheres {
        for b in &field.spheres[(a.index as usize + 1)..] {
            let gap = a.radius + b.radius;
            let dist = a.pos.distance(b.pos);
            assert!(
                dist >= gap - 1e-4,
                "spheres {} and {} overlap: dist {} < {}",
                a.index,
                b.index,
                dist,
                gap
            );
        }
    }
}

#[test]
fn all_spheres_inside_bounds() {
    let field = packed(7);
    for s in &field.spheres {
        assert!(field.bounds.contains(s.pos), "sphere {} escaped", s.index);
    }
}

#[test]
fn radii_respect_configured_range() {
    let field = packed(7);
    for s in &field.spheres {
        assert!(s.radius >= 1.0 && s.radius <= 2.0);
    }
}

#[test]
fn indices_are_dense_and_stable() {
    let field = packed(3);
    for (i, s) in field.spheres.iter().enumerate() {
        assert_eq!(s.index as usize, i);
    }
}

#[test]
fn same_seed_packs_identically() {
    let a = packed(1234);
    let b = packed(1234);
    assert_eq!(a.spheres.len(), b.spheres.len());
    for (x, y) in a.spheres.iter().zip(&b.spheres) {
        assert_eq!(x.pos, y.pos);
        assert_eq!(x.radius, y.radius);
    }
}

#[test]
fn different_seeds_pack_differently() {
    let a = packed(1);
    let b = packed(2);
    let same = a.spheres.len() == b.spheres.len()
        && a.spheres.iter().zip(&b.spheres).all(|(x, y)| x.pos == y.pos);
    assert!(!same);
}

#[test]
fn nearest_sphere_matches_brute_force() {
    let field = packed(99);
    let probes = [
        Vec3::splat(10.0),
        Vec3::new(1.0, 18.0, 4.0),
        Vec3::new(19.0, 2.0, 11.0),
    ];
    for probe in probes {
        // Search radius covers the whole 20-unit box.
        let got = field.nearest_sphere(probe, 20).expect("field is non-empty");
        let want = field
            .spheres
            .iter()
            .min_by(|a, b| {
                probe
                    .distance_sq(a.pos)
                    .total_cmp(&probe.distance_sq(b.pos))
            })
            .unwrap()
            .index;
        assert_eq!(got, want);
    }
}

#[test]
fn nearest_sphere_on_empty_neighborhood_is_none() {
    let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(20.0));
    let field = SphereField::from_spheres(bounds, 1.0, []);
    assert_eq!(field.nearest_sphere(Vec3::splat(10.0), 3), None);
}

#[test]
fn out_of_bounds_probe_is_clamped_not_lost() {
    let field = packed(5);
    assert!(field.nearest_sphere(Vec3::splat(-100.0), 20).is_some());
}
