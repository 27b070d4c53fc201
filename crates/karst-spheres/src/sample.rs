//! Uniform sphere/ball sampling by rejection from the enclosing cube.

use karst_geom::Vec3;
use rand::Rng;

/// Uniform point inside the unit ball.
pub fn in_unit_ball(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0f32..=1.0),
            rng.gen_range(-1.0f32..=1.0),
            rng.gen_range(-1.0f32..=1.0),
        );
        if v.length_sq() <= 1.0 {
            return v;
        }
    }
}

/// Uniform direction on the unit sphere. Near-zero samples are rejected
/// before normalizing so the direction stays unbiased.
pub fn unit_vector(rng: &mut impl Rng) -> Vec3 {
    loop {
        let v = in_unit_ball(rng);
        let len_sq = v.length_sq();
        if len_sq > 1e-4 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn ball_samples_stay_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(in_unit_ball(&mut rng).length_sq() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn directions_are_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }
}
