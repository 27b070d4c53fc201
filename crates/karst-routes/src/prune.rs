use hashbrown::HashMap;

use crate::path::Path;

/// Drops every direct path that a cheaper two-hop detour through some
/// third key point dominates, under the severity exponent `e`:
/// a path A–B is dominated when some C with paths to both satisfies
/// `cost(A,B)^e > cost(A,C)^e + cost(C,B)^e`. `e = 1` is the plain
/// triangle comparison; the exponent tunes how aggressively long direct
/// corridors give way to chains of hops.
///
/// Paths are deduplicated by unordered endpoint pair first — a
/// later-found path overwrites an earlier one — and survivors keep their
/// discovery order, so the output is deterministic.
pub fn prune_paths(paths: Vec<Path>, exponent: f32) -> Vec<Path> {
    // Last write wins per endpoint pair.
    let mut by_pair: HashMap<(u32, u32), usize> = HashMap::new();
    for (i, path) in paths.iter().enumerate() {
        by_pair.insert(path.endpoint_key(), i);
    }

    let mut partners: HashMap<u32, Vec<u32>> = HashMap::new();
    for &(a, b) in by_pair.keys() {
        partners.entry(a).or_default().push(b);
        partners.entry(b).or_default().push(a);
    }

    let pair_cost = |a: u32, b: u32| -> Option<f32> {
        let key = if a <= b { (a, b) } else { (b, a) };
        by_pair.get(&key).map(|&i| paths[i].cost())
    };

    let keep: Vec<bool> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let (a, b) = path.endpoint_key();
            if by_pair[&(a, b)] != i {
                // Superseded duplicate of the same endpoint pair.
                return false;
            }
            let direct = path.cost().powf(exponent);
            let dominated = partners
                .get(&a)
                .into_iter()
                .flatten()
                .any(|&c| {
                    if c == b {
                        return false;
                    }
                    match (pair_cost(a, c), pair_cost(c, b)) {
                        (Some(first), Some(second)) => {
                            direct > first.powf(exponent) + second.powf(exponent)
                        }
                        _ => false,
                    }
                });
            !dominated
        })
        .collect();

    paths
        .into_iter()
        .zip(keep)
        .filter_map(|(path, keep)| keep.then_some(path))
        .collect()
}
