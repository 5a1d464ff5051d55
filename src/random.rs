//! Weighted draw helpers shared by the zone and connection rules.
//!
//! Every helper consumes the run's single random stream, so the order of
//! calls is part of the output: the same seed and the same call sequence
//! always produce the same template.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// True with probability `p`.
pub fn chance(rng: &mut ChaCha8Rng, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Pick from `(value, probability)` pairs by walking the cumulative sum.
/// Falls back to the last value if the probabilities sum below the roll.
pub fn pick_weighted<T: Copy>(rng: &mut ChaCha8Rng, options: &[(T, f64)]) -> T {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for &(value, p) in options {
        cumulative += p;
        if roll <= cumulative {
            return value;
        }
    }
    options[options.len() - 1].0
}

/// 1-based index drawn proportionally to `weights`.
pub fn weighted_index(rng: &mut ChaCha8Rng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let roll = rng.gen_range(0.0..=total);
    let mut upto = 0.0;
    for (i, w) in weights.iter().enumerate() {
        if upto + w >= roll {
            return i + 1;
        }
        upto += w;
    }
    weights.len()
}

/// Uniform integer within ±10% of `value`.
pub fn jitter(rng: &mut ChaCha8Rng, value: i64) -> i64 {
    let low = value * 9 / 10;
    let high = value * 11 / 10;
    rng.gen_range(low..=high)
}

/// Flip an independent coin with probability `p` per option, then keep a
/// random `cap`-sized subset if more were chosen. Preserves option order.
pub fn pick_subset<'a>(
    rng: &mut ChaCha8Rng,
    options: &[&'a str],
    p: f64,
    cap: Option<usize>,
) -> Vec<&'a str> {
    let mut chosen: Vec<&'a str> = options.iter().copied().filter(|_| chance(rng, p)).collect();
    if let Some(cap) = cap {
        if chosen.len() > cap {
            let mut keep = index::sample(rng, chosen.len(), cap).into_vec();
            keep.sort_unstable();
            chosen = keep.into_iter().map(|i| chosen[i]).collect();
        }
    }
    chosen
}

/// `k` distinct indices below `len` in draw order (fewer if `len < k`).
pub fn sample_indices(rng: &mut ChaCha8Rng, len: usize, k: usize) -> Vec<usize> {
    index::sample(rng, len, k.min(len)).into_vec()
}

/// Uniformly chosen element, or `None` for an empty slice.
pub fn choose<'a, T>(rng: &mut ChaCha8Rng, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_chance_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(chance(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_pick_weighted_respects_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let v = pick_weighted(&mut rng, &[(1, 0.0), (2, 1.0), (3, 0.0)]);
            assert_eq!(v, 2);
        }
    }

    #[test]
    fn test_weighted_index_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..500 {
            let i = weighted_index(&mut rng, &[0.25, 0.5, 0.25]);
            assert!((1..=3).contains(&i));
            seen[i - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..500 {
            let v = jitter(&mut rng, 3000);
            assert!((2700..=3300).contains(&v), "jitter out of range: {}", v);
        }
        assert_eq!(jitter(&mut rng, 0), 0);
    }

    #[test]
    fn test_pick_subset_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let options = ["mercury", "sulfur", "crystals", "gems"];
        for _ in 0..100 {
            let all = pick_subset(&mut rng, &options, 1.0, Some(2));
            assert_eq!(all.len(), 2);
            let uncapped = pick_subset(&mut rng, &options, 1.0, None);
            assert_eq!(uncapped, options.to_vec());
        }
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let picked = sample_indices(&mut rng, 5, 3);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(sample_indices(&mut rng, 2, 3).len(), 2);
    }
}
