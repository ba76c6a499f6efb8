//! Feistel shuffle
//!
//! A 4-round format-preserving permutation over `[0, M)`, used to turn a
//! single uniform random seed into N distinct ball values without
//! rejection sampling. The round function is a domain-separated SHA-256
//! hash of `(right half, round index, seed, domain)`. Left/right widths
//! swap with the halves every round so the construction stays a true
//! bijection even when `M` isn't a power of two or the bit-split is
//! uneven; values produced outside `[0, M)` by the padded-domain
//! permutation are folded back in by cycle-walking (Black & Rogaway),
//! which terminates because the underlying permutation has finite orbits.

use crate::constants::{FEISTEL_DOMAIN_TAG, FEISTEL_ROUNDS};
use sha2::{Digest, Sha256};

fn next_pow2(domain: u32) -> u32 {
    domain.next_power_of_two().max(2)
}

fn round_function(out_bits: u32, right: u32, round: u8, seed: u64, domain: u32) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(FEISTEL_DOMAIN_TAG);
    hasher.update(right.to_le_bytes());
    hasher.update([round]);
    hasher.update(seed.to_le_bytes());
    hasher.update(domain.to_le_bytes());
    let digest = hasher.finalize();
    let raw = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let mask = if out_bits >= 32 {
        u32::MAX
    } else {
        (1u32 << out_bits) - 1
    };
    raw & mask
}

/// Applies the 4-round Feistel permutation to `x` over the domain
/// `[0, domain)`, keyed by `seed`. `x` must be `< domain`. The result is
/// always `< domain`.
pub fn fpe_shuffle(x: u32, domain: u32, seed: u64) -> u32 {
    debug_assert!(x < domain);
    if domain <= 1 {
        return 0;
    }
    let padded = next_pow2(domain);
    let full_bits = padded.trailing_zeros();
    let left_bits0 = full_bits / 2;
    let right_bits0 = full_bits - left_bits0;

    let mut candidate = x;
    loop {
        let mut l = candidate >> right_bits0;
        let mut r = candidate & ((1u32 << right_bits0) - 1);
        let mut l_width = left_bits0;
        let mut r_width = right_bits0;

        for round in 0..FEISTEL_ROUNDS as u8 {
            let f = round_function(l_width, r, round, seed, domain);
            let new_r = l ^ f;
            let new_l = r;
            l = new_l;
            r = new_r;
            core::mem::swap(&mut l_width, &mut r_width);
        }

        let out = (l << r_width) | r;
        if out < domain {
            return out;
        }
        // cycle-walk back into range; terminates because fpe_shuffle over
        // the padded domain is itself a permutation, so repeated
        // application of it to any starting point visits a finite cycle.
        candidate = out;
    }
}

/// Draws N distinct ball values in `[1, M]` from a single uniform seed.
/// Deterministic in `(seed, n, m)`; callers are expected to have validated
/// `n <= m`.
pub fn draw_balls(seed: u64, n: u8, m: u8) -> Vec<u8> {
    let domain = m as u32;
    let mut balls: Vec<u8> = (0..n as u32)
        .map(|i| 1 + fpe_shuffle(i, domain, seed) as u8)
        .collect();
    balls.sort_unstable();
    balls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_is_deterministic() {
        let a = draw_balls(6942069420, 5, 69);
        let b = draw_balls(6942069420, 5, 69);
        assert_eq!(a, b);
    }

    #[test]
    fn draw_yields_distinct_ascending_balls() {
        let balls = draw_balls(12345, 5, 69);
        assert_eq!(balls.len(), 5);
        for pair in balls.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for &b in &balls {
            assert!((1..=69).contains(&b));
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = draw_balls(1, 5, 69);
        let b = draw_balls(2, 5, 69);
        assert_ne!(a, b);
    }

    #[test]
    fn n_equals_m_is_a_full_permutation() {
        let balls = draw_balls(999, 7, 7);
        let expect: Vec<u8> = (1..=7).collect();
        assert_eq!(balls, expect);
    }

    #[test]
    fn shuffle_is_a_permutation_over_power_of_two_domain() {
        let domain = 16u32;
        let seed = 42u64;
        let mut seen = std::collections::HashSet::new();
        for x in 0..domain {
            let y = fpe_shuffle(x, domain, seed);
            assert!(y < domain);
            assert!(seen.insert(y), "collision at x={x} -> y={y}");
        }
    }

    #[test]
    fn shuffle_is_a_permutation_over_non_power_of_two_domains() {
        for &domain in &[3u32, 5, 7, 10, 35, 69, 100, 255] {
            let mut seen = std::collections::HashSet::new();
            for x in 0..domain {
                let y = fpe_shuffle(x, domain, 7);
                assert!(y < domain, "domain={domain} x={x} y={y}");
                assert!(seen.insert(y), "collision domain={domain} at x={x} -> y={y}");
            }
        }
    }
}
