//! Exact binomial coefficients and hypergeometric win probabilities.
//!
//! Coefficients are computed with arbitrary precision: C(100, 20) is about
//! 5.36e20 and does not fit in a `u64`. Probabilities are formed from the
//! exact numerator and denominator, each rounded to `f64` once, so the
//! returned ratio is within ~1.5 ulp of the true value.

use crate::consts::{DRAW_SIZE, PRIZE_TIERS, TICKET_SIZE, UNIVERSE};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use std::collections::BTreeMap;

/// Number of `k`-subsets of an `n`-set. Zero when `k < 0` or `k > n`.
pub fn binomial(n: u64, k: i64) -> BigUint {
    if k < 0 || k as u64 > n {
        return BigUint::zero();
    }
    let k = (k as u64).min(n - k as u64);
    let mut res = BigUint::one();
    for i in 0..k {
        // res * (n - i) is always divisible by (i + 1)
        res *= n - i;
        res /= i + 1;
    }
    res
}

fn ratio(num: &BigUint, den: &BigUint) -> f64 {
    match (num.to_f64(), den.to_f64()) {
        (Some(n), Some(d)) if d > 0.0 => n / d,
        _ => 0.0,
    }
}

/// Probability that exactly `hits` of the drawn numbers land on a ticket.
pub fn hit_probability(hits: u8) -> f64 {
    let picked = TICKET_SIZE as u64;
    let unpicked = (UNIVERSE - TICKET_SIZE) as u64;
    let drawn = DRAW_SIZE as i64;
    let hits = hits as i64;

    let favourable = binomial(picked, hits) * binomial(unpicked, drawn - hits);
    let total = binomial(UNIVERSE as u64, drawn);
    ratio(&favourable, &total)
}

/// Probabilities for every prize tier, keyed by hit count.
pub fn win_probabilities() -> BTreeMap<u8, f64> {
    PRIZE_TIERS
        .iter()
        .map(|&t| (t, hit_probability(t)))
        .collect()
}

/// Probabilities for every possible hit count 0..=20.
pub fn hit_distribution() -> BTreeMap<u8, f64> {
    (0..=DRAW_SIZE as u8)
        .map(|t| (t, hit_probability(t)))
        .collect()
}
