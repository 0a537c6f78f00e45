//! Unbiased in-place permutation.

use rand::Rng;

/// Fisher–Yates shuffle.
///
/// Walks from the last index down to 1 and swaps each slot with a uniformly
/// chosen index in `[0, i]`, upper bound inclusive. The random source is
/// supplied by the caller so a seeded generator reproduces the permutation.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
