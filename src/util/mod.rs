//! Random-source plumbing
//!
//! Every generator takes `&mut R: Rng + ?Sized`; these helpers produce the
//! reproducible sources used by rounds, the CLI and the tests.
//!
//! phrase → seed: first 8 bytes of blake3(phrase), little-endian

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Deterministic generator for `seed`.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Stable seed derived from a shareable phrase.
pub fn seed_from_phrase(phrase: &str) -> u64 {
    let hash = blake3::hash(phrase.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// `count` distinct values from `low..high` in random order.
///
/// Returns `None` when the range holds fewer than `count` values.
pub fn distinct_values<R: Rng + ?Sized>(
    rng: &mut R,
    low: i32,
    high: i32,
    count: usize,
) -> Option<Vec<i32>> {
    let span = usize::try_from(high.checked_sub(low)?).ok()?;
    if count > span {
        return None;
    }
    Some(
        index::sample(rng, span, count)
            .into_iter()
            .map(|offset| low + offset as i32)
            .collect(),
    )
}

/// A value in `low..high` not contained in `taken`.
///
/// Returns `None` when every value of the range is taken.
pub fn fresh_value<R: Rng + ?Sized>(
    rng: &mut R,
    low: i32,
    high: i32,
    taken: &[i32],
) -> Option<i32> {
    let free: Vec<i32> = (low..high).filter(|v| !taken.contains(v)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}
