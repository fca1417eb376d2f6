//! Seeded random-stream plumbing for procedural generation.
//!
//! Generation code never touches a global RNG; callers hand it a
//! [`RngBundle`] so tests can replay the exact same draw sequence.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Deterministic bundle of RNG streams segregated by generation domain.
///
/// Placement draws (feature counts, cluster centers, scatter positions) and
/// variety draws (category, interaction kind, lore, size) come from separate
/// streams so a change in one domain cannot shift the other.
#[derive(Debug, Clone)]
pub struct RngBundle {
    placement: RefCell<SmallRng>,
    variety: RefCell<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            placement: RefCell::new(SmallRng::seed_from_u64(derive_stream_seed(
                seed,
                b"placement",
            ))),
            variety: RefCell::new(SmallRng::seed_from_u64(derive_stream_seed(seed, b"variety"))),
        }
    }

    /// Construct a bundle from OS entropy for normal play.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(ChaCha20Rng::from_entropy().next_u64())
    }

    /// Access the placement RNG stream.
    #[must_use]
    pub fn placement(&self) -> RefMut<'_, SmallRng> {
        self.placement.borrow_mut()
    }

    /// Access the variety RNG stream.
    #[must_use]
    pub fn variety(&self) -> RefMut<'_, SmallRng> {
        self.variety.borrow_mut()
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Pick an index from a weight table.
///
/// Weights may be zero; non-positive entries are skipped. A table whose
/// positive weights sum to zero falls back to the last index so a draw can
/// never fail.
pub fn weighted_index<R: Rng>(rng: &mut R, weights: &[f32]) -> usize {
    debug_assert!(!weights.is_empty(), "weight table must not be empty");
    let last = weights.len().saturating_sub(1);
    let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return last;
    }
    let mut roll = rng.gen_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        if roll < *weight {
            return index;
        }
        roll -= *weight;
    }
    last
}

/// Uniform draw from an inclusive-exclusive f32 range, tolerating an
/// inverted or collapsed range by returning its lower bound.
pub fn range_f32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if !(max > min) {
        return min;
    }
    rng.gen_range(min..max)
}
