//! Provably-fair round generation.
//!
//! A round commits to a secret seed by publishing its SHA-256 digest before
//! any bet is taken. The crash multiplier is derived purely from that digest,
//! so once the seed is revealed anyone can recompute the digest and the
//! multiplier and confirm the round was fixed in advance.

use num_bigint::BigUint;
use num_traits::{Num, ToPrimitive};
use sha2::{Digest, Sha256};

use crate::constants::{MIN_MULTIPLIER, MULTIPLIER_GRANULARITY, MULTIPLIER_SPAN};
use crate::entropy::EntropySource;
use crate::types::{Commitment, Round};

/// Produces one commitment and the multiplier derived from it.
#[derive(Debug, Clone)]
pub struct RoundGenerator {
    commitment: Commitment,
}

impl RoundGenerator {
    /// New generator with a secret seed drawn from `entropy`.
    pub fn new(entropy: &mut dyn EntropySource) -> Self {
        Self::with_seed(entropy.round_seed())
    }

    /// New generator over a caller-supplied seed. Used for reproducible
    /// tests and for replaying a revealed round.
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let hash = hash_seed(&seed);
        Self {
            commitment: Commitment { seed, hash },
        }
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    /// Resolve this generator into a full round.
    pub fn round(&self) -> Round {
        Round {
            commitment: self.commitment.clone(),
            crash_multiplier: crash_multiplier(&self.commitment.hash),
        }
    }
}

/// SHA-256 of the seed's UTF-8 bytes, lowercase hex.
pub fn hash_seed(seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the crash multiplier from a hex digest.
///
/// The digest is read as one 256-bit integer and reduced modulo the
/// granularity; reducing only a suffix of the digest would change the
/// residue and break third-party replay. The residue is normalized to
/// [0, 1) and mapped onto [1.0, 100.0], rounded to 2 decimals.
pub fn crash_multiplier(hash: &str) -> f64 {
    let entropy = BigUint::from_str_radix(hash, 16).unwrap_or_default();
    let residue = (entropy % MULTIPLIER_GRANULARITY)
        .to_u64()
        .unwrap_or(0);
    let x = residue as f64 / MULTIPLIER_GRANULARITY as f64;
    let raw = MIN_MULTIPLIER + x * MULTIPLIER_SPAN;
    (raw * 100.0).round() / 100.0
}

/// Commit-reveal audit primitive: does `hash` commit to `seed`?
///
/// A mismatch is an expected outcome for the caller to handle, never an
/// error.
pub fn verify(seed: &str, hash: &str) -> bool {
    hash_seed(seed) == hash
}
