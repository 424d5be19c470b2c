#![forbid(unsafe_code)]

//! Row identity tokens and content fingerprints.
//!
//! A [`RowIdentity`] is the token a row uses to claim the shared
//! [`SwipeState`](crate::coordinator::SwipeState) and to tag its
//! [`VisibleButton`](crate::machine::VisibleButton). It is either derived from
//! a caller-supplied key (so a remounted row, or a child row aliasing its
//! parent, compares equal) or minted fresh for one controller instance.
//!
//! # Invariants
//!
//! 1. A fresh identity never compares equal to any other fresh identity
//!    created in the same process.
//! 2. Keyed and fresh identities never compare equal to each other, even if
//!    the underlying integers coincide.
//! 3. [`fingerprint_of`] is deterministic within a process: hashing equal
//!    values yields equal fingerprints.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed seeds so fingerprints are stable for the life of the process
/// instead of varying per `RandomState` instance.
const FINGERPRINT_SEEDS: [u64; 4] = [
    0x243F_6A88_85A3_08D3,
    0x1319_8A2E_0370_7344,
    0xA409_3822_299F_31D0,
    0x082E_FA98_EC4E_6C89,
];

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Hash any value into a 64-bit content fingerprint.
///
/// Used for row keys and for detecting when a panel's declared content
/// changed identity.
#[must_use]
pub fn fingerprint_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let [k0, k1, k2, k3] = FINGERPRINT_SEEDS;
    ahash::RandomState::with_seeds(k0, k1, k2, k3).hash_one(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IdentityKind {
    Keyed(u64),
    Instance(u64),
}

/// Opaque, comparable identity of one swipeable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowIdentity(IdentityKind);

impl RowIdentity {
    /// Identity derived from a caller-supplied key.
    ///
    /// Rows built with equal keys share open/close state.
    #[must_use]
    pub fn keyed<K: Hash + ?Sized>(key: &K) -> Self {
        Self(IdentityKind::Keyed(fingerprint_of(key)))
    }

    /// Mint an identity unique to one controller instance.
    #[must_use]
    pub fn fresh() -> Self {
        Self(IdentityKind::Instance(
            NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// Whether this identity came from a caller-supplied key.
    #[inline]
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        matches!(self.0, IdentityKind::Keyed(_))
    }
}
