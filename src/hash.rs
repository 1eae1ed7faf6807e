use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, Hasher};

use siphasher::sip128::{Hasher128, SipHasher13};

/// Produce a 128-bit fingerprint of a value.
pub(crate) fn fingerprint<T: Hash + ?Sized>(value: &T) -> u128 {
    let mut state = SipHasher13::new();
    value.hash(&mut state);
    state.finish128().as_u128()
}

/// A map keyed by fingerprints, reusing them as their own hashes.
pub(crate) type FingerprintMap<V> = HashMap<u128, V, BuildFingerprintHasher>;

#[derive(Copy, Clone, Default)]
pub(crate) struct BuildFingerprintHasher;

impl BuildHasher for BuildFingerprintHasher {
    type Hasher = FingerprintHasher;

    fn build_hasher(&self) -> FingerprintHasher {
        FingerprintHasher::default()
    }
}

/// Truncates an already well-mixed `u128` key instead of rehashing it.
#[derive(Default)]
pub(crate) struct FingerprintHasher(u64);

impl Hasher for FingerprintHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, _: &[u8]) {
        unimplemented!("fingerprint maps are keyed by u128 only")
    }

    fn write_u128(&mut self, value: u128) {
        self.0 = value as u64;
    }
}
