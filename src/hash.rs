//! Content hashing that switches between gxhash and the std hasher
//! based on feature flags. This allows building on systems without specific
//! CPU intrinsics (AES-NI, SSE2) while providing better performance on systems
//! that support these features.
//!
//! The hash is a fast equality pre-filter, not an integrity check. Two distinct
//! texts may collide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed seed so hashes are stable for the lifetime of a build
#[cfg(feature = "gxhash")]
const SEED: i64 = 0x7665_7273_61;

/// 64-bit non-cryptographic hash of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(u64);

impl ContentHash {
    /// Hash a text
    pub fn of(content: &str) -> Self {
        ContentHash(hash_bytes(content.as_bytes()))
    }

    /// Raw hash value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hash bytes with gxhash
#[cfg(feature = "gxhash")]
fn hash_bytes(data: &[u8]) -> u64 {
    gxhash::gxhash64(data, SEED)
}

/// Hash bytes with the std SipHash hasher
#[cfg(not(feature = "gxhash"))]
fn hash_bytes(data: &[u8]) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    let mut hasher = DefaultHasher::new();
    hasher.write(data);
    hasher.finish()
}
