//! Deterministic String Hashing

use std::sync::Arc;

/// FNV-1a 32-bit offset basis
const FNV_OFFSET: u32 = 0x811c_9dc5;
/// FNV-1a 32-bit prime
const FNV_PRIME: u32 = 0x0100_0193;

/// Injectable token hash used for bucket assignment
pub type HashFn = Arc<dyn Fn(&str) -> u64 + Send + Sync>;

/// FNV-1a over the character codes of `text`
///
/// Stable across runs and platforms, so bucket assignment is reproducible.
pub fn fnv1a32(text: &str) -> u32 {
    text.chars()
        .fold(FNV_OFFSET, |h, c| (h ^ c as u32).wrapping_mul(FNV_PRIME))
}

pub(crate) fn default_hash() -> HashFn {
    Arc::new(|text: &str| u64::from(fnv1a32(text)))
}
