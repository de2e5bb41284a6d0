//! Hashed Bucket Feature

use crate::error::FeatureError;
use crate::feature::Feature;
use crate::field::{FieldId, Value};
use crate::hash::{default_hash, HashFn};
use crate::slot::RowSlot;
use std::fmt;
use std::sync::Arc;

/// Default number of buckets
pub const DEFAULT_BUCKETS: usize = 100;

/// Top bit of the 32-bit hash, used to pick the sign
const SIGN_BIT: u64 = 0x8000_0000;

/// How a write combines with a value already in its bucket within the row
#[derive(Clone)]
pub enum CollisionPolicy {
    /// Add to the bucket
    Sum,
    /// Keep the larger value
    Max,
    /// `combine(new, old)`
    Custom(Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>),
}

impl CollisionPolicy {
    pub fn custom(combine: impl Fn(f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        CollisionPolicy::Custom(Arc::new(combine))
    }

    pub fn combine(&self, new: f64, old: f64) -> f64 {
        match self {
            CollisionPolicy::Sum => new + old,
            CollisionPolicy::Max => new.max(old),
            CollisionPolicy::Custom(combine) => combine(new, old),
        }
    }
}

impl fmt::Debug for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::Sum => f.write_str("Sum"),
            CollisionPolicy::Max => f.write_str("Max"),
            CollisionPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Hashes arbitrary tokens into a fixed number of buckets
///
/// `set(token)` writes 1.0 to bucket `hash(token) % buckets`,
/// `set(token, weight)` writes the given weight. Distinct tokens can share a
/// bucket; without a collision policy the later write wins.
#[derive(Clone)]
pub struct Hashed {
    hash: HashFn,
    buckets: usize,
    collision: Option<CollisionPolicy>,
    random_sign: bool,
}

impl Hashed {
    /// FNV-1a hashing into `buckets` buckets
    ///
    /// Panics if `buckets` is zero; see [`Hashed::try_new`].
    pub fn new(buckets: usize) -> Self {
        assert!(buckets > 0, "Bucket count must be > 0");
        Self {
            hash: default_hash(),
            buckets,
            collision: None,
            random_sign: false,
        }
    }

    pub fn try_new(buckets: usize) -> Result<Self, FeatureError> {
        if buckets == 0 {
            return Err(FeatureError::invalid_arguments(
                "hashed",
                "bucket count must be > 0",
            ));
        }
        Ok(Self::new(buckets))
    }

    /// Replace the hash function
    pub fn with_hash(mut self, hash: impl Fn(&str) -> u64 + Send + Sync + 'static) -> Self {
        self.hash = Arc::new(hash);
        self
    }

    pub fn with_collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision = Some(policy);
        self
    }

    /// Flip the weight's sign when the hash has its top bit set
    pub fn with_random_sign(mut self, enabled: bool) -> Self {
        self.random_sign = enabled;
        self
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Bucket index and signed weight for a token
    pub fn assign(&self, token: &str, weight: f64) -> (usize, f64) {
        let key = (self.hash)(token);
        let weight = if self.random_sign && key & SIGN_BIT != 0 {
            -weight
        } else {
            weight
        };
        ((key % self.buckets as u64) as usize, weight)
    }
}

impl Default for Hashed {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl fmt::Debug for Hashed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hashed")
            .field("buckets", &self.buckets)
            .field("collision", &self.collision)
            .field("random_sign", &self.random_sign)
            .finish()
    }
}

impl Feature for Hashed {
    fn kind(&self) -> &'static str {
        "hashed"
    }

    fn fields(&self) -> Option<Vec<FieldId>> {
        Some((0..self.buckets).map(FieldId::Index).collect())
    }

    fn set(&mut self, slot: &mut RowSlot, args: &[Value]) -> Result<(), FeatureError> {
        let (token, weight) = match args {
            [token] => (token, 1.0),
            [token, weight] => {
                let weight = weight.as_number().ok_or_else(|| {
                    FeatureError::invalid_arguments("hashed", format!("weight '{}' is not a number", weight))
                })?;
                (token, weight)
            }
            _ => {
                return Err(FeatureError::invalid_arguments(
                    "hashed",
                    format!("expected 1 or 2 arguments, got {}", args.len()),
                ))
            }
        };

        let (index, mut weight) = self.assign(&token.token(), weight);
        if let (Some(policy), Some(old)) = (&self.collision, slot.get(index)) {
            weight = policy.combine(weight, old);
        }
        slot.set(index, weight);
        Ok(())
    }
}
