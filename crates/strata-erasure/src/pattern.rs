//! Canonical erasure patterns.

use std::fmt;

use crate::error::ErasureError;

/// A validated set of erased shard indices, sorted ascending.
///
/// Two erasure lists naming the same shards in any order produce equal
/// patterns, which makes this the key of the decode cache.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErasurePattern(Box<[u8]>);

impl ErasurePattern {
    /// Validate and canonicalize an erasure list for a code with `m` total
    /// and `k` data shards.
    ///
    /// # Errors
    ///
    /// - [`ErasureError::TooManyErasures`] if more than `m - k` indices are given.
    /// - [`ErasureError::ShardOutOfRange`] if an index is `>= m`.
    /// - [`ErasureError::DuplicateShard`] if an index repeats.
    pub fn new(m: usize, k: usize, erased: &[usize]) -> Result<Self, ErasureError> {
        let max = m.saturating_sub(k);
        if erased.len() > max {
            return Err(ErasureError::TooManyErasures {
                erased: erased.len(),
                max,
            });
        }

        let mut indices = Vec::with_capacity(erased.len());
        for &index in erased {
            if index >= m {
                return Err(ErasureError::ShardOutOfRange { index, m });
            }
            // m <= 127, so every valid index fits in a byte.
            indices.push(index as u8);
        }
        indices.sort_unstable();

        if let Some(pair) = indices.windows(2).find(|w| w[0] == w[1]) {
            return Err(ErasureError::DuplicateShard {
                index: pair[0] as usize,
            });
        }

        Ok(Self(indices.into_boxed_slice()))
    }

    /// Number of erased shards.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Erased indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|&i| i as usize)
    }

    /// Whether `index` is erased.
    pub fn contains(&self, index: usize) -> bool {
        u8::try_from(index).is_ok_and(|i| self.0.binary_search(&i).is_ok())
    }

    /// How many erased indices fall below `k` (lost data shards).
    pub fn data_losses(&self, k: usize) -> usize {
        self.iter().take_while(|&i| i < k).count()
    }
}

impl fmt::Debug for ErasurePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
