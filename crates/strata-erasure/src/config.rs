//! Serializable code parameters.

use serde::{Deserialize, Serialize};

use crate::code::Code;
use crate::error::ErasureError;

/// Parameters of an erasure code.
///
/// `m` counts *all* shards (data + parity), `k` the data shards, and `size`
/// the exact number of input bytes per encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Total number of shards.
    pub m: usize,
    /// Number of data shards.
    pub k: usize,
    /// Bytes of data per stripe. Must be a multiple of `k`.
    pub size: usize,
}

impl Default for CodeConfig {
    /// 8 data + 4 parity shards of 16 bytes each.
    fn default() -> Self {
        Self {
            m: 12,
            k: 8,
            size: 128,
        }
    }
}

impl CodeConfig {
    /// Bytes per shard, if `size` divides evenly.
    pub fn shard_len(&self) -> Option<usize> {
        (self.k != 0 && self.size % self.k == 0).then(|| self.size / self.k)
    }

    /// Construct the [`Code`] these parameters describe.
    pub fn build(&self) -> Result<Code, ErasureError> {
        Code::from_config(self)
    }
}
