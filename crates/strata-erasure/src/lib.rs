//! Systematic erasure coding over GF(256).
//!
//! An `(m, k)` [`Code`] splits `k * shard_len` bytes of data into `k` data
//! shards and computes `m - k` parity shards such that any `k` of the `m`
//! shards reconstruct the data.
//!
//! This crate provides:
//! - [`Code`]: construction, [`encode`](Code::encode),
//!   [`decode`](Code::decode) and [`repair`](Code::repair).
//! - [`DecodeCache`]: per-pattern memo of [`DecodePlan`]s so repeated failure
//!   patterns skip the `O(k³)` matrix inversion.
//! - [`CodeConfig`]: serializable `(m, k, size)` parameters.
//!
//! ```
//! use strata_erasure::Code;
//!
//! let code = Code::new(12, 8, 128)?;
//! let data = vec![7u8; 128];
//! let mut stripe = code.encode_stripe(&data)?;
//!
//! // Lose four data shards.
//! for shard in [0, 2, 3, 4] {
//!     stripe[shard * 16..(shard + 1) * 16].fill(0);
//! }
//! assert_eq!(code.decode(&stripe, &[0, 2, 3, 4])?, data);
//! # Ok::<(), strata_erasure::ErasureError>(())
//! ```

mod cache;
mod code;
mod config;
mod decoder;
mod encoder;
mod error;
mod generator;
mod pattern;
mod plan;

pub use cache::DecodeCache;
pub use code::Code;
pub use config::CodeConfig;
pub use error::ErasureError;
pub use generator::{VANDERMONDE_MAX_K, generator_matrix};
pub use pattern::ErasurePattern;
pub use plan::DecodePlan;

/// Largest supported `m` (and therefore `k`).
pub const MAX_SHARDS: usize = 127;

#[cfg(test)]
mod tests;
