//! Encoding: data shards in, parity shards out.
//!
//! The top `k` rows of the generator are the identity, so the first `k`
//! shards of a stripe are the input bytes untouched. Only the `m - k` parity
//! rows are multiplied.

use tracing::trace;

use crate::code::Code;
use crate::error::ErasureError;

impl Code {
    /// Compute the parity shards for `data`.
    ///
    /// `data` must be exactly [`data_len`](Code::data_len) bytes. Returns the
    /// `m - k` parity shards back to back ([`parity_len`](Code::parity_len)
    /// bytes); the data shards are not copied into the output.
    ///
    /// # Errors
    ///
    /// Returns [`ErasureError::SizeMismatch`] if `data` has the wrong length.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, ErasureError> {
        self.check_len(data, self.data_len())?;

        let mut parity = vec![0u8; self.parity_len()];
        self.parity_tables()
            .multiply(self.shard_len(), data, &mut parity)?;

        trace!(
            m = self.m(),
            k = self.k(),
            shard_len = self.shard_len(),
            "encoded stripe"
        );

        Ok(parity)
    }

    /// Encode `data` into a full stripe: the data followed by its parity,
    /// [`stripe_len`](Code::stripe_len) bytes. This is the layout
    /// [`decode`](Code::decode) consumes.
    pub fn encode_stripe(&self, data: &[u8]) -> Result<Vec<u8>, ErasureError> {
        let parity = self.encode(data)?;
        let mut stripe = Vec::with_capacity(self.stripe_len());
        stripe.extend_from_slice(data);
        stripe.extend_from_slice(&parity);
        Ok(stripe)
    }
}
