//! Decoding: rebuild the original data from any `k` surviving shards.

use tracing::trace;

use crate::code::Code;
use crate::error::ErasureError;
use crate::pattern::ErasurePattern;

impl Code {
    /// Recover the original data from a full stripe with some shards erased.
    ///
    /// `stripe` must be exactly [`stripe_len`](Code::stripe_len) bytes: all
    /// `m` shard positions present, with the positions listed in `erased`
    /// holding arbitrary placeholder bytes. `erased` may name at most
    /// `m - k` distinct indices in `0..m`, in any order.
    ///
    /// Returns the `k * shard_len` bytes of original data. Erased parity
    /// shards are not regenerated; use [`repair`](Code::repair) for that.
    ///
    /// # Errors
    ///
    /// - [`ErasureError::SizeMismatch`] if `stripe` has the wrong length.
    /// - [`ErasureError::TooManyErasures`] if more than `m - k` shards are erased.
    /// - [`ErasureError::ShardOutOfRange`] / [`ErasureError::DuplicateShard`]
    ///   for a malformed erasure list.
    pub fn decode(&self, stripe: &[u8], erased: &[usize]) -> Result<Vec<u8>, ErasureError> {
        self.check_len(stripe, self.stripe_len())?;
        let pattern = ErasurePattern::new(self.m(), self.k(), erased)?;

        let len = self.shard_len();
        let mut data = stripe[..self.data_len()].to_vec();
        if pattern.is_empty() {
            return Ok(data);
        }

        let plan = self.plan(&pattern)?;
        let survivors = plan.gather(len, stripe);
        let rebuilt = plan.rebuild_data(len, &survivors)?;

        for (row, &index) in plan.erased_data().iter().enumerate() {
            data[index * len..(index + 1) * len]
                .copy_from_slice(&rebuilt[row * len..(row + 1) * len]);
        }

        trace!(?pattern, data_losses = plan.erased_data().len(), "decoded stripe");

        Ok(data)
    }

    /// Regenerate every erased shard, data and parity, of a full stripe.
    ///
    /// Accepts the same input as [`decode`](Code::decode) and returns a full
    /// [`stripe_len`](Code::stripe_len)-byte stripe with all erased positions
    /// rebuilt. Decode plans are shared with `decode`.
    pub fn repair(&self, stripe: &[u8], erased: &[usize]) -> Result<Vec<u8>, ErasureError> {
        self.check_len(stripe, self.stripe_len())?;
        let pattern = ErasurePattern::new(self.m(), self.k(), erased)?;

        let len = self.shard_len();
        let mut repaired = stripe.to_vec();
        if pattern.is_empty() {
            return Ok(repaired);
        }

        let plan = self.plan(&pattern)?;
        let survivors = plan.gather(len, stripe);
        let data = plan.rebuild_data(len, &survivors)?;
        let parity = plan.rebuild_parity(len, &survivors)?;

        for (row, &index) in plan.erased_data().iter().enumerate() {
            repaired[index * len..(index + 1) * len]
                .copy_from_slice(&data[row * len..(row + 1) * len]);
        }
        for (row, &index) in plan.erased_parity().iter().enumerate() {
            repaired[index * len..(index + 1) * len]
                .copy_from_slice(&parity[row * len..(row + 1) * len]);
        }

        trace!(?pattern, "repaired stripe");

        Ok(repaired)
    }
}
