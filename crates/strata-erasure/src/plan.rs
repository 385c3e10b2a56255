//! Decode plans: the reconstruction apparatus for one erasure pattern.
//!
//! Building a plan picks the `k` lowest surviving shards, inverts the
//! generator rows at those positions, and derives one coefficient row per
//! erased shard:
//!
//! - erased data shard `e < k`: row `e` of the inverse;
//! - erased parity shard `e >= k`: `generator[e] × inverse`.
//!
//! Both kinds are expanded into [`MulTables`] so reconstruction is a single
//! table multiply over the gathered survivors. Inversion is `O(k³)`, which
//! is why plans are memoized per pattern by [`DecodeCache`](crate::DecodeCache).

use strata_gf::{GfError, Matrix, MulTables};
use tracing::debug;

use crate::pattern::ErasurePattern;

/// Precomputed tables that rebuild the erased shards of one pattern.
#[derive(Debug)]
pub struct DecodePlan {
    /// Shard indices feeding the reconstruction, ascending.
    survivors: Vec<usize>,
    /// Erased indices, ascending. Data shards come first.
    erased: Vec<usize>,
    /// Number of erased data shards (prefix of `erased`).
    data_losses: usize,
    /// `data_losses × k` tables regenerating the lost data shards.
    data_tables: MulTables,
    /// `(erased - data_losses) × k` tables regenerating the lost parity shards.
    parity_tables: MulTables,
}

impl DecodePlan {
    /// Derive the plan for `pattern` from an `m × k` generator matrix.
    pub fn build(generator: &Matrix, pattern: &ErasurePattern) -> Result<Self, GfError> {
        let m = generator.rows();
        let k = generator.cols();

        let survivors: Vec<usize> = (0..m).filter(|&i| !pattern.contains(i)).take(k).collect();
        if survivors.len() != k {
            return Err(GfError::DimensionMismatch {
                expected: k,
                got: survivors.len(),
            });
        }

        let inverse = generator.select_rows(&survivors).invert()?;

        let erased: Vec<usize> = pattern.iter().collect();
        let data_losses = pattern.data_losses(k);
        let parity_losses = erased.len() - data_losses;

        let mut data_rows = Vec::with_capacity(data_losses * k);
        let mut parity_rows = Vec::with_capacity(parity_losses * k);
        for &index in &erased {
            if index < k {
                data_rows.extend_from_slice(inverse.row(index));
            } else {
                parity_rows.extend(inverse.mul_row(generator.row(index))?);
            }
        }

        debug!(
            m,
            k,
            ?pattern,
            data_losses,
            ?survivors,
            "built decode plan"
        );

        Ok(Self {
            data_tables: MulTables::expand(&data_rows, data_losses, k)?,
            parity_tables: MulTables::expand(&parity_rows, parity_losses, k)?,
            survivors,
            erased,
            data_losses,
        })
    }

    /// The surviving shard indices used as reconstruction input, ascending.
    pub fn survivors(&self) -> &[usize] {
        &self.survivors
    }

    /// Erased shard indices, ascending.
    pub fn erased(&self) -> &[usize] {
        &self.erased
    }

    /// Erased data shard indices (those below `k`), ascending.
    pub fn erased_data(&self) -> &[usize] {
        &self.erased[..self.data_losses]
    }

    /// Erased parity shard indices, ascending.
    pub fn erased_parity(&self) -> &[usize] {
        &self.erased[self.data_losses..]
    }

    pub fn data_tables(&self) -> &MulTables {
        &self.data_tables
    }

    pub fn parity_tables(&self) -> &MulTables {
        &self.parity_tables
    }

    /// Copy the surviving shards of `stripe` into one contiguous buffer, in
    /// [`survivors`](Self::survivors) order.
    pub fn gather(&self, shard_len: usize, stripe: &[u8]) -> Vec<u8> {
        let mut input = Vec::with_capacity(self.survivors.len() * shard_len);
        for &index in &self.survivors {
            input.extend_from_slice(&stripe[index * shard_len..(index + 1) * shard_len]);
        }
        input
    }

    /// Regenerate the erased data shards from gathered survivors.
    ///
    /// Returns `erased_data().len()` contiguous shards.
    pub fn rebuild_data(&self, shard_len: usize, survivors: &[u8]) -> Result<Vec<u8>, GfError> {
        let mut out = vec![0u8; self.data_tables.rows() * shard_len];
        self.data_tables.multiply(shard_len, survivors, &mut out)?;
        Ok(out)
    }

    /// Regenerate the erased parity shards from gathered survivors.
    ///
    /// Returns `erased_parity().len()` contiguous shards.
    pub fn rebuild_parity(&self, shard_len: usize, survivors: &[u8]) -> Result<Vec<u8>, GfError> {
        let mut out = vec![0u8; self.parity_tables.rows() * shard_len];
        self.parity_tables.multiply(shard_len, survivors, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generator_matrix;

    fn pattern(m: usize, k: usize, erased: &[usize]) -> ErasurePattern {
        ErasurePattern::new(m, k, erased).unwrap()
    }

    #[test]
    fn test_survivors_skip_erased() {
        let g = generator_matrix(12, 8).unwrap();
        let plan = DecodePlan::build(&g, &pattern(12, 8, &[4, 0, 2, 3])).unwrap();
        assert_eq!(plan.survivors(), &[1, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(plan.erased(), &[0, 2, 3, 4]);
        assert_eq!(plan.erased_data(), &[0, 2, 3, 4]);
        assert!(plan.erased_parity().is_empty());
        assert_eq!(plan.data_tables().rows(), 4);
        assert_eq!(plan.data_tables().cols(), 8);
        assert_eq!(plan.parity_tables().rows(), 0);
    }

    #[test]
    fn test_survivors_take_lowest_k() {
        let g = generator_matrix(12, 8).unwrap();
        let plan = DecodePlan::build(&g, &pattern(12, 8, &[1])).unwrap();
        // Only k of the 11 survivors are used.
        assert_eq!(plan.survivors(), &[0, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_mixed_pattern_split() {
        let g = generator_matrix(9, 5).unwrap();
        let plan = DecodePlan::build(&g, &pattern(9, 5, &[7, 2, 5])).unwrap();
        assert_eq!(plan.erased_data(), &[2]);
        assert_eq!(plan.erased_parity(), &[5, 7]);
        assert_eq!(plan.data_tables().rows(), 1);
        assert_eq!(plan.parity_tables().rows(), 2);
    }

    #[test]
    fn test_rebuild_matches_generator() {
        let (m, k, len) = (9, 5, 3);
        let g = generator_matrix(m, k).unwrap();
        let data: Vec<u8> = (0..(k * len) as u8).map(|b| b.wrapping_mul(37)).collect();

        // Full stripe = generator × data.
        let tables = MulTables::from_matrix(&g);
        let mut stripe = vec![0u8; m * len];
        tables.multiply(len, &data, &mut stripe).unwrap();
        assert_eq!(&stripe[..k * len], &data[..]);

        let plan = DecodePlan::build(&g, &pattern(m, k, &[1, 6])).unwrap();
        let input = plan.gather(len, &stripe);
        let rebuilt_data = plan.rebuild_data(len, &input).unwrap();
        let rebuilt_parity = plan.rebuild_parity(len, &input).unwrap();
        assert_eq!(rebuilt_data, &stripe[len..2 * len]);
        assert_eq!(rebuilt_parity, &stripe[6 * len..7 * len]);
    }
}
