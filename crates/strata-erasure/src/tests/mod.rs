//! Cross-module tests for strata-erasure.


/// Generate deterministic, non-repeating test data.
pub fn test_data(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF ^ seed.wrapping_mul(0x9E37_79B9);
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

/// Overwrite the listed shards of `stripe` with `fill`.
pub fn corrupt(stripe: &mut [u8], shard_len: usize, shards: &[usize], fill: u8) {
    for &shard in shards {
        stripe[shard * shard_len..(shard + 1) * shard_len].fill(fill);
    }
}
