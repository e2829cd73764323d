//! Per-block RNG seeding.

/// Derives a block-specific seed from the run's base seed and the block's
/// position in the input list. Independent of thread scheduling.
pub fn seed_for_block(base_seed: u64, block_index: usize) -> u64 {
    let idx = block_index as u64;
    let mixed = base_seed ^ idx.wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15);
    mix_u64(mixed)
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
