use ising_core::derive_substream_seed;

/// Derives the deterministic seed used for a single read.
pub fn read_seed(master_seed: u64, read_index: usize) -> u64 {
    derive_substream_seed(master_seed, read_index as u64)
}
