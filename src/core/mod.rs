//! Core types and transformations for the miner
//!
//! This module contains the fundamental types used throughout the miner
//! core: `Job`, `Work`, `Target`, and the hash primitives they are built
//! on.

pub mod hash;
mod job;
mod target;
mod work;

pub use job::{Job, JobId};
pub use target::Target;
pub use work::Work;

/// Constants for the work layout
pub mod constants {
    /// Size of a hash in bytes
    pub const HASH_SIZE: usize = 32;

    /// Size of the target in bytes
    pub const TARGET_SIZE: usize = 32;

    /// Size of the raw block header assembled from a job, in bytes
    pub const HEADER_SIZE: usize = 112;

    /// Size of one SHA-256 input block, in bytes
    pub const SHA256_BLOCK_SIZE: usize = 64;

    /// Size of the hardware payload sent to the device, in bytes
    pub const WORK_DATA_SIZE: usize = 136;

    /// Size of a device nonce candidate, in bytes
    pub const NONCE_SIZE: usize = 8;

    /// Offset of the little-endian time field within the raw header
    pub const TIME_OFFSET: usize = 100;

    /// Offset of the difficulty-bits field within the raw header
    pub const BITS_OFFSET: usize = 104;
}

#[cfg(test)]
mod tests {
    use super::constants::*;

    #[test]
    fn test_constants() {
        assert_eq!(HASH_SIZE, 32);
        assert_eq!(HEADER_SIZE, 112);
        assert_eq!(WORK_DATA_SIZE, 136);
        // The midstate covers exactly the first SHA-256 block of the header
        assert_eq!(HEADER_SIZE - SHA256_BLOCK_SIZE, 48);
        assert_eq!(TIME_OFFSET + 4, BITS_OFFSET);
        assert_eq!(BITS_OFFSET + 4 + 4, HEADER_SIZE);
    }
}
