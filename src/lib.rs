//! # LB1 Miner Core
//!
//! Work generation and hardware protocol core for LB1-class LBRY ASIC
//! miners.
//!
//! The crate does two tightly coupled jobs:
//!
//! - **Job → Work transformation**: turn a pool-issued job (coinbase
//!   fragments, merkle branches, encoded header fields) into a
//!   hardware-ready 136-byte payload, including merkle-root assembly,
//!   header byte-order normalization, SHA-256 midstate precomputation,
//!   target derivation, and proof-of-work verification of returned nonces.
//! - **Device protocol codec**: encode and decode the framed binary
//!   protocol spoken over the device byte stream (status, nonce results,
//!   job dispatch, parameter control), with a type-keyed dispatcher for
//!   incoming frames.
//!
//! Everything in this crate is a pure, stateless transformation over
//! immutable inputs. Pool session handling, device I/O, frame boundary
//! detection, and configuration belong to the surrounding application; the
//! codec expects one complete frame per call.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications,
    clippy::all
)]
#![forbid(unsafe_code)]

pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::{Job, JobId, Target, Work};
pub use crate::error::{Error, Result};
pub use crate::protocol::{dispatch, Packet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of the types most callers need
pub mod prelude {
    pub use crate::core::{Job, JobId, Target, Work};
    pub use crate::error::{Error, Result};
    pub use crate::protocol::{dispatch, Packet};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
