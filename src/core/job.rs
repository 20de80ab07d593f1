//! Job model for pool-assigned mining tasks
//!
//! A [`Job`] is the hex-decoded, validated form of one stratum
//! `mining.notify`. It is immutable once constructed; superseding and
//! discarding jobs is governed by the pool session layer, not here.

use crate::core::constants::HASH_SIZE;
use crate::error::{Error, Result};
use std::fmt;

/// Opaque pool-assigned job identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JobId(Vec<u8>);

impl JobId {
    /// Create a job ID from raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse a job ID from its hex form
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex).map_err(|e| Error::hex("job_id", e))?;
        Ok(Self(bytes))
    }

    /// Get the job ID as bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// One pool-assigned mining task, decoded into raw bytes.
///
/// All hash-shaped fields are exactly 32 bytes and the encoded header
/// fields exactly 4; [`Job::from_stratum`] enforces this at construction.
/// Merkle branches are ordered and applied left-to-right during work
/// generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Pool-assigned job identifier
    pub job_id: JobId,
    /// Previous block hash, as supplied by the pool
    pub previous_hash: [u8; 32],
    /// Secondary committed root carried alongside the merkle root
    pub trie_hash: [u8; 32],
    /// Coinbase transaction bytes before the nonce extension
    pub coinbase_prefix: Vec<u8>,
    /// Coinbase transaction bytes after the nonce extension
    pub coinbase_suffix: Vec<u8>,
    /// Merkle branch hashes, order significant
    pub merkle_branches: Vec<[u8; 32]>,
    /// Encoded protocol version
    pub version: [u8; 4],
    /// Encoded difficulty bits
    pub bits: [u8; 4],
    /// Encoded block time
    pub time: [u8; 4],
    /// Whether prior work for this session must be discarded
    pub clean: bool,
}

fn decode_hash(field: &'static str, hex: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex).map_err(|e| Error::hex(field, e))?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| Error::invalid_length(field, HASH_SIZE, bytes.len()))
}

fn decode_u32_field(field: &'static str, hex: &str) -> Result<[u8; 4]> {
    let bytes = hex::decode(hex).map_err(|e| Error::hex(field, e))?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| Error::invalid_length(field, 4, bytes.len()))
}

impl Job {
    /// Decode a job from the hex fields of a stratum `mining.notify`.
    ///
    /// Returns a fully validated job or a typed error; never a partially
    /// built value.
    #[allow(clippy::too_many_arguments)]
    pub fn from_stratum(
        job_id: &str,
        previous_hash: &str,
        trie_hash: &str,
        coinbase_prefix: &str,
        coinbase_suffix: &str,
        merkle_branches: &[impl AsRef<str>],
        version: &str,
        bits: &str,
        time: &str,
        clean: bool,
    ) -> Result<Self> {
        let merkle_branches = merkle_branches
            .iter()
            .map(|branch| decode_hash("merkle_branch", branch.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            job_id: JobId::from_hex(job_id)?,
            previous_hash: decode_hash("previous_hash", previous_hash)?,
            trie_hash: decode_hash("trie_hash", trie_hash)?,
            coinbase_prefix: hex::decode(coinbase_prefix)
                .map_err(|e| Error::hex("coinbase_prefix", e))?,
            coinbase_suffix: hex::decode(coinbase_suffix)
                .map_err(|e| Error::hex("coinbase_suffix", e))?,
            merkle_branches,
            version: decode_u32_field("version", version)?,
            bits: decode_u32_field("bits", bits)?,
            time: decode_u32_field("time", time)?,
            clean,
        })
    }
}
