//! Hardware-ready work units
//!
//! A [`Work`] is derived from exactly one [`Job`] plus a per-assignment
//! nonce extension and target. It carries the 136-byte payload the device
//! consumes (midstate + header tail + padding) and keeps the wire-ordered
//! 112-byte header around so returned nonces can be verified against the
//! target.

use crate::core::constants::{
    BITS_OFFSET, HEADER_SIZE, NONCE_SIZE, SHA256_BLOCK_SIZE, TIME_OFFSET, WORK_DATA_SIZE,
};
use crate::core::hash::{pow_hash, sha256d, sha256_midstate};
use crate::core::{Job, JobId, Target};
use crate::error::{Error, Result};
use std::fmt;
use std::time::SystemTime;

/// Reverse the bytes of each 4-byte word in place, keeping word order.
///
/// This is the byte-order normalization between the hash-internal
/// representation and the wire layout the device expects.
fn reverse_words(buf: &mut [u8]) {
    for word in buf.chunks_exact_mut(4) {
        word.reverse();
    }
}

/// One hardware-ready unit of work.
///
/// Immutable after construction, except for [`Work::set_target`] which is
/// used when the pool retargets a live assignment.
#[derive(Clone, PartialEq, Eq)]
pub struct Work {
    /// Job identifier this work was derived from
    pub job_id: JobId,
    /// Nonce-extension bytes inserted into the coinbase
    pub nonce_extension: Vec<u8>,
    /// Share target returned nonces are checked against
    target: Target,
    /// Hardware payload: midstate, header tail, zero padding
    data: [u8; WORK_DATA_SIZE],
    /// Wire-ordered header the midstate was taken from, kept for
    /// verification
    header: [u8; HEADER_SIZE],
    /// Creation timestamp
    pub created_at: SystemTime,
    /// Inherited clean flag
    pub clean: bool,
}

impl Work {
    /// Build a work unit from a job.
    ///
    /// `extranonce1` is the pool-negotiated per-worker extension;
    /// `extranonce2_size` reserves a zero-filled sub-extension for the
    /// device's own search space. Together they occupy the position
    /// between the two coinbase fragments, exactly as wide as the pool
    /// negotiated; nothing is padded or truncated beyond that.
    pub fn from_job(
        job: &Job,
        extranonce1: &[u8],
        extranonce2_size: usize,
        target: Target,
    ) -> Result<Self> {
        let mut nonce_extension = extranonce1.to_vec();
        nonce_extension.resize(extranonce1.len() + extranonce2_size, 0);

        // Coinbase assembly and merkle fold, left-to-right.
        let mut coinbase = Vec::with_capacity(
            job.coinbase_prefix.len() + nonce_extension.len() + job.coinbase_suffix.len(),
        );
        coinbase.extend_from_slice(&job.coinbase_prefix);
        coinbase.extend_from_slice(&nonce_extension);
        coinbase.extend_from_slice(&job.coinbase_suffix);

        let mut merkle_root = sha256d(&coinbase);
        for branch in &job.merkle_branches {
            let mut node = [0u8; 64];
            node[..32].copy_from_slice(&merkle_root);
            node[32..].copy_from_slice(branch);
            merkle_root = sha256d(&node);
        }

        // The merkle root leaves the fold in hash-internal word order;
        // normalize it before it enters the header.
        reverse_words(&mut merkle_root);

        let mut header_bytes = Vec::with_capacity(HEADER_SIZE);
        header_bytes.extend_from_slice(&job.version);
        header_bytes.extend_from_slice(&job.previous_hash);
        header_bytes.extend_from_slice(&merkle_root);
        header_bytes.extend_from_slice(&job.trie_hash);
        header_bytes.extend_from_slice(&job.time);
        header_bytes.extend_from_slice(&job.bits);
        header_bytes.extend_from_slice(&[0u8; 4]);

        let header: [u8; HEADER_SIZE] = header_bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| Error::invalid_length("header", HEADER_SIZE, bytes.len()))?;

        // Wire byte order, then midstate over the first block. The device
        // only varies the header tail per attempt, so the first block's
        // contribution is computed once here.
        let mut wire = header;
        reverse_words(&mut wire);

        let mut first_block = [0u8; SHA256_BLOCK_SIZE];
        first_block.copy_from_slice(&wire[..SHA256_BLOCK_SIZE]);
        let midstate = sha256_midstate(&first_block);

        let mut data = [0u8; WORK_DATA_SIZE];
        data[..32].copy_from_slice(&midstate);
        data[32..32 + (HEADER_SIZE - SHA256_BLOCK_SIZE)]
            .copy_from_slice(&wire[SHA256_BLOCK_SIZE..]);

        tracing::debug!(
            job_id = %job.job_id,
            extension = %hex::encode(&nonce_extension),
            branches = job.merkle_branches.len(),
            "built work unit"
        );

        Ok(Self {
            job_id: job.job_id.clone(),
            nonce_extension,
            target,
            data,
            header: wire,
            created_at: SystemTime::now(),
            clean: job.clean,
        })
    }

    /// Get the 136-byte hardware payload
    pub fn data(&self) -> &[u8; WORK_DATA_SIZE] {
        &self.data
    }

    /// Get the wire-ordered 112-byte header the payload was derived from
    pub fn header(&self) -> &[u8; HEADER_SIZE] {
        &self.header
    }

    /// Get the current share target
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Replace the share target.
    ///
    /// The one permitted mutation, used when the pool retargets a live
    /// assignment.
    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    /// Get the work age in seconds
    pub fn age_seconds(&self) -> u64 {
        self.created_at.elapsed().unwrap_or_default().as_secs()
    }

    /// Check whether a device nonce candidate solves this work.
    ///
    /// The candidate's upper four bytes are a little-endian time roll the
    /// device applied on top of the header time (little-endian in the
    /// wire-ordered header); the lower four are the nonce proper. The
    /// wire header is reassembled accordingly, hashed with the composite
    /// proof-of-work function, byte-reversed, and compared as a big-endian
    /// integer against the target.
    ///
    /// Pure; safe to call concurrently for many candidates against the
    /// same work.
    pub fn check_nonce(&self, candidate: &[u8; NONCE_SIZE]) -> bool {
        let mut time_bytes = [0u8; 4];
        time_bytes.copy_from_slice(&self.header[TIME_OFFSET..TIME_OFFSET + 4]);
        let mut roll_bytes = [0u8; 4];
        roll_bytes.copy_from_slice(&candidate[4..]);
        let adjusted = u32::from_le_bytes(time_bytes).wrapping_add(u32::from_le_bytes(roll_bytes));

        let mut header = [0u8; HEADER_SIZE];
        header[..TIME_OFFSET].copy_from_slice(&self.header[..TIME_OFFSET]);
        header[TIME_OFFSET..TIME_OFFSET + 4].copy_from_slice(&adjusted.to_le_bytes());
        header[BITS_OFFSET..BITS_OFFSET + 4]
            .copy_from_slice(&self.header[BITS_OFFSET..BITS_OFFSET + 4]);
        header[BITS_OFFSET + 4..].copy_from_slice(&candidate[..4]);

        let mut hash = pow_hash(&header);
        hash.reverse();
        self.target.is_met_by(&hash)
    }
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work")
            .field("job_id", &self.job_id)
            .field("nonce_extension", &hex::encode(&self.nonce_extension))
            .field("target", &self.target)
            .field("data", &hex::encode(self.data))
            .field("clean", &self.clean)
            .finish()
    }
}
