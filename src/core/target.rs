//! Target type for share difficulty
//!
//! A target is the 256-bit big-endian upper bound a (byte-reversed)
//! proof-of-work hash has to stay strictly below for a share to count.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum target value (lowest difficulty)
const MAX_TARGET: [u8; 32] = [0xFF; 32];

/// Represents a 256-bit big-endian mining target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target(pub [u8; 32]);

impl Target {
    /// Create a new Target from big-endian bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Target from a hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = hex::decode(hex).map_err(|e| Error::hex("target", e))?;
        if bytes.len() != 32 {
            return Err(Error::invalid_length("target", 32, bytes.len()));
        }

        let mut array = [0u8; 32];
        array.copy_from_slice(&bytes);
        Ok(Self(array))
    }

    /// Derive the comparison target for a pool share difficulty.
    ///
    /// The quotient `0xFFFFFFFF / difficulty` is rendered as a 4-byte
    /// big-endian value, left-zero-padded to 8 bytes, and followed by 24
    /// bytes of `0xFF`.
    pub fn from_difficulty(difficulty: u64) -> Result<Self> {
        if difficulty == 0 {
            return Err(Error::ZeroDifficulty);
        }

        let quotient = 0xFFFF_FFFFu64 / difficulty;
        let mut bytes = [0xFFu8; 32];
        bytes[..4].copy_from_slice(&[0u8; 4]);
        bytes[4..8].copy_from_slice(&(quotient as u32).to_be_bytes());
        Ok(Self(bytes))
    }

    /// Get the target as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check whether a big-endian hash is strictly below this target.
    ///
    /// Equal values do not meet the target.
    pub fn is_met_by(&self, hash: &[u8; 32]) -> bool {
        for (hash_byte, target_byte) in hash.iter().zip(self.0.iter()) {
            match hash_byte.cmp(target_byte) {
                std::cmp::Ordering::Less => return true,
                std::cmp::Ordering::Greater => return false,
                std::cmp::Ordering::Equal => continue,
            }
        }
        false
    }

    /// Estimate the share difficulty this target corresponds to
    pub fn to_difficulty(&self) -> u64 {
        let target_big = BigUint::from_bytes_be(&self.0);
        if target_big.is_zero() {
            return u64::MAX;
        }

        let max_target_big = BigUint::from_bytes_be(&MAX_TARGET);
        let difficulty_big = &max_target_big / &target_big;

        // The top 24 bytes of any derived target are 0xFF, so the quotient
        // always fits, but cap it for arbitrary inputs.
        difficulty_big.try_into().unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Target {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
