//! Hash primitives for the LBRY proof-of-work
//!
//! All functions here are pure and stateless; they can be called
//! concurrently from any number of threads.
//!
//! The proof-of-work function is not plain double SHA-256: it chains
//! SHA-256d, SHA-512, and RIPEMD-160 into a composite digest. See
//! [`pow_hash`] for the exact construction, which must be reproduced
//! bit-for-bit.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Compute SHA-256 applied twice
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

/// Compute RIPEMD-160
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute SHA-512
pub fn sha512(data: &[u8]) -> [u8; 64] {
    Sha512::digest(data).into()
}

/// Compute the composite LBRY proof-of-work hash of a block header.
///
/// The construction is: SHA-256d of the header, SHA-512 of that 32-byte
/// digest, RIPEMD-160 of each 32-byte half of the 64-byte result, then
/// SHA-256d of the two concatenated 20-byte digests.
pub fn pow_hash(header: &[u8]) -> [u8; 32] {
    let inner = sha256d(header);
    let stretched = sha512(&inner);

    let left = ripemd160(&stretched[..32]);
    let right = ripemd160(&stretched[32..]);

    let mut folded = [0u8; 40];
    folded[..20].copy_from_slice(&left);
    folded[20..].copy_from_slice(&right);
    sha256d(&folded)
}

/// SHA-256 initialization vector
const H: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// SHA-256 round constants
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Run one SHA-256 compression round over a 64-byte block with the
/// standard initialization vector and return the resulting chaining value
/// as 32 big-endian bytes.
///
/// This is the "midstate" the ASIC expects: the device only varies the
/// tail of the header per nonce attempt, so the first block's contribution
/// to the hash state is computed once per work unit instead of once per
/// trial. Unlike a full SHA-256, no padding or length encoding is applied.
pub fn sha256_midstate(block: &[u8; 64]) -> [u8; 32] {
    let mut w = [0u32; 64];
    for (idx, chunk) in block.chunks_exact(4).enumerate() {
        w[idx] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for idx in 16..64 {
        let s0 = w[idx - 15].rotate_right(7) ^ w[idx - 15].rotate_right(18) ^ (w[idx - 15] >> 3);
        let s1 = w[idx - 2].rotate_right(17) ^ w[idx - 2].rotate_right(19) ^ (w[idx - 2] >> 10);
        w[idx] = w[idx - 16]
            .wrapping_add(s0)
            .wrapping_add(w[idx - 7])
            .wrapping_add(s1);
    }

    let mut state = H;
    for idx in 0..64 {
        let [a, b, c, d, e, f, g, h] = state;
        let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let temp1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K[idx])
            .wrapping_add(w[idx]);
        let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let temp2 = s0.wrapping_add(maj);

        state = [
            temp1.wrapping_add(temp2),
            a,
            b,
            c,
            d.wrapping_add(temp1),
            e,
            f,
            g,
        ];
    }

    let mut out = [0u8; 32];
    for (idx, word) in state.iter().enumerate() {
        let chained = H[idx].wrapping_add(*word);
        out[idx * 4..idx * 4 + 4].copy_from_slice(&chained.to_be_bytes());
    }
    out
}
