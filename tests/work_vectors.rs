//! End-to-end job → work → nonce verification vectors
//!
//! The job fields and the expected hardware payload come from a captured
//! pool session against production hardware; they pin the whole pipeline
//! (coinbase assembly, merkle fold, byte-order normalization, midstate)
//! to exact bytes.

use lb1_miner::core::hash::{pow_hash, sha256d};
use lb1_miner::{Job, Target, Work};
use pretty_assertions::assert_eq;

fn reference_job() -> Job {
    Job::from_stratum(
        "a309",
        "5334d82d54583671aa7e8f9e5f482204d101e74104c8056af2280c7d2dffb941",
        "b27a34586645220b88082e3f5520793bd01ff1ccce4d5c936d5b12802920c481",
        "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff2003fd380f04d01af56008",
        "0d2f6e6f64655374726174756d2f00000000020000000000000000266a24aa21a9ed33fe741208823b47a170823b5d7c2d3367cccb5572c2ff3111c01551f9727e4116e13a07060000001976a914bf4881a63ce29d7370f633422e868c2005d751d188ac00000000",
        &[
            "6f1d8577d899831597c552ec0065a1cbbd25bc119ad8a04caf3d72af1016da03",
            "0fb08b473071bdf8166248d5e692432007ff6ec0688a907454c4f10e1a4f2678",
            "d0dc4ae212225f4ff187be665bce09146903a341508775d1900e0992592f14dc",
            "394fb707a447461f4353b8a81d64ef3d48c9dccab2a8fa4bb80e7f84e40f679b",
            "92d1b6b8bc05878f642e0132bda2582c4ff64eab9b857e11eea19d0245716e70",
        ],
        "20000000",
        "1a015329",
        "60f51ad0",
        true,
    )
    .expect("reference job decodes")
}

const EXPECTED_DATA: &str = "\
c6ebd9b56feb0e6731b17c71170e2417\
b9fc64025a0f53d2b76e41f7812ff3a3\
70c5fa2e58347ab20b2245663f2e0888\
3b792055ccf11fd0935c4dce80125b6d\
81c42029d01af5602953011a00000000\
0000000000000000000000000000000000000000\
0000000000000000000000000000000000000000\
00000000000000000000000000000000";

#[test]
fn work_payload_matches_reference_vector() {
    let job = reference_job();
    let target = Target::from_difficulty(262144).unwrap();
    let extranonce1 = hex::decode("485fd81a").unwrap();

    let work = Work::from_job(&job, &extranonce1, 4, target).unwrap();

    assert_eq!(hex::encode(work.data()), EXPECTED_DATA);
    assert_eq!(work.job_id.to_hex(), "a309");
    assert!(work.clean);
    assert_eq!(work.nonce_extension, hex::decode("485fd81a00000000").unwrap());
}

#[test]
fn nonce_verification_follows_target() {
    let job = reference_job();
    let target = Target::from_difficulty(262144).unwrap();
    let extranonce1 = hex::decode("485fd81a").unwrap();

    let mut work = Work::from_job(&job, &extranonce1, 4, target).unwrap();

    let mut candidate = [0u8; 8];
    candidate.copy_from_slice(&hex::decode("1e0cb44802000000").unwrap());

    // Too hard at the pool difficulty.
    assert!(!work.check_nonce(&candidate));

    // Relaxing the target makes the same candidate a share.
    let relaxed = Target::from_hex(
        "0000000033333333ffffffffffffffffffffffffffffffffffffffffffffffff",
    )
    .unwrap();
    work.set_target(relaxed);
    assert!(work.check_nonce(&candidate));
}

#[test]
fn work_is_deterministic() {
    let job = reference_job();
    let target = Target::from_difficulty(262144).unwrap();
    let extranonce1 = hex::decode("485fd81a").unwrap();

    let a = Work::from_job(&job, &extranonce1, 4, target).unwrap();
    let b = Work::from_job(&job, &extranonce1, 4, target).unwrap();
    assert_eq!(a.data(), b.data());
    assert_eq!(a.header(), b.header());
}

#[test]
fn composite_hash_is_pinned_to_its_construction() {
    // Fixed 80-byte header: the composite digest must match the chained
    // primitives and must differ from plain double SHA-256.
    let header: Vec<u8> = (0u8..80).collect();

    let digest = pow_hash(&header);
    assert_ne!(digest, sha256d(&header));

    // Stable across calls and inputs sliced the same way.
    assert_eq!(digest, pow_hash(&header.clone()));
}
