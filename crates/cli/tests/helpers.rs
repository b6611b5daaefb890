use std::fs;

use sha2::{Digest, Sha256};
use tempfile::tempdir;
use unidis::{parse_address, parse_segment_key, sha256_file};
use unidis_core::SegmentKey;

#[test]
fn parse_address_accepts_hex_and_decimal() {
    assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
    assert_eq!(parse_address("0X1f").unwrap(), 0x1f);
    assert_eq!(parse_address("4096").unwrap(), 4096);
    assert_eq!(parse_address(" 16 ").unwrap(), 16);
}

#[test]
fn parse_address_rejects_garbage() {
    for bad in ["", "0x", "0xzz", "-1", "12abc", ".text"] {
        let err = parse_address(bad).unwrap_err();
        assert!(err.to_string().contains("Invalid address"), "input {bad:?}");
    }
}

#[test]
fn segment_keys_prefer_addresses() {
    assert_eq!(parse_segment_key("0x2000"), SegmentKey::Address(0x2000));
    assert_eq!(parse_segment_key("8192"), SegmentKey::Address(8192));
    assert_eq!(parse_segment_key(".data"), SegmentKey::Name(".data".to_string()));
}

#[test]
fn sha256_file_matches_direct_digest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blob.bin");
    fs::write(&path, b"unidis").unwrap();

    let expected = format!("{:x}", Sha256::digest(b"unidis"));
    assert_eq!(sha256_file(&path).unwrap(), expected);
}

#[test]
fn sha256_file_reports_missing_file() {
    let dir = tempdir().unwrap();
    let err = sha256_file(&dir.path().join("missing")).unwrap_err();
    assert!(err.to_string().contains("Failed to open file for hashing"));
}
