//! Tests for the digest engine

use pagebench::{digest, PageDigest, DIGEST_SIZE};

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

#[test]
fn test_known_vectors() {
    assert_eq!(digest(b"").to_string(), EMPTY_SHA256);
    assert_eq!(digest(b"abc").to_string(), ABC_SHA256);
}

#[test]
fn test_digest_is_32_bytes() {
    assert_eq!(digest(&[0u8; 8192]).as_bytes().len(), DIGEST_SIZE);
}

#[test]
fn test_deterministic() {
    let page = vec![0x5Au8; 8192];
    assert_eq!(digest(&page), digest(&page));
}

#[test]
fn test_single_bit_flip_changes_digest() {
    let page = vec![0u8; 8192];
    let mut flipped = page.clone();
    flipped[4096] ^= 0x01;

    let a = digest(&page);
    let b = digest(&flipped);

    assert_ne!(a, b);
    let differing = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .filter(|(x, y)| x != y)
        .count();
    assert!(differing > DIGEST_SIZE / 2);
}

#[test]
fn test_trailing_zeros_matter() {
    // A truncated page and its zero-padded form are different pages
    assert_ne!(digest(&[1, 2, 3]), digest(&[1, 2, 3, 0]));
}

#[test]
fn test_from_slice_checks_length() {
    let d = digest(b"abc");

    assert_eq!(PageDigest::from_slice(d.as_bytes()), Some(d));
    assert_eq!(PageDigest::from_slice(&[0u8; 31]), None);
    assert_eq!(PageDigest::from_slice(&[0u8; 33]), None);
}
