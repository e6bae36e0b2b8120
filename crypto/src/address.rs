//! `atto://` account addresses.
//!
//! An address is the lowercase, unpadded RFC 4648 base32 form of
//! `algorithm code || public key || checksum`, where the checksum is a
//! 5-byte Blake2b digest of the first two parts. 38 bytes encode to 61
//! characters.

use atto_types::{Algorithm, PublicKey};
use blake2::digest::consts::U5;
use blake2::{Blake2b, Digest};

pub const ADDRESS_SCHEME: &str = "atto://";

const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";
const CHECKSUM_LEN: usize = 5;
const PAYLOAD_LEN: usize = 1 + 32 + CHECKSUM_LEN;
const ENCODED_LEN: usize = (PAYLOAD_LEN * 8).div_ceil(5);

fn checksum(algorithm_key: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b::<U5>::new();
    hasher.update(algorithm_key);
    let mut sum = [0u8; CHECKSUM_LEN];
    sum.copy_from_slice(&hasher.finalize());
    sum
}

fn symbol_value(symbol: u8) -> Option<u8> {
    match symbol {
        b'a'..=b'z' => Some(symbol - b'a'),
        b'2'..=b'7' => Some(symbol - b'2' + 26),
        _ => None,
    }
}

fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut acc: u16 = 0;
    let mut bits = 0;
    for &byte in bytes {
        acc = (acc << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[usize::from((acc >> bits) & 0x1F)] as char);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(ALPHABET[usize::from((acc << (5 - bits)) & 0x1F)] as char);
    }
    out
}

/// Decode exactly `PAYLOAD_LEN` bytes. Leftover padding bits must be zero so
/// every payload has one spelling.
fn decode(text: &str) -> Option<[u8; PAYLOAD_LEN]> {
    if text.len() != ENCODED_LEN {
        return None;
    }
    let mut out = [0u8; PAYLOAD_LEN];
    let mut written = 0;
    let mut acc: u16 = 0;
    let mut bits = 0;
    for symbol in text.bytes() {
        acc = (acc << 5) | u16::from(symbol_value(symbol)?);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out[written] = (acc >> bits) as u8;
            written += 1;
        }
        acc &= (1 << bits) - 1;
    }
    (acc == 0).then_some(out)
}

/// Address of a V1 account.
pub fn derive_address(public_key: &PublicKey) -> String {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = Algorithm::V1.code();
    payload[1..33].copy_from_slice(public_key.as_bytes());
    let sum = checksum(&payload[..33]);
    payload[33..].copy_from_slice(&sum);
    format!("{ADDRESS_SCHEME}{}", encode(&payload))
}

/// Public key behind an address, or `None` when the scheme, algorithm,
/// encoding or checksum is wrong.
pub fn decode_address(address: &str) -> Option<PublicKey> {
    let payload = decode(address.trim().strip_prefix(ADDRESS_SCHEME)?)?;
    if payload[0] != Algorithm::V1.code() || checksum(&payload[..33]) != payload[33..] {
        return None;
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&payload[1..33]);
    Some(PublicKey(key))
}
