//! Uppercase hex (de)serialization for fixed-size byte arrays.
//!
//! Used with `#[serde(with = "crate::hex_format")]` so that keys, hashes,
//! signatures and work values travel as strings on the JSON wire.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

use crate::TypesError;

pub(crate) fn serialize<S: Serializer, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode_upper(bytes))
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    let s = String::deserialize(deserializer)?;
    decode_fixed(&s).map_err(D::Error::custom)
}

/// Decode a hex string (either case) into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypesError> {
    let bytes = hex::decode(s.trim()).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| TypesError::InvalidLength { expected: N, actual })
}
