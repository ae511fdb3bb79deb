//! Byte encoding for keys and values.
//!
//! Keys encode deterministically: integers as big-endian fixed-width bytes so
//! lexicographic byte order matches numeric order within one width, raw bytes
//! and UTF-8 strings pass through unchanged. Signed integers keep their two's
//! complement form, so negative keys sort after non-negative ones; callers
//! that mix signs must account for that. Anything else goes through the
//! generic serializer via the [`Serialized`] adapter and is treated as opaque
//! bytes.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, WharfError};

pub(crate) fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(WharfError::EncodeFailed)
}

pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(WharfError::DecodeFailed)
}

/// Conversion of a key into its stored byte form.
pub trait EncodeKey {
    fn encode_key(&self) -> Result<Vec<u8>>;

    /// Whether a trailing `'*'` in the encoded form may act as a prefix
    /// wildcard in key scans. Only byte and string keys opt in.
    fn wildcard(&self) -> bool {
        false
    }
}

/// Conversion of a value into its stored byte form. Raw byte types pass
/// through; everything else is run through the generic serializer.
pub trait EncodeValue {
    fn encode_value(&self) -> Result<Vec<u8>>;
}

/// Reconstruction of a value from its stored byte form.
pub trait DecodeValue: Sized {
    fn decode_value(bytes: &[u8]) -> Result<Self>;
}

/// Routes any serde-serializable payload through the generic serializer,
/// for keys or values outside the built-in byte/string/integer set.
pub struct Serialized<T>(pub T);

impl<T: EncodeKey + ?Sized> EncodeKey for &T {
    fn encode_key(&self) -> Result<Vec<u8>> {
        (**self).encode_key()
    }

    fn wildcard(&self) -> bool {
        (**self).wildcard()
    }
}

impl<T: EncodeValue + ?Sized> EncodeValue for &T {
    fn encode_value(&self) -> Result<Vec<u8>> {
        (**self).encode_value()
    }
}

impl EncodeKey for [u8] {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }

    fn wildcard(&self) -> bool {
        true
    }
}

impl EncodeKey for Vec<u8> {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }

    fn wildcard(&self) -> bool {
        true
    }
}

impl<const N: usize> EncodeKey for [u8; N] {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }

    fn wildcard(&self) -> bool {
        true
    }
}

impl EncodeKey for str {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }

    fn wildcard(&self) -> bool {
        true
    }
}

impl EncodeKey for String {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }

    fn wildcard(&self) -> bool {
        true
    }
}

macro_rules! numeric_key {
    ($($t:ty),* $(,)?) => {$(
        impl EncodeKey for $t {
            fn encode_key(&self) -> Result<Vec<u8>> {
                Ok(self.to_be_bytes().to_vec())
            }
        }
    )*};
}

numeric_key!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

// Pointer-width integers are pinned to 8 bytes so the encoding does not
// change across platforms.
impl EncodeKey for usize {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok((*self as u64).to_be_bytes().to_vec())
    }
}

impl EncodeKey for isize {
    fn encode_key(&self) -> Result<Vec<u8>> {
        Ok((*self as i64).to_be_bytes().to_vec())
    }
}

impl<T: Serialize> EncodeKey for Serialized<T> {
    fn encode_key(&self) -> Result<Vec<u8>> {
        serialize(&self.0)
    }
}

impl EncodeValue for [u8] {
    fn encode_value(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl EncodeValue for Vec<u8> {
    fn encode_value(&self) -> Result<Vec<u8>> {
        Ok(self.clone())
    }
}

impl<const N: usize> EncodeValue for [u8; N] {
    fn encode_value(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

impl EncodeValue for Bytes {
    fn encode_value(&self) -> Result<Vec<u8>> {
        Ok(self.to_vec())
    }
}

macro_rules! serialized_value {
    ($($t:ty),* $(,)?) => {$(
        impl EncodeValue for $t {
            fn encode_value(&self) -> Result<Vec<u8>> {
                serialize(self)
            }
        }
    )*};
}

serialized_value!(
    str, String, bool, u8, u16, u32, u64, i8, i16, i32, i64, usize, isize, f32, f64,
);

impl<T: Serialize> EncodeValue for Serialized<T> {
    fn encode_value(&self) -> Result<Vec<u8>> {
        serialize(&self.0)
    }
}

impl DecodeValue for Vec<u8> {
    fn decode_value(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

impl DecodeValue for Bytes {
    fn decode_value(bytes: &[u8]) -> Result<Self> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

macro_rules! deserialized_value {
    ($($t:ty),* $(,)?) => {$(
        impl DecodeValue for $t {
            fn decode_value(bytes: &[u8]) -> Result<Self> {
                deserialize(bytes)
            }
        }
    )*};
}

deserialized_value!(String, bool, u8, u16, u32, u64, i8, i16, i32, i64, usize, isize, f32, f64);

impl<T: DeserializeOwned> DecodeValue for Serialized<T> {
    fn decode_value(bytes: &[u8]) -> Result<Self> {
        Ok(Serialized(deserialize(bytes)?))
    }
}
