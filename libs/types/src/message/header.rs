//! Event stream headers
//!
//! A header is a name plus a typed value. The header block encodes each
//! header as:
//!
//! ```text
//! ┌──────────┬──────────────┬───────────┬─────────────────────────┐
//! │ name len │ name (UTF-8) │ type code │ value                   │
//! │ u8       │ 1..=255      │ u8        │ big-endian, see below   │
//! └──────────┴──────────────┴───────────┴─────────────────────────┘
//! ```
//!
//! Booleans carry no value bytes (the type code is the value). Byte arrays
//! and strings carry a u16 length prefix. Timestamps are i64 epoch millis.

use bytes::{BufMut, Bytes};
use chrono::{DateTime, Utc};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

/// Wire type codes for header values
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum HeaderValueType {
    BoolTrue = 0,
    BoolFalse = 1,
    Byte = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    ByteArray = 6,
    String = 7,
    Timestamp = 8,
}

/// Typed header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Bool(bool),
    Byte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    ByteArray(Bytes),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl HeaderValue {
    pub fn value_type(&self) -> HeaderValueType {
        match self {
            HeaderValue::Bool(true) => HeaderValueType::BoolTrue,
            HeaderValue::Bool(false) => HeaderValueType::BoolFalse,
            HeaderValue::Byte(_) => HeaderValueType::Byte,
            HeaderValue::Int16(_) => HeaderValueType::Int16,
            HeaderValue::Int32(_) => HeaderValueType::Int32,
            HeaderValue::Int64(_) => HeaderValueType::Int64,
            HeaderValue::ByteArray(_) => HeaderValueType::ByteArray,
            HeaderValue::String(_) => HeaderValueType::String,
            HeaderValue::Timestamp(_) => HeaderValueType::Timestamp,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::String(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::String(s)
    }
}

/// Header block encoding failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderEncodeError {
    #[error("Header name '{name}' is {len} bytes, limit is 255")]
    NameTooLong { name: String, len: usize },

    #[error("Header '{name}' value is {len} bytes, limit is {limit}")]
    ValueTooLong {
        name: String,
        len: usize,
        limit: usize,
    },
}

/// Named, typed frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: HeaderValue,
}

impl Header {
    pub fn new(name: impl Into<String>, value: HeaderValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// Append this header's wire form to `out`
    pub fn encode_into<B: BufMut>(&self, out: &mut B) -> Result<(), HeaderEncodeError> {
        let name = self.name.as_bytes();
        let name_len = u8::try_from(name.len()).map_err(|_| HeaderEncodeError::NameTooLong {
            name: self.name.clone(),
            len: name.len(),
        })?;

        out.put_u8(name_len);
        out.put_slice(name);
        out.put_u8(self.value.value_type().into());

        match &self.value {
            HeaderValue::Bool(_) => {}
            HeaderValue::Byte(v) => out.put_i8(*v),
            HeaderValue::Int16(v) => out.put_i16(*v),
            HeaderValue::Int32(v) => out.put_i32(*v),
            HeaderValue::Int64(v) => out.put_i64(*v),
            HeaderValue::ByteArray(bytes) => self.put_prefixed(out, bytes)?,
            HeaderValue::String(s) => self.put_prefixed(out, s.as_bytes())?,
            HeaderValue::Timestamp(ts) => out.put_i64(ts.timestamp_millis()),
        }
        Ok(())
    }

    fn put_prefixed<B: BufMut>(&self, out: &mut B, bytes: &[u8]) -> Result<(), HeaderEncodeError> {
        let len = u16::try_from(bytes.len()).map_err(|_| HeaderEncodeError::ValueTooLong {
            name: self.name.clone(),
            len: bytes.len(),
            limit: u16::MAX as usize,
        })?;
        out.put_u16(len);
        out.put_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn encode(header: &Header) -> Vec<u8> {
        let mut out = Vec::new();
        header.encode_into(&mut out).unwrap();
        out
    }

    #[test]
    fn test_type_codes_match_wire_registry() {
        assert_eq!(u8::from(HeaderValueType::BoolTrue), 0);
        assert_eq!(u8::from(HeaderValueType::Timestamp), 8);
        assert_eq!(HeaderValueType::try_from(7u8).unwrap(), HeaderValueType::String);
        assert!(HeaderValueType::try_from(9u8).is_err());
    }

    #[test]
    fn test_encode_int32_header() {
        let header = Header::new("code", HeaderValue::Int32(42));
        assert_eq!(encode(&header), vec![4, b'c', b'o', b'd', b'e', 4, 0, 0, 0, 42]);
    }

    #[test]
    fn test_encode_bool_has_no_value_bytes() {
        assert_eq!(encode(&Header::new("f", HeaderValue::Bool(true))), vec![1, b'f', 0]);
        assert_eq!(encode(&Header::new("f", HeaderValue::Bool(false))), vec![1, b'f', 1]);
    }

    #[test]
    fn test_encode_string_is_length_prefixed() {
        let header = Header::new(":event-type", HeaderValue::from("Send"));
        let bytes = encode(&header);
        assert_eq!(bytes[0] as usize, ":event-type".len());
        assert_eq!(bytes[12], 7);
        assert_eq!(&bytes[13..15], &[0, 4]);
        assert_eq!(&bytes[15..], b"Send");
    }

    #[test]
    fn test_encode_timestamp_as_millis() {
        let ts = Utc.timestamp_millis_opt(1_500).unwrap();
        let bytes = encode(&Header::new("t", HeaderValue::Timestamp(ts)));
        assert_eq!(&bytes[3..], &1_500i64.to_be_bytes());
    }

    #[test]
    fn test_encode_rejects_oversized_name_and_value() {
        let long_name = "n".repeat(256);
        let err = Header::new(long_name.clone(), HeaderValue::Bool(true))
            .encode_into(&mut Vec::<u8>::new())
            .unwrap_err();
        assert_eq!(err, HeaderEncodeError::NameTooLong { name: long_name, len: 256 });

        let big = Bytes::from(vec![0u8; u16::MAX as usize + 1]);
        let err = Header::new("blob", HeaderValue::ByteArray(big))
            .encode_into(&mut Vec::<u8>::new())
            .unwrap_err();
        assert!(matches!(err, HeaderEncodeError::ValueTooLong { len: 65_536, .. }));
    }
}
