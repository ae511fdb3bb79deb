//! On-disk record format for the index log.
//!
//! Every record is a fixed 16-byte prefix followed by the key bytes. All
//! multi-byte fields are big-endian. There is no trailing checksum.
//!
//! | offset | size     | field                          |
//! |--------|----------|--------------------------------|
//! | 0      | 1        | format version (currently 0)   |
//! | 1      | 1        | op code: 0 = put, 1 = delete   |
//! | 2      | 4        | value offset                   |
//! | 6      | 4        | value size                     |
//! | 10     | 4        | timestamp (unix seconds)       |
//! | 14     | 2        | key size                       |
//! | 16     | key size | key bytes                      |

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogOp {
    Put = 0,
    Delete = 1,
}

/// Total size of a record carrying a key of `key_len` bytes.
pub fn record_size(key_len: usize) -> usize {
    RECORD_PREFIX_SIZE + key_len
}

/// Seconds since the unix epoch, truncated to the 4-byte record field.
pub fn now_secs() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as u32
}

pub fn encode_record(
    op: LogOp,
    value_offset: u32,
    value_size: u32,
    timestamp: u32,
    key: &[u8],
) -> Vec<u8> {
    debug_assert!(key.len() <= MAX_KEY_SIZE);
    let mut buf = Vec::with_capacity(record_size(key.len()));
    buf.push(RECORD_VERSION);
    buf.push(op as u8);
    buf.extend_from_slice(&value_offset.to_be_bytes());
    buf.extend_from_slice(&value_size.to_be_bytes());
    buf.extend_from_slice(&timestamp.to_be_bytes());
    buf.extend_from_slice(&(key.len() as u16).to_be_bytes());
    buf.extend_from_slice(key);
    buf
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub op: LogOp,
    pub value_offset: u32,
    pub value_size: u32,
    pub timestamp: u32,
    pub key: Vec<u8>,
}

impl ParsedRecord {
    pub fn encoded_len(&self) -> usize {
        record_size(self.key.len())
    }
}

/// Parse one record from the front of `data`. Returns `None` when the buffer
/// does not hold a complete record (truncated tail) or the op code is
/// unknown; a recovery scan stops at that point.
pub fn parse_record(data: &[u8]) -> Option<ParsedRecord> {
    if data.len() < RECORD_PREFIX_SIZE {
        return None;
    }

    let op = match data[REC_OFF_OP] {
        0 => LogOp::Put,
        1 => LogOp::Delete,
        _ => return None,
    };

    let value_offset = u32::from_be_bytes(data[REC_OFF_VALUE_OFFSET..REC_OFF_VALUE_SIZE].try_into().ok()?);
    let value_size = u32::from_be_bytes(data[REC_OFF_VALUE_SIZE..REC_OFF_TIMESTAMP].try_into().ok()?);
    let timestamp = u32::from_be_bytes(data[REC_OFF_TIMESTAMP..REC_OFF_KEY_SIZE].try_into().ok()?);
    let key_len = u16::from_be_bytes(data[REC_OFF_KEY_SIZE..REC_OFF_KEY].try_into().ok()?) as usize;

    if data.len() < RECORD_PREFIX_SIZE + key_len {
        return None;
    }

    Some(ParsedRecord {
        op,
        value_offset,
        value_size,
        timestamp,
        key: data[REC_OFF_KEY..REC_OFF_KEY + key_len].to_vec(),
    })
}
