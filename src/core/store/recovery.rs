use std::sync::atomic::Ordering;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::core::index::{KeyIndex, Slot};
use crate::error::Result;
use crate::stats::Statistics;
use crate::storage::format::{self, LogOp};
use crate::storage::FilePair;

/// Replay the index log into an empty index.
///
/// A put for an unseen key inserts it; a put for a key seen earlier in the
/// scan overwrites its slot and keeps the original position in the ordered
/// sequence; a delete removes it. The running offset stamps each slot's
/// `key_record_offset` so later overwrites rewrite the right record. In
/// memory-first mode every live value is read into its slot eagerly.
pub(crate) fn replay_log(
    index: &mut KeyIndex,
    files: &mut FilePair,
    memory_first: bool,
    stats: &Statistics,
) -> Result<()> {
    let buf = files.log.read_all()?;
    let mut read_offset = 0usize;
    let mut replayed = 0u64;

    while read_offset < buf.len() {
        let Some(record) = format::parse_record(&buf[read_offset..]) else {
            warn!(
                offset = read_offset,
                "index log ends in a partial record, ignoring tail"
            );
            break;
        };

        match record.op {
            LogOp::Put => {
                let mut slot = Slot {
                    value_offset: record.value_offset,
                    value_size: record.value_size,
                    key_record_offset: read_offset as u32,
                    value: None,
                };
                if memory_first {
                    let bytes = files
                        .values
                        .read_exact_at(record.value_offset, record.value_size)?;
                    slot.value = Some(Bytes::from(bytes));
                }
                if index.contains(&record.key) {
                    index.update(&record.key, slot);
                } else {
                    index.insert(record.key.clone(), slot);
                }
            }
            LogOp::Delete => {
                index.remove(&record.key);
            }
        }

        read_offset += record.encoded_len();
        replayed += 1;
    }

    stats.records_replayed.store(replayed, Ordering::Relaxed);
    debug!(
        records = replayed,
        live_keys = index.len(),
        "index log replayed"
    );
    Ok(())
}
