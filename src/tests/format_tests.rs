use crate::storage::format::{encode_record, parse_record, record_size, LogOp};

#[test]
fn test_record_roundtrip() {
    let rec = encode_record(LogOp::Put, 128, 34, 1_700_000_000, b"user:1");
    assert_eq!(rec.len(), record_size(6));

    let parsed = parse_record(&rec).unwrap();
    assert_eq!(parsed.op, LogOp::Put);
    assert_eq!(parsed.value_offset, 128);
    assert_eq!(parsed.value_size, 34);
    assert_eq!(parsed.timestamp, 1_700_000_000);
    assert_eq!(parsed.key, b"user:1".to_vec());
    assert_eq!(parsed.encoded_len(), rec.len());
}

#[test]
fn test_delete_record_roundtrip() {
    let rec = encode_record(LogOp::Delete, 0, 0, 42, b"gone");
    let parsed = parse_record(&rec).unwrap();
    assert_eq!(parsed.op, LogOp::Delete);
    assert_eq!(parsed.value_offset, 0);
    assert_eq!(parsed.value_size, 0);
}

#[test]
fn test_record_fields_are_big_endian() {
    let rec = encode_record(LogOp::Put, 0x0102_0304, 0x0A0B_0C0D, 0x1111_2222, b"k");
    assert_eq!(rec[0], 0); // format version
    assert_eq!(rec[1], 0); // put
    assert_eq!(&rec[2..6], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(&rec[6..10], &[0x0A, 0x0B, 0x0C, 0x0D]);
    assert_eq!(&rec[10..14], &[0x11, 0x11, 0x22, 0x22]);
    assert_eq!(&rec[14..16], &[0x00, 0x01]); // key size
    assert_eq!(&rec[16..], b"k");
}

#[test]
fn test_truncated_record_rejected() {
    let rec = encode_record(LogOp::Delete, 0, 0, 0, b"some_key");
    assert!(parse_record(&rec[..10]).is_none());
    assert!(parse_record(&rec[..rec.len() - 1]).is_none());
    assert!(parse_record(&[]).is_none());
}

#[test]
fn test_unknown_op_rejected() {
    let mut rec = encode_record(LogOp::Put, 0, 0, 0, b"k");
    rec[1] = 7;
    assert!(parse_record(&rec).is_none());
}

#[test]
fn test_empty_key_record() {
    let rec = encode_record(LogOp::Put, 5, 5, 0, b"");
    assert_eq!(rec.len(), record_size(0));
    let parsed = parse_record(&rec).unwrap();
    assert!(parsed.key.is_empty());
}
