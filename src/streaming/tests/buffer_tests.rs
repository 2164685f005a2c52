//! Tests for the memory buffer.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use super::super::buffers::*;

fn filled(content_length: u64, bytes: &[u8]) -> MemoryBuffer {
    let mut buffer = MemoryBuffer::new(content_length);
    buffer.write_all(bytes).unwrap();
    buffer
}

#[test]
fn test_write_preserves_read_cursor() {
    let mut buffer = filled(8, &[1, 2, 3, 4]);
    assert_eq!(buffer.read_count(ReadCount::Bytes(2)), vec![1, 2]);

    buffer.write_all(&[5, 6, 7, 8]).unwrap();
    assert_eq!(buffer.logical_position(), 2);
    assert_eq!(buffer.available(), 6);
    assert_eq!(buffer.read_count(ReadCount::All), vec![3, 4, 5, 6, 7, 8]);
    assert!(buffer.is_complete());
}

#[test]
fn test_short_reads_are_not_errors() {
    let mut buffer = filled(100, &[1, 2, 3]);
    let mut out = [0u8; 8];
    assert_eq!(buffer.read(&mut out).unwrap(), 3);
    assert_eq!(&out[..3], &[1, 2, 3]);
    assert_eq!(buffer.read(&mut out).unwrap(), 0);
    assert!(buffer.read_count(ReadCount::Bytes(10)).is_empty());
    assert!(!buffer.is_complete());
}

#[test]
fn test_seek_start_and_current() {
    let mut buffer = filled(10, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(buffer.seek(SeekFrom::Start(4)).unwrap(), 4);
    assert_eq!(buffer.read_count(ReadCount::Bytes(1)), vec![4]);
    assert_eq!(buffer.seek(SeekFrom::Current(-3)).unwrap(), 2);
    assert_eq!(buffer.read_count(ReadCount::Bytes(1)), vec![2]);
    assert_eq!(buffer.tell(), 3);
    assert_eq!(buffer.mode(), CursorMode::Physical);
}

#[test]
fn test_seek_end_reports_declared_length() {
    let mut buffer = filled(1000, &[0; 10]);
    assert_eq!(buffer.seek(SeekFrom::End(0)).unwrap(), 1000);
    assert_eq!(buffer.mode(), CursorMode::DeclaredEnd);
    assert_eq!(buffer.tell(), 1000);
    assert!(buffer.read_count(ReadCount::All).is_empty());

    // The mode does not switch back.
    buffer.seek(SeekFrom::Start(2)).unwrap();
    assert_eq!(buffer.mode(), CursorMode::DeclaredEnd);
    assert_eq!(buffer.tell(), 2);
    assert_eq!(buffer.available(), 8);
}

#[test]
fn test_seek_end_past_declared_length_uses_written_bytes() {
    let mut buffer = filled(4, &[0; 6]);
    assert_eq!(buffer.seek(SeekFrom::End(-1)).unwrap(), 5);
}

#[test]
fn test_negative_seek_is_rejected() {
    let mut buffer = filled(4, &[0; 4]);
    let err = buffer.seek(SeekFrom::Current(-1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(buffer.logical_position(), 0);
}

#[test]
fn test_compaction_drops_consumed_bytes() {
    let mut buffer = MemoryBuffer::with_max_retained(16, 4);
    buffer.write_all(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
    assert_eq!(buffer.read_count(ReadCount::Bytes(6)).len(), 6);

    buffer.write_all(&[10]).unwrap();
    assert_eq!(buffer.bytes_discarded(), 6);
    assert_eq!(buffer.retained(), 5);
    assert_eq!(buffer.bytes_written(), 11);
    assert_eq!(buffer.logical_position(), 6);
    assert_eq!(buffer.tell(), 0);
    assert_eq!(buffer.read_count(ReadCount::All), vec![6, 7, 8, 9, 10]);
}

#[test]
fn test_no_compaction_below_threshold() {
    let mut buffer = MemoryBuffer::with_max_retained(16, 4);
    buffer.write_all(&[0; 8]).unwrap();
    buffer.read_count(ReadCount::Bytes(4));
    buffer.write_all(&[0; 8]).unwrap();
    assert_eq!(buffer.bytes_discarded(), 0);
    assert_eq!(buffer.retained(), 16);
}

#[test]
fn test_seek_uses_stream_offsets_after_compaction() {
    let mut buffer = MemoryBuffer::with_max_retained(20, 2);
    buffer.write_all(&[0, 1, 2, 3, 4, 5]).unwrap();
    buffer.read_count(ReadCount::Bytes(4));
    buffer.write_all(&[6, 7]).unwrap();
    assert_eq!(buffer.bytes_discarded(), 4);

    assert_eq!(buffer.seek(SeekFrom::Start(5)).unwrap(), 5);
    assert_eq!(buffer.read_count(ReadCount::Bytes(1)), vec![5]);

    let err = buffer.seek(SeekFrom::Start(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
