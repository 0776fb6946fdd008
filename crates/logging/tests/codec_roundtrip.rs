//! Integration tests for the entry line format.
//!
//! Entries encoded with [`encode_entry`] must decode back to the same
//! severity, timestamp (to the microsecond), thread id, location and message.

use std::borrow::Cow;
use std::io::Cursor;

use logging::{Buffer, Entry, EntryDecoder, Severity, encode_entry};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn entry() -> impl Strategy<Value = Entry> {
    (
        severity(),
        0i64..3_000_000_000_000_000,
        prop_oneof![Just(0u64), 1u64..1_000_000],
        "[a-z_]{1,12}\\.rs",
        any::<u32>(),
        "[ -~]{0,60}",
    )
        .prop_map(|(severity, micros, thread_id, file, line, message)| Entry {
            severity,
            time: micros * 1_000,
            thread_id,
            file: Cow::Owned(file),
            line,
            message,
            stacks: None,
        })
}

fn encode_all(entries: &[Entry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = Buffer::new();
    for entry in entries {
        buf.clear();
        encode_entry(&mut buf, entry, None);
        out.extend_from_slice(buf.as_bytes());
    }
    out
}

fn decode_all(bytes: Vec<u8>) -> Vec<Entry> {
    EntryDecoder::new(Cursor::new(bytes))
        .collect::<Result<Vec<_>, _>>()
        .expect("decodes")
}

proptest! {
    /// Verifies a sequence of entries survives an encode/decode cycle.
    #[test]
    fn entries_survive_round_trip(entries in prop::collection::vec(entry(), 1..8)) {
        let decoded = decode_all(encode_all(&entries));
        prop_assert_eq!(decoded, entries);
    }
}

/// Verifies stack bytes after an entry come back as that entry's stacks.
#[test]
fn stacks_fold_into_preceding_entry() {
    let first = Entry {
        severity: Severity::Fatal,
        time: 1_462_608_550_123_456_000,
        thread_id: 3,
        file: Cow::Borrowed("main.rs"),
        line: 12,
        message: "giving up".to_owned(),
        stacks: Some(b"thread 'main' [3]:\n   0: main\n".to_vec()),
    };
    let second = Entry {
        severity: Severity::Info,
        stacks: None,
        message: "after".to_owned(),
        ..first.clone()
    };

    let decoded = decode_all(encode_all(&[first.clone(), second.clone()]));
    assert_eq!(decoded, vec![first, second]);
}

/// Verifies lines before the first header are skipped.
#[test]
fn leading_noise_is_skipped() {
    let mut bytes = b"random preface\nmore noise\n".to_vec();
    bytes.extend(encode_all(&[Entry {
        severity: Severity::Warning,
        time: 0,
        thread_id: 0,
        file: Cow::Borrowed("x.rs"),
        line: 1,
        message: "first".to_owned(),
        stacks: None,
    }]));

    let decoded = decode_all(bytes);
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].message, "first");
    assert_eq!(decoded[0].thread_id, 0);
}

/// Verifies an empty stream ends without an error.
#[test]
fn empty_stream_is_end_of_stream() {
    let mut decoder = EntryDecoder::new(Cursor::new(Vec::new()));
    assert!(decoder.decode().expect("no error").is_none());
}
