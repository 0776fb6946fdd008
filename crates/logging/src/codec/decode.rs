//! crates/logging/src/codec/decode.rs
//! Streaming decoder that re-segments log text into entries.
//!
//! An entry starts at a line whose prefix has the header shape
//! `L yymmdd hh:mm:ss?uuuuuu [tid ]file:line  ` (without the space after
//! `L`). It extends until the next such line or the end of the stream.
//! Lines that follow a header but do not look like one are folded into the
//! entry as its stack bytes; lines before the first header are skipped.

use std::borrow::Cow;
use std::io::BufRead;

use time::{Date, Month, PrimitiveDateTime, Time};

use crate::clock;
use crate::entry::Entry;
use crate::error::DecodeError;
use crate::severity::Severity;

/// Reads successive [`Entry`] values from a byte stream.
#[derive(Debug)]
pub struct EntryDecoder<R> {
    reader: R,
    pending: Option<Vec<u8>>,
}

impl<R: BufRead> EntryDecoder<R> {
    /// Wraps `reader`.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
        }
    }

    /// Returns the next entry, or `Ok(None)` at the end of the stream.
    ///
    /// A malformed header field yields an error; decoding may continue with
    /// the following entry on the next call.
    pub fn decode(&mut self) -> Result<Option<Entry>, DecodeError> {
        let parsed = loop {
            let line = match self.pending.take() {
                Some(line) => line,
                None => match self.read_line()? {
                    Some(line) => line,
                    None => return Ok(None),
                },
            };
            if let Some(raw) = match_header(trim_newline(&line)) {
                break raw.into_entry();
            }
        };
        let mut entry = parsed?;

        let mut stacks = Vec::new();
        while let Some(line) = self.read_line()? {
            if match_header(trim_newline(&line)).is_some() {
                self.pending = Some(line);
                break;
            }
            stacks.extend_from_slice(&line);
        }

        if !stacks.is_empty() {
            entry.stacks = Some(stacks);
        }
        Ok(Some(entry))
    }

    /// Consumes the decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>, DecodeError> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead> Iterator for EntryDecoder<R> {
    type Item = Result<Entry, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode().transpose()
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}

/// Header fields sliced out of a line that has the header shape.
#[derive(Debug)]
struct RawHeader<'a> {
    severity: Severity,
    timestamp: &'a [u8],
    thread_id: Option<&'a [u8]>,
    file: &'a [u8],
    line: &'a [u8],
    message: &'a [u8],
}

const TIMESTAMP_LEN: usize = 22;

fn match_header(line: &[u8]) -> Option<RawHeader<'_>> {
    let (&tag, rest) = line.split_first()?;
    let severity = Severity::from_char(tag)?;
    if rest.len() <= TIMESTAMP_LEN || !timestamp_shape(&rest[..TIMESTAMP_LEN]) {
        return None;
    }
    let timestamp = &rest[..TIMESTAMP_LEN];
    if rest[TIMESTAMP_LEN] != b' ' {
        return None;
    }
    let rest = &rest[TIMESTAMP_LEN + 1..];

    // A leading run of digits followed by a space is a thread id, unless
    // treating it that way leaves no valid location; then it is part of
    // the file name.
    let digits = leading_digits(rest);
    if digits > 0 && rest.get(digits) == Some(&b' ') {
        if let Some((file, line, message)) = match_location(&rest[digits + 1..]) {
            return Some(RawHeader {
                severity,
                timestamp,
                thread_id: Some(&rest[..digits]),
                file,
                line,
                message,
            });
        }
    }
    let (file, line, message) = match_location(rest)?;
    Some(RawHeader {
        severity,
        timestamp,
        thread_id: None,
        file,
        line,
        message,
    })
}

fn timestamp_shape(text: &[u8]) -> bool {
    // yymmdd hh:mm:ss.uuuuuu
    const SHAPE: &[u8; TIMESTAMP_LEN] = b"dddddd dd:dd:dd?dddddd";
    text.iter().zip(SHAPE).all(|(&byte, &want)| match want {
        b'd' => byte.is_ascii_digit(),
        b'?' => true,
        other => byte == other,
    })
}

fn leading_digits(text: &[u8]) -> usize {
    text.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

fn match_location(text: &[u8]) -> Option<(&[u8], &[u8], &[u8])> {
    let colon = memchr::memchr(b':', text)?;
    if colon == 0 {
        return None;
    }
    let after = &text[colon + 1..];
    let digits = leading_digits(after);
    if digits == 0 || !after[digits..].starts_with(b"  ") {
        return None;
    }
    Some((&text[..colon], &after[..digits], &after[digits + 2..]))
}

fn ascii_number(text: &[u8]) -> Option<u64> {
    std::str::from_utf8(text).ok()?.parse().ok()
}

impl RawHeader<'_> {
    fn into_entry(self) -> Result<Entry, DecodeError> {
        let time = parse_timestamp(self.timestamp).ok_or_else(|| DecodeError::Timestamp {
            text: String::from_utf8_lossy(self.timestamp).into_owned(),
        })?;
        let thread_id = match self.thread_id {
            Some(text) => ascii_number(text).ok_or_else(|| DecodeError::ThreadId {
                text: String::from_utf8_lossy(text).into_owned(),
            })?,
            None => 0,
        };
        let line = ascii_number(self.line)
            .and_then(|line| u32::try_from(line).ok())
            .ok_or_else(|| DecodeError::Line {
                text: String::from_utf8_lossy(self.line).into_owned(),
            })?;
        Ok(Entry {
            severity: self.severity,
            time,
            thread_id,
            file: Cow::Owned(String::from_utf8_lossy(self.file).into_owned()),
            line,
            message: String::from_utf8_lossy(self.message).into_owned(),
            stacks: None,
        })
    }
}

fn parse_timestamp(text: &[u8]) -> Option<i64> {
    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        ascii_number(text.get(range)?).and_then(|value| u32::try_from(value).ok())
    };
    if text.get(15) != Some(&b'.') {
        return None;
    }
    let yy = field(0..2)? as i32;
    let year = if yy >= 69 { 1900 + yy } else { 2000 + yy };
    let month = Month::try_from(field(2..4)? as u8).ok()?;
    let date = Date::from_calendar_date(year, month, field(4..6)? as u8).ok()?;
    let time = Time::from_hms_micro(
        field(7..9)? as u8,
        field(10..12)? as u8,
        field(13..15)? as u8,
        field(16..22)?,
    )
    .ok()?;
    let local = PrimitiveDateTime::new(date, time).assume_offset(clock::local_offset());
    i64::try_from(local.unix_timestamp_nanos()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decoder(text: &str) -> EntryDecoder<Cursor<Vec<u8>>> {
        EntryDecoder::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn decodes_fields_of_a_single_entry() {
        let mut decoder = decoder("E160507 08:09:10.123456 17 server.rs:42  disk full\n");
        let entry = decoder.decode().expect("decodes").expect("entry");
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(entry.thread_id, 17);
        assert_eq!(entry.file, "server.rs");
        assert_eq!(entry.line, 42);
        assert_eq!(entry.message, "disk full");
        assert_eq!(entry.stacks, None);
        assert_eq!(entry.time % 1_000, 0);
        assert_eq!(clock::to_local(entry.time).microsecond(), 123_456);
        assert!(decoder.decode().expect("eof").is_none());
    }

    #[test]
    fn missing_thread_id_decodes_as_zero() {
        let mut decoder = decoder("I700101 00:00:00.000001 a.rs:1  x\n");
        let entry = decoder.decode().expect("decodes").expect("entry");
        assert_eq!(entry.thread_id, 0);
        assert_eq!(clock::to_local(entry.time).year(), 1970);
    }

    #[test]
    fn two_digit_years_pivot_at_69() {
        let mut decoder = decoder("I690101 00:00:00.000000 a.rs:1  old\nI680101 00:00:00.000000 a.rs:1  new\n");
        let old = decoder.decode().expect("decodes").expect("entry");
        let new = decoder.decode().expect("decodes").expect("entry");
        assert_eq!(clock::to_local(old.time).year(), 1969);
        assert_eq!(clock::to_local(new.time).year(), 2068);
    }

    #[test]
    fn continuation_lines_become_stacks_and_leading_noise_is_skipped() {
        let text = "garbage before\n\
                    F160507 08:09:10.000000 main.rs:9  boom\n\
                    thread 'main':\n   0: frame\n\
                    I160507 08:09:11.000000 main.rs:10  after\n";
        let entries: Vec<Entry> = decoder(text)
            .collect::<Result<_, _>>()
            .expect("decodes");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "boom");
        assert_eq!(
            entries[0].stacks.as_deref(),
            Some(&b"thread 'main':\n   0: frame\n"[..])
        );
        assert_eq!(entries[1].message, "after");
        assert_eq!(entries[1].stacks, None);
    }

    #[test]
    fn digits_without_a_location_are_part_of_the_file() {
        let mut decoder = decoder("I160507 08:09:10.000000 12 34.rs:5  m\n");
        let entry = decoder.decode().expect("decodes").expect("entry");
        assert_eq!(entry.thread_id, 12);
        assert_eq!(entry.file, "34.rs");

        let mut decoder = self::decoder("I160507 08:09:10.000000 12 :5  m\n");
        let entry = decoder.decode().expect("decodes").expect("entry");
        assert_eq!(entry.thread_id, 0);
        assert_eq!(entry.file, "12 ");
    }

    #[test]
    fn invalid_fields_are_errors_not_end_of_stream() {
        let mut decoder = decoder("I161399 08:09:10.000000 a.rs:1  bad month\n");
        assert!(matches!(decoder.decode(), Err(DecodeError::Timestamp { .. })));

        let mut decoder = self::decoder("I160507 08:09:10.000000 a.rs:99999999999  m\n");
        assert!(matches!(decoder.decode(), Err(DecodeError::Line { .. })));

        let mut decoder = self::decoder("I160507 08:09:10.000000 99999999999999999999999 a.rs:1  m\n");
        assert!(matches!(decoder.decode(), Err(DecodeError::ThreadId { .. })));
    }

    #[test]
    fn empty_and_headerless_streams_end_cleanly() {
        assert!(decoder("").decode().expect("eof").is_none());
        assert!(decoder("no headers\nhere\n").decode().expect("eof").is_none());
    }
}
