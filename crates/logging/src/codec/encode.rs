//! crates/logging/src/codec/encode.rs
//! Rendering entries into the canonical line format.
//!
//! ```text
//! Lyymmdd hh:mm:ss.uuuuuu [tid ]file:line  message
//! ```
//!
//! Every numeric field is written by hand into the buffer's scratch region;
//! going through `format!` here costs several times more per record.

use crate::buffer::Buffer;
use crate::clock;
use crate::entry::Entry;
use crate::severity::Severity;

use super::color::{ColorProfile, RESET};

/// Appends the header for one record to `buf`.
///
/// A `thread_id` of 0 is omitted. With a colour profile the severity letter
/// and date take the severity colour, and the time, file and line are greyed
/// up to the reset before the second separator space.
pub fn format_header(
    buf: &mut Buffer,
    severity: Severity,
    time: i64,
    thread_id: u64,
    file: &str,
    line: u32,
    colors: Option<&ColorProfile>,
) {
    let now = clock::to_local(time);

    if let Some(colors) = colors {
        buf.extend_from_slice(colors.prefix(severity));
    }
    buf.push(severity.as_char());
    let mut n = buf.two_digits(0, now.year().rem_euclid(100) as u32);
    n += buf.two_digits(n, u32::from(u8::from(now.month())));
    n += buf.two_digits(n, u32::from(now.day()));
    buf.commit_scratch(n);
    if let Some(colors) = colors {
        buf.extend_from_slice(colors.time);
    }

    let mut n = buf.put_scratch(0, b' ');
    n += buf.two_digits(n, u32::from(now.hour()));
    n += buf.put_scratch(n, b':');
    n += buf.two_digits(n, u32::from(now.minute()));
    n += buf.put_scratch(n, b':');
    n += buf.two_digits(n, u32::from(now.second()));
    n += buf.put_scratch(n, b'.');
    n += buf.n_digits(6, n, now.microsecond(), b'0');
    n += buf.put_scratch(n, b' ');
    if thread_id > 0 {
        n += buf.some_digits(n, thread_id);
        n += buf.put_scratch(n, b' ');
    }
    buf.commit_scratch(n);

    buf.extend_from_slice(file.as_bytes());
    let mut n = buf.put_scratch(0, b':');
    n += buf.some_digits(n, u64::from(line));
    n += buf.put_scratch(n, b' ');
    buf.commit_scratch(n);
    if colors.is_some() {
        buf.extend_from_slice(RESET);
    }
    buf.push(b' ');
}

/// Appends the full record for `entry`: header, message, a newline when the
/// message lacks one, then any stack bytes.
pub fn encode_entry(buf: &mut Buffer, entry: &Entry, colors: Option<&ColorProfile>) {
    format_header(
        buf,
        entry.severity,
        entry.time,
        entry.thread_id,
        &entry.file,
        entry.line,
        colors,
    );
    buf.extend_from_slice(entry.message.as_bytes());
    if buf.last() != Some(b'\n') {
        buf.push(b'\n');
    }
    if let Some(stacks) = entry.stacks.as_deref().filter(|stacks| !stacks.is_empty()) {
        buf.extend_from_slice(stacks);
    }
}
