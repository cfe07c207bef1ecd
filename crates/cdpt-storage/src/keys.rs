//! S3 key conventions for transcripts.
//!
//! Pure string functions. Entry keys embed a zero-padded microsecond
//! timestamp so S3's lexicographic listing order is chronological order.

use cdpt_core::models::message::Role;

pub const TRANSCRIPTS_PREFIX: &str = "transcripts/";

/// Prefix holding every entry of one conversation. The id is
/// percent-encoded, so distinct ids always map to distinct prefixes and no
/// id can address another conversation's prefix.
pub fn conversation_prefix(conversation_id: &str) -> String {
    format!("{TRANSCRIPTS_PREFIX}{}/", encode_segment(conversation_id))
}

/// Keeps RFC 3986 unreserved bytes and percent-encodes everything else.
fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

pub fn transcript_entry(conversation_id: &str, timestamp: jiff::Timestamp, role: Role) -> String {
    let micros = timestamp.as_microsecond().max(0);
    format!("{}{micros:020}-{role}.json", conversation_prefix(conversation_id))
}
