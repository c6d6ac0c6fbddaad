//! The write half of the container codec.

use crate::container::ParsedFile;

/// Serializes a [`ParsedFile`] back to bytes, recomputing only the
/// event-stream length field — no other field is regenerated, since legacy
/// files may carry non-canonical but valid header bytes that must survive
/// untouched.
pub fn serialize(parsed: &ParsedFile) -> Vec<u8> {
    let events_size = parsed.events_len() as u32;

    let mut out = Vec::with_capacity(14 + 8 + events_size as usize);
    out.extend_from_slice(&parsed.file_header_bytes);
    out.extend_from_slice(&parsed.event_chunk_header_bytes[0..4]); // "FLdt"
    out.extend_from_slice(&events_size.to_le_bytes());
    for event in &parsed.events {
        out.extend_from_slice(&event.framing_or_synthesize());
        out.extend_from_slice(&event.payload);
    }
    out.extend_from_slice(&parsed.trailing_bytes);
    out
}
