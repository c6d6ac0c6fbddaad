//! The event-stream decoder: per-event size selection, the unknown
//! DWORD-range disambiguation heuristic, its look-ahead walker, and FL-version
//! detection.

use crate::catalog;
use crate::cursor::{ByteReader, MAX_VLI_VALUE};
use crate::error::FlpError;
use crate::event::Event;
use crate::event_table::{self, EventKind};

/// Bytes the look-ahead walker may consume past a hypothesis's next-event
/// offset before giving up and scoring what it saw.
const LOOKAHEAD_WINDOW: usize = 200;

/// Margin a variable-length hypothesis must beat the fixed hypothesis by to
/// be chosen, biasing ties toward the DWORD default.
const DISAMBIGUATION_MARGIN: i32 = 2;

pub struct DecodeResult {
    pub events: Vec<Event>,
    pub detected_version: Option<String>,
    pub use_unicode: bool,
}

/// Decodes the event-stream slice `stream` (already isolated by the caller,
/// e.g. `container::read`, as `bytes[22..22+events_size]`) into an ordered
/// event sequence.
pub fn decode(stream: &[u8]) -> Result<DecodeResult, FlpError> {
    let end = stream.len();
    let mut events = Vec::new();
    let mut pos = 0usize;
    let mut detected_version: Option<String> = None;
    let mut use_unicode = false;
    let mut seen_fl_version_event = false;

    while pos < end {
        let id = stream[pos];
        let id_range = id as u16;

        let (framing_len, payload_len) = if id_range < event_table::WORD {
            (1usize, 1usize)
        } else if id_range < event_table::DWORD {
            (1usize, 2usize)
        } else if id_range < event_table::TEXT {
            if event_table::is_known_dword_range_id(id) {
                (1usize, 4usize)
            } else {
                disambiguate(stream, pos, end)?
            }
        } else {
            let (size, vli_len) = ByteReader::decode_vli_raw(stream, pos + 1)?;
            (1 + vli_len, size as usize)
        };

        let payload_start = pos + framing_len;
        let payload_end = payload_start
            .checked_add(payload_len)
            .ok_or(FlpError::TruncatedEvent { id, offset: pos })?;
        if payload_end > end {
            return Err(FlpError::TruncatedEvent { id, offset: pos });
        }

        let framing = stream[pos..payload_start].to_vec();
        let payload = stream[payload_start..payload_end].to_vec();
        let kind = event_table::kind_of(id);

        if !seen_fl_version_event && id == catalog::FL_VERSION_EVENT_ID {
            seen_fl_version_event = true;
            if let Some(version) = parse_version_payload(&payload) {
                use_unicode = version_implies_unicode(&version);
                detected_version = Some(version);
            }
        }

        events.push(Event {
            id,
            kind,
            framing,
            payload,
        });
        pos = payload_end;
    }

    Ok(DecodeResult {
        events,
        detected_version,
        use_unicode,
    })
}

/// Resolves an unknown DWORD-range id to `(framing_len, payload_len)` via the
/// two-hypothesis scoring procedure.
fn disambiguate(stream: &[u8], pos: usize, end: usize) -> Result<(usize, usize), FlpError> {
    const FIXED: (usize, usize) = (1, 4);
    let a_next = pos + 5;

    let variable = ByteReader::decode_vli_raw(stream, pos + 1)
        .ok()
        .filter(|&(size, _)| size <= MAX_VLI_VALUE)
        .and_then(|(size, vli_len)| {
            let b_next = pos.checked_add(1)?.checked_add(vli_len)?.checked_add(size as usize)?;
            if b_next > end {
                None
            } else {
                Some((size, vli_len, b_next))
            }
        });

    let (size, vli_len, b_next) = match variable {
        None => return Ok(FIXED),
        Some(v) => v,
    };

    if size == 3 {
        return Ok(FIXED);
    }

    let score_a = lookahead_score(stream, a_next, end);
    let score_b = lookahead_score(stream, b_next, end);

    if score_b > score_a + DISAMBIGUATION_MARGIN {
        Ok((1 + vli_len, size as usize))
    } else {
        Ok(FIXED)
    }
}

/// Walks forward from `start` scoring how plausible that offset is as the
/// start of the next event.
fn lookahead_score(stream: &[u8], start: usize, end: usize) -> i32 {
    let limit = end.min(start.saturating_add(LOOKAHEAD_WINDOW));
    let mut q = start;
    let mut consecutive_small = 0i32;
    let mut max_consecutive_small = 0i32;
    let mut text_data_count = 0i32;

    while q < limit {
        let id = stream[q];
        let id_range = id as u16;

        if id_range < event_table::WORD {
            if id < 32 && !event_table::is_known_dword_range_id(id) {
                consecutive_small += 1;
                max_consecutive_small = max_consecutive_small.max(consecutive_small);
            } else {
                consecutive_small = 0;
            }
            q += 2;
        } else if id_range < event_table::DWORD {
            consecutive_small = 0;
            q += 3;
        } else if id_range < event_table::TEXT {
            consecutive_small = 0;
            q += 5;
        } else {
            match ByteReader::decode_vli_raw(stream, q + 1) {
                Ok((size, vli_len)) => {
                    let payload_end = q.saturating_add(1).saturating_add(vli_len).saturating_add(size as usize);
                    if payload_end > end {
                        return -100;
                    }
                    text_data_count += 1;
                    consecutive_small = 0;
                    q = payload_end;
                }
                Err(_) => return -100,
            }
        }
    }

    10 * text_data_count - 3 * max_consecutive_small
}

/// Parses an event payload as an ASCII string with trailing NULs trimmed,
/// accepting only strings matching `^\d+(\.\d+)+$`.
fn parse_version_payload(payload: &[u8]) -> Option<String> {
    let trimmed_len = payload.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
    let bytes = &payload[..trimmed_len];
    if bytes.is_empty() || !bytes.is_ascii() {
        return None;
    }
    let s = std::str::from_utf8(bytes).ok()?;
    if matches_version_pattern(s) {
        Some(s.to_string())
    } else {
        None
    }
}

fn matches_version_pattern(s: &str) -> bool {
    let mut parts = s.split('.');
    let is_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) if is_digits(first) && is_digits(second) => {
            parts.all(is_digits)
        }
        _ => false,
    }
}

/// True iff a detected `major.minor[...]` version implies `useUnicode`.
fn version_implies_unicode(version: &str) -> bool {
    let mut parts = version.split('.');
    let major: Option<u32> = parts.next().and_then(|p| p.parse().ok());
    let minor: Option<u32> = parts.next().and_then(|p| p.parse().ok());
    match (major, minor) {
        (Some(major), Some(minor)) => major > 11 || (major == 11 && minor >= 5),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_event_scenario() {
        let stream = [0x05u8, 0x2A];
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 1);
        let e = &result.events[0];
        assert_eq!(e.id, 5);
        assert_eq!(e.kind, EventKind::U8);
        assert_eq!(e.framing, vec![5]);
        assert_eq!(e.payload, vec![0x2A]);
    }

    #[test]
    fn text_event_scenario() {
        let stream = [0xC2u8, 0x03, 0x41, 0x42, 0x43];
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 1);
        let e = &result.events[0];
        assert_eq!(e.id, 194);
        assert_eq!(e.kind, EventKind::Text);
        assert_eq!(e.framing, vec![0xC2, 0x03]);
        assert_eq!(e.payload, vec![0x41, 0x42, 0x43]);
    }

    #[test]
    fn multi_byte_vli_text_event() {
        let mut stream = vec![0xC2u8, 0xC8, 0x01];
        stream.extend(std::iter::repeat(0x58u8).take(200));
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].framing, vec![0xC2, 0xC8, 0x01]);
        assert_eq!(result.events[0].payload.len(), 200);
    }

    #[test]
    fn unknown_dword_disambiguation_favours_fixed() {
        // id=140 (0x8C) unmapped, DWORD range; 4 random bytes, then a known
        // BYTE event (id=0x0B, known single-byte volume event).
        let stream = [0x8Cu8, 0x11, 0x22, 0x33, 0x44, 0x0B, 0x7F];
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].id, 140);
        assert_eq!(result.events[0].payload, vec![0x11, 0x22, 0x33, 0x44]);
        assert_eq!(result.events[1].id, 0x0B);
    }

    #[test]
    fn unknown_dword_disambiguation_favours_variable() {
        // id=141 (0x8D) unmapped, DWORD range; VLI=8, 8 bytes of payload,
        // then a valid TEXT event reachable within the look-ahead window.
        let mut stream = vec![0x8Du8, 0x08];
        stream.extend([0x41u8; 8]);
        stream.extend([0xC2u8, 0x03, 0x61, 0x62, 0x63]);
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].id, 141);
        assert_eq!(result.events[0].framing, vec![0x8D, 0x08]);
        assert_eq!(result.events[0].payload, vec![0x41; 8]);
        assert_eq!(result.events[1].id, 194);
    }

    #[test]
    fn vli_size_of_three_always_favours_fixed() {
        // VLI decodes to 3 -> both hypotheses consume 5 bytes, rule forces A.
        let stream = [0x8Cu8, 0x03, 0x01, 0x02, 0x03];
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].payload, vec![0x03, 0x01, 0x02, 0x03]);
        assert_eq!(result.events[0].framing, vec![0x8C]);
    }

    #[test]
    fn truncated_event_fails() {
        let stream = [0xC2u8, 0x05, 0x41, 0x42]; // declares 5 payload bytes, only 2 present
        let err = decode(&stream).unwrap_err();
        assert!(matches!(err, FlpError::TruncatedEvent { id: 0xC2, offset: 0 }));
    }

    #[test]
    fn malformed_vli_fails() {
        let stream = [0xC2u8, 0x80, 0x80];
        let err = decode(&stream).unwrap_err();
        assert!(matches!(err, FlpError::MalformedVli { offset: 1 }));
    }

    #[test]
    fn version_gating_detects_unicode() {
        let mut stream = vec![0xC9u8, 0x05];
        stream.extend(b"11.5\0");
        let result = decode(&stream).unwrap();
        assert_eq!(result.detected_version.as_deref(), Some("11.5"));
        assert!(result.use_unicode);
    }

    #[test]
    fn version_gating_rejects_pre_11_5() {
        let mut stream = vec![0xC9u8, 0x05];
        stream.extend(b"11.4\0");
        let result = decode(&stream).unwrap();
        assert_eq!(result.detected_version.as_deref(), Some("11.4"));
        assert!(!result.use_unicode);
    }

    #[test]
    fn version_gating_ignores_non_matching_first_occurrence() {
        let mut stream = vec![0xC9u8, 0x03];
        stream.extend(b"xy\0");
        let result = decode(&stream).unwrap();
        assert_eq!(result.detected_version, None);
        assert!(!result.use_unicode);
    }

    #[test]
    fn version_gating_never_retries_after_a_non_matching_first_occurrence() {
        // First FL-version event doesn't match the pattern; a second one
        // later in the stream does. Only the first occurrence is ever
        // inspected, so detected_version/use_unicode must stay at defaults.
        let mut stream = vec![0xC9u8, 0x03];
        stream.extend(b"xy\0");
        stream.push(0xC9);
        stream.push(0x05);
        stream.extend(b"11.5\0");
        let result = decode(&stream).unwrap();
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.detected_version, None);
        assert!(!result.use_unicode);
    }

    #[test]
    fn empty_stream_decodes_to_no_events() {
        let result = decode(&[]).unwrap();
        assert!(result.events.is_empty());
        assert!(!result.use_unicode);
    }
}
