//! Typed accessors over the untyped [`Event`] sequence: find events by id,
//! build new ones, and convert payloads to and from ordinary Rust values
//! instead of raw byte slices.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FlpError;
use crate::event::Event;
use crate::event_table::EventKind;

/// Returns the first event with the given id, in stream order.
pub fn find_first(events: &[Event], id: u8) -> Option<&Event> {
    events.iter().find(|e| e.id == id)
}

/// Returns every event with the given id, in stream order.
pub fn find_all(events: &[Event], id: u8) -> Vec<&Event> {
    events.iter().filter(|e| e.id == id).collect()
}

/// Builds a freshly-synthesized event with no original framing; the
/// serializer assigns framing for it at write time.
pub fn create_event(id: u8, payload: Vec<u8>) -> Event {
    Event::new(id, payload)
}

/// Decodes a Text-kind event's payload as a string, honoring `use_unicode`
/// (ASCII when false, UTF-16LE when true), trimming the trailing NUL
/// terminator.
pub fn read_text(event: &Event, use_unicode: bool) -> Result<String, FlpError> {
    if event.kind != EventKind::Text && event.kind != EventKind::Data {
        return Err(FlpError::KindMismatch {
            id: event.id,
            actual: event.kind,
            expected: "Text or Data",
        });
    }
    if use_unicode {
        let code_units: Vec<u16> = event
            .payload
            .chunks_exact(2)
            .map(LittleEndian::read_u16)
            .collect();
        let trimmed = match code_units.iter().rposition(|&u| u != 0) {
            Some(last) => &code_units[..last + 1],
            None => &[],
        };
        Ok(String::from_utf16_lossy(trimmed))
    } else {
        let trimmed_len = event
            .payload
            .iter()
            .rposition(|&b| b != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        Ok(String::from_utf8_lossy(&event.payload[..trimmed_len]).into_owned())
    }
}

/// Builds a Text-kind event whose payload is `text` plus a single NUL
/// terminator, encoded per `use_unicode`.
pub fn write_text(id: u8, text: &str, use_unicode: bool) -> Event {
    let mut payload = if use_unicode {
        let mut bytes = Vec::with_capacity(text.len() * 2 + 2);
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    } else {
        text.as_bytes().to_vec()
    };
    if use_unicode {
        payload.extend_from_slice(&0u16.to_le_bytes());
    } else {
        payload.push(0);
    }
    Event::new(id, payload)
}

/// A decoded fixed-size numeric payload, tagged by the kind it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
}

/// Decodes a fixed-size numeric event's payload according to its [`EventKind`].
///
/// `kind_of` assigns a numeric kind to an id purely by its range, independent
/// of whether this particular event's payload actually has that many bytes
/// (an unknown DWORD-range id can be disambiguated variable-length at parse
/// time, yielding a payload shorter than the range's 4-byte default).
/// The payload length is therefore validated before indexing/decoding it,
/// rather than trusting `event.kind` and risking a panic on a short slice.
pub fn read_numeric(event: &Event) -> Result<Numeric, FlpError> {
    let expected_len = match event.kind {
        EventKind::U8 | EventKind::I8 => 1,
        EventKind::U16 | EventKind::I16 => 2,
        EventKind::U32 | EventKind::I32 | EventKind::F32 => 4,
        _ => {
            return Err(FlpError::KindMismatch {
                id: event.id,
                actual: event.kind,
                expected: "a numeric kind",
            })
        }
    };
    if event.payload.len() < expected_len {
        return Err(FlpError::KindMismatch {
            id: event.id,
            actual: event.kind,
            expected: "a payload long enough for its numeric kind",
        });
    }
    match event.kind {
        EventKind::U8 => Ok(Numeric::U8(event.payload[0])),
        EventKind::I8 => Ok(Numeric::I8(event.payload[0] as i8)),
        EventKind::U16 => Ok(Numeric::U16(LittleEndian::read_u16(&event.payload))),
        EventKind::I16 => Ok(Numeric::I16(LittleEndian::read_i16(&event.payload))),
        EventKind::U32 => Ok(Numeric::U32(LittleEndian::read_u32(&event.payload))),
        EventKind::I32 => Ok(Numeric::I32(LittleEndian::read_i32(&event.payload))),
        EventKind::F32 => Ok(Numeric::F32(LittleEndian::read_f32(&event.payload))),
        _ => unreachable!("kind already matched above"),
    }
}

/// Builds an event carrying `value`'s little-endian bytes as its payload,
/// with `kind` set to match `value`'s variant rather than derived from `id`'s
/// catalogue entry — the caller's chosen [`Numeric`] variant is authoritative.
pub fn write_numeric(id: u8, value: Numeric) -> Event {
    let (kind, payload) = match value {
        Numeric::U8(v) => (EventKind::U8, vec![v]),
        Numeric::I8(v) => (EventKind::I8, vec![v as u8]),
        Numeric::U16(v) => (EventKind::U16, v.to_le_bytes().to_vec()),
        Numeric::I16(v) => (EventKind::I16, v.to_le_bytes().to_vec()),
        Numeric::U32(v) => (EventKind::U32, v.to_le_bytes().to_vec()),
        Numeric::I32(v) => (EventKind::I32, v.to_le_bytes().to_vec()),
        Numeric::F32(v) => (EventKind::F32, v.to_le_bytes().to_vec()),
    };
    Event {
        id,
        kind,
        framing: Vec::new(),
        payload,
    }
}
