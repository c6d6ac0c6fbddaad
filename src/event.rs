//! The per-event value type and the patcher's change-detection sum type.

use crate::cursor::encode_vli;
use crate::event_table::{self, EventKind};

/// An atomic unit of the event stream.
///
/// Invariant (parsed events only): `framing` followed by `payload` is a
/// contiguous byte-exact copy of this event's region in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: u8,
    pub kind: EventKind,
    pub framing: Vec<u8>,
    pub payload: Vec<u8>,
}

impl Event {
    /// Constructs a freshly-synthesized event (not originating from parsing).
    /// Such events have empty `framing`; the serializer is the single place
    /// that turns that into real bytes via [`synthesize_framing`].
    pub fn new(id: u8, payload: Vec<u8>) -> Event {
        Event {
            id,
            kind: event_table::kind_of(id),
            framing: Vec::new(),
            payload,
        }
    }

    /// The framing this event would serialize with if its current `framing`
    /// is empty: `[id]` for fixed-range events, `[id] || VLI(len)` otherwise.
    pub fn framing_or_synthesize(&self) -> Vec<u8> {
        if !self.framing.is_empty() {
            self.framing.clone()
        } else {
            synthesize_framing(self.id, self.payload.len())
        }
    }

    /// Total serialized length of this event (framing, synthesizing if empty,
    /// plus payload).
    pub fn serialized_len(&self) -> usize {
        self.framing_or_synthesize().len() + self.payload.len()
    }
}

/// Builds the canonical framing for `id`/`payload_len`: `[id]` for fixed-range
/// ids, `[id] || VLI(payload_len)` for variable-range ids.
pub fn synthesize_framing(id: u8, payload_len: usize) -> Vec<u8> {
    let mut framing = vec![id];
    if event_table::fixed_size(id) < 0 {
        framing.extend(encode_vli(payload_len as u32));
    }
    framing
}

/// What a patch transform decided to do with one event.
///
/// Modeled as a sum type rather than a reference-equality check on byte
/// vectors: `Keep` re-emits the original framing+payload verbatim; `Replace`
/// carries a new event through the re-framing rule in `patcher::reframe`.
#[derive(Debug, Clone)]
pub enum PatchAction {
    Keep,
    Replace(Event),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_has_empty_framing() {
        let e = Event::new(5, vec![0x2A]);
        assert!(e.framing.is_empty());
        assert_eq!(e.kind, EventKind::U8);
    }

    #[test]
    fn synthesize_framing_fixed_range_is_just_id() {
        assert_eq!(synthesize_framing(5, 1), vec![5]);
        assert_eq!(synthesize_framing(70, 2), vec![70]);
        assert_eq!(synthesize_framing(0x86, 4), vec![0x86]);
    }

    #[test]
    fn synthesize_framing_variable_range_includes_vli() {
        assert_eq!(synthesize_framing(194, 3), vec![194, 3]);
        assert_eq!(synthesize_framing(194, 200), vec![194, 0xC8, 0x01]);
    }

    #[test]
    fn framing_or_synthesize_prefers_original() {
        let e = Event {
            id: 194,
            kind: EventKind::Text,
            framing: vec![194, 0x83, 0x00], // non-minimal VLI for length 3
            payload: vec![0x41, 0x42, 0x43],
        };
        assert_eq!(e.framing_or_synthesize(), vec![194, 0x83, 0x00]);
        assert_eq!(e.serialized_len(), 6);
    }
}
