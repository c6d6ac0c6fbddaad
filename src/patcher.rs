//! Applies a caller-supplied per-event transform, producing a new
//! [`ParsedFile`]. Never mutates an event in place — always rebuilds the
//! sequence from each transform's result.

use crate::container::ParsedFile;
use crate::cursor::encode_vli;
use crate::event::{Event, PatchAction};

/// Applies `transform` to every event in `parsed`, producing a new
/// [`ParsedFile`] with the transformed sequence.
///
/// `transform(event, index)` returns a [`PatchAction`]: `Keep` re-emits the
/// original event's framing+payload verbatim; `Replace` supplies a new event
/// whose `framing` is rebuilt according to the re-framing rule in
/// [`reframe`].
pub fn patch<F>(parsed: &ParsedFile, mut transform: F) -> ParsedFile
where
    F: FnMut(&Event, usize) -> PatchAction,
{
    let events = parsed
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| match transform(event, i) {
            PatchAction::Keep => event.clone(),
            PatchAction::Replace(replacement) => reframe(event, replacement),
        })
        .collect();

    ParsedFile {
        events,
        ..parsed.clone()
    }
}

/// Rebuilds `replacement`'s framing:
/// - id and payload both unchanged from `original` (by value, since identity
///   is already expressed by the caller choosing `PatchAction::Keep`): keep
///   `original.framing`.
/// - otherwise, if `original.framing` carried a VLI size prefix (length > 1):
///   rebuild framing as `[id] || VLI(payload.len())`. This is unconditional on
///   `original.framing.len() > 1` alone — it must NOT be re-derived from
///   `replacement.id`'s range, since an unknown DWORD-range id can have been
///   disambiguated as variable-length at parse time despite its range's own
///   default being fixed-size; `fixed_size`/`synthesize_framing` cannot see
///   that per-event disambiguation outcome.
/// - otherwise: keep `original.framing` (fixed-range events carry no size).
fn reframe(original: &Event, mut replacement: Event) -> Event {
    if replacement.id == original.id && replacement.payload == original.payload {
        replacement.framing = original.framing.clone();
        return replacement;
    }
    if original.framing.len() > 1 {
        let mut framing = vec![replacement.id];
        framing.extend(encode_vli(replacement.payload.len() as u32));
        replacement.framing = framing;
    } else {
        replacement.framing = original.framing.clone();
    }
    replacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::parse;
    use crate::event_table::EventKind;
    use crate::serializer::serialize;

    fn minimal_file() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend(b"FLhd");
        v.extend(6u32.to_le_bytes());
        v.extend(0i16.to_le_bytes());
        v.extend(1u16.to_le_bytes());
        v.extend(96u16.to_le_bytes());
        v.extend(b"FLdt");
        v.extend(0u32.to_le_bytes());
        v
    }

    fn file_with_events(stream: Vec<u8>) -> Vec<u8> {
        let mut bytes = minimal_file();
        bytes[18..22].copy_from_slice(&(stream.len() as u32).to_le_bytes());
        bytes.extend(stream);
        bytes
    }

    #[test]
    fn keep_reproduces_original_bytes_exactly() {
        let bytes = file_with_events(vec![0xC2, 0x83, 0x00, 0x41, 0x42, 0x43]);
        let parsed = parse(&bytes).unwrap();
        let patched = patch(&parsed, |_, _| PatchAction::Keep);
        assert_eq!(serialize(&patched), bytes);
    }

    #[test]
    fn replace_same_length_rebuilds_minimal_vli_framing() {
        let bytes = file_with_events(vec![0xCBu8, 0x03, b'o', b'l', b'd']);
        let parsed = parse(&bytes).unwrap();
        let patched = patch(&parsed, |event, _| {
            PatchAction::Replace(Event {
                id: event.id,
                kind: event.kind,
                framing: Vec::new(),
                payload: b"new".to_vec(),
            })
        });
        let out = serialize(&patched);
        // Same length replacement with an id that matches -> since payload
        // differs in value (even though length matches) it is not `==`
        // original so framing is rebuilt minimal, not kept verbatim.
        assert_eq!(&out[22..], &[0xCBu8, 0x03, b'n', b'e', b'w']);
    }

    #[test]
    fn replace_with_longer_payload_grows_vli() {
        let bytes = file_with_events(vec![0xCBu8, 0x03, b'o', b'l', b'd']);
        let parsed = parse(&bytes).unwrap();
        let long_payload = vec![b'x'; 200];
        let patched = patch(&parsed, |event, _| {
            PatchAction::Replace(Event {
                id: event.id,
                kind: event.kind,
                framing: Vec::new(),
                payload: long_payload.clone(),
            })
        });
        let out = serialize(&patched);
        assert_eq!(&out[22..25], &[0xCBu8, 0xC8, 0x01]);
        assert_eq!(&out[25..], long_payload.as_slice());
    }

    #[test]
    fn replace_fixed_range_event_keeps_single_byte_framing() {
        let bytes = file_with_events(vec![0x05u8, 0x2A]);
        let parsed = parse(&bytes).unwrap();
        let patched = patch(&parsed, |event, _| {
            PatchAction::Replace(Event {
                id: event.id,
                kind: event.kind,
                framing: Vec::new(),
                payload: vec![0x7F],
            })
        });
        let out = serialize(&patched);
        assert_eq!(&out[22..], &[0x05u8, 0x7F]);
    }

    #[test]
    fn other_events_survive_byte_identical_when_only_one_is_patched() {
        let bytes = file_with_events(vec![
            0x05, 0x2A, // untouched BYTE event
            0xCBu8, 0x03, b'o', b'l', b'd', // will be patched
            0x41, 0x00, // untouched WORD event
        ]);
        let parsed = parse(&bytes).unwrap();
        let patched = patch(&parsed, |event, _| {
            if event.id == 0xCB {
                PatchAction::Replace(Event {
                    id: event.id,
                    kind: event.kind,
                    framing: Vec::new(),
                    payload: b"new".to_vec(),
                })
            } else {
                PatchAction::Keep
            }
        });
        let out = serialize(&patched);
        assert_eq!(&out[22..24], &[0x05, 0x2A]);
        assert_eq!(&out[24..29], &[0xCBu8, 0x03, b'n', b'e', b'w']);
        assert_eq!(&out[29..], &[0x41, 0x00]);
    }

    #[test]
    fn kind_totality_unaffected_by_kind_enum_equality() {
        assert_ne!(EventKind::Text, EventKind::Data);
    }

    #[test]
    fn replacing_a_disambiguated_variable_dword_event_keeps_vli_framing() {
        // id=0x8D (unknown DWORD-range) disambiguated as variable-length at
        // parse time: framing is `[id, vli_len]`, longer than 1 byte. A
        // same-or-different-length replacement must still emit a VLI prefix,
        // not fall back to the range's fixed-size default (which would drop
        // the length byte and corrupt everything after it).
        let mut stream = vec![0x8Du8, 0x08];
        stream.extend([0x41u8; 8]);
        stream.extend([0xCBu8, 0x03, b'a', b'b', b'c']);
        let bytes = file_with_events(stream);
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.events[0].framing, vec![0x8D, 0x08]);

        let new_payload = vec![0x99u8; 12];
        let patched = patch(&parsed, |event, _| {
            if event.id == 0x8D {
                PatchAction::Replace(Event {
                    id: event.id,
                    kind: event.kind,
                    framing: Vec::new(),
                    payload: new_payload.clone(),
                })
            } else {
                PatchAction::Keep
            }
        });

        let out = serialize(&patched);
        assert_eq!(&out[22..24], &[0x8D, 12]);
        assert_eq!(&out[24..36], new_payload.as_slice());

        // Re-parsing must see a clean two-event stream, not a corrupted one.
        let reparsed = parse(&out).unwrap();
        assert_eq!(reparsed.events.len(), 2);
        assert_eq!(reparsed.events[1].id, 0xCB);
    }
}
