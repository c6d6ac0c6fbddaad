//! A static catalogue of explicitly-known event IDs.
//!
//! FL Studio's real event catalogue is large and maintained outside this
//! crate; this module holds a representative subset, populated thinly enough
//! to exercise the decoder and its disambiguation heuristic, and kept
//! separate from `decoder.rs` so a fuller catalogue can be swapped in without
//! touching the algorithm.

use phf::phf_ordered_map;

use crate::event_table::EventKind;

/// The "FL version" event: the decoder watches for this id's payload to
/// determine `detectedVersion`/`useUnicode`.
pub const FL_VERSION_EVENT_ID: u8 = 0xC9;

/// The three DATA-range ids that represent names in recent versions and are
/// therefore mapped to `Text` rather than the range's default `Data`.
pub const DATA_RANGE_TEXT_IDS: [u8; 3] = [0xE4, 0xE5, 0xE6];

/// The "plugin data" event carrying an embedded, plugin-specific sub-format.
/// Not parsed further by this crate.
pub const PLUGIN_DATA_EVENT_ID: u8 = 0xFF;

pub static CATALOG: phf::OrderedMap<u8, EventKind> = phf_ordered_map! {
    0x00u8 => EventKind::U8,  // channel type
    0x01u8 => EventKind::U8,  // new channel
    0x02u8 => EventKind::U8,  // channel enabled
    0x0Bu8 => EventKind::U8,  // channel volume
    0x15u8 => EventKind::U8,  // shuffle amount

    0x40u8 => EventKind::U16, // new channel (word form)
    0x41u8 => EventKind::U16, // channel volume (word form)
    0x42u8 => EventKind::I16, // channel pan
    0x50u8 => EventKind::U16, // note range
    0x5Fu8 => EventKind::U16, // piano roll scroll position

    0x80u8 => EventKind::U32, // plugin color
    0x81u8 => EventKind::U32, // playlist item
    0x83u8 => EventKind::U32, // envelope/LFO parameters
    0x86u8 => EventKind::U32, // new plugin slot
    0x89u8 => EventKind::U32, // arrangement color
    0x8Fu8 => EventKind::F32, // tempo

    0xC0u8 => EventKind::Text, // default note name
    0xC2u8 => EventKind::Text, // channel name
    0xC9u8 => EventKind::Text, // FL version string (FL_VERSION_EVENT_ID)
    0xCBu8 => EventKind::Text, // project title

    0xE0u8 => EventKind::Data, // playlist events
    0xE1u8 => EventKind::Data, // automation data
    0xE4u8 => EventKind::Text, // arrangement name (DATA_RANGE_TEXT_IDS)
    0xE5u8 => EventKind::Text, // track name (DATA_RANGE_TEXT_IDS)
    0xE6u8 => EventKind::Text, // insert name (DATA_RANGE_TEXT_IDS)
    0xFFu8 => EventKind::Data, // plugin data (PLUGIN_DATA_EVENT_ID)
};
