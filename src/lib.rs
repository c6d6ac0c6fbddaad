//! Reads, minimally mutates, and rewrites FL Studio project files while
//! preserving every byte it does not understand.
//!
//! The programmatic surface is re-exported at the crate root:
//! [`parse`], [`serialize`], [`patch`], plus the typed accessors in
//! [`accessors`]. Everything else is exposed for callers who want to work
//! with the lower-level event representation directly.

pub mod accessors;
pub mod binutils;
pub mod catalog;
pub mod container;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod event;
pub mod event_table;
pub mod patcher;
pub mod serializer;

pub use accessors::{
    create_event, find_all, find_first, read_numeric, read_text, write_numeric, write_text,
    Numeric,
};
pub use container::{parse, ParsedFile};
pub use error::{FlpError, Result};
pub use event::{Event, PatchAction};
pub use event_table::EventKind;
pub use patcher::patch;
pub use serializer::serialize;
