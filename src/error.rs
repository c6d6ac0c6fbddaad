use thiserror::Error;

/// Single error type for the whole crate.
#[derive(Error, Debug)]
pub enum FlpError {
    #[error("expected chunk magic {expected:?} at offset {offset}, found {found:?}")]
    BadMagic {
        offset: usize,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("outer file header length must be 6, found {0}")]
    BadHeaderSize(u32),

    #[error("format field {0} outside the allowed range [-1, 0x50]")]
    BadFormat(i16),

    #[error("file length {file_len} disagrees with declared event-stream length {events_size} (expected {expected})")]
    LengthMismatch {
        file_len: usize,
        events_size: u32,
        expected: usize,
    },

    #[error("event {id:#04x} at offset {offset} declares a payload extending past the event stream")]
    TruncatedEvent { id: u8, offset: usize },

    #[error("VLI starting at offset {offset} continues past its enclosing slice")]
    MalformedVli { offset: usize },

    #[error("read past end of buffer at offset {offset} (needed {needed} bytes, {remaining} remained)")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("event {id:#04x} has kind {actual:?}, which cannot be read/written as {expected}")]
    KindMismatch {
        id: u8,
        actual: crate::event_table::EventKind,
        expected: &'static str,
    },

    #[error("no event with id {0:#04x} found to patch")]
    NoSuchEvent(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Glob(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, FlpError>;
