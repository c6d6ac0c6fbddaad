//! `ParsedFile` and the outer two-chunk container codec's read half: the
//! 14-byte file header, the event-chunk length prefix, and the event stream
//! they bound.

use crate::cursor::ByteReader;
use crate::decoder;
use crate::error::FlpError;
use crate::event::Event;

const FILE_HEADER_LEN: usize = 14;
const EVENT_CHUNK_HEADER_LEN: usize = 8;
const HEADER_MAGIC: &[u8; 4] = b"FLhd";
const EVENT_CHUNK_MAGIC: &[u8; 4] = b"FLdt";

/// Result of decoding a whole `.flp` buffer.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// The 14-byte outer "file header" chunk, preserved verbatim.
    pub file_header_bytes: [u8; FILE_HEADER_LEN],
    /// The 8-byte inner "event chunk" prefix (magic + length), preserved
    /// verbatim for the magic; the length is recomputed on write.
    pub event_chunk_header_bytes: [u8; EVENT_CHUNK_HEADER_LEN],
    pub events: Vec<Event>,
    /// Bytes after the event stream and before end-of-file. Expected empty;
    /// retained opaquely if present.
    pub trailing_bytes: Vec<u8>,
    /// Version string parsed from the FL-version event, else `"0.0.0"`.
    pub detected_version: String,
    pub use_unicode: bool,
}

impl ParsedFile {
    /// Signed 16-bit format field from `file_header_bytes` (offset 8).
    pub fn format(&self) -> i16 {
        i16::from_le_bytes([self.file_header_bytes[8], self.file_header_bytes[9]])
    }

    /// Channel count from `file_header_bytes` (offset 10).
    pub fn channel_count(&self) -> u16 {
        u16::from_le_bytes([self.file_header_bytes[10], self.file_header_bytes[11]])
    }

    /// Pulses-per-quarter-note from `file_header_bytes` (offset 12), exposed
    /// but not interpreted by the core.
    pub fn ppq(&self) -> u16 {
        u16::from_le_bytes([self.file_header_bytes[12], self.file_header_bytes[13]])
    }

    /// Total byte length of the re-emitted event stream: every event's
    /// framing+payload plus trailing bytes. Shared by the
    /// serializer and by the length-invariant tests.
    pub fn events_len(&self) -> usize {
        self.events.iter().map(Event::serialized_len).sum::<usize>() + self.trailing_bytes.len()
    }
}

const DEFAULT_VERSION: &str = "0.0.0";

/// Reads a whole `.flp` buffer into a [`ParsedFile`].
pub fn parse(bytes: &[u8]) -> Result<ParsedFile, FlpError> {
    let mut r = ByteReader::new(bytes);

    expect_magic(&mut r, 0, HEADER_MAGIC)?;
    let header_size = r.read_u32()?;
    if header_size != 6 {
        return Err(FlpError::BadHeaderSize(header_size));
    }
    let format = r.read_i16()?;
    if !(-1..=0x50).contains(&format) {
        return Err(FlpError::BadFormat(format));
    }
    let _channel_count = r.read_u16()?;
    let _ppq = r.read_u16()?;

    expect_magic(&mut r, FILE_HEADER_LEN, EVENT_CHUNK_MAGIC)?;
    let events_size = r.read_u32()?;

    let stream_start = FILE_HEADER_LEN + EVENT_CHUNK_HEADER_LEN;
    let stream_end = stream_start
        .checked_add(events_size as usize)
        .ok_or(FlpError::LengthMismatch {
            file_len: bytes.len(),
            events_size,
            expected: usize::MAX,
        })?;
    if bytes.len() != stream_end {
        return Err(FlpError::LengthMismatch {
            file_len: bytes.len(),
            events_size,
            expected: stream_end,
        });
    }

    let stream = &bytes[stream_start..stream_end];
    let decoded = decoder::decode(stream)?;

    let mut file_header_bytes = [0u8; FILE_HEADER_LEN];
    file_header_bytes.copy_from_slice(&bytes[0..FILE_HEADER_LEN]);
    let mut event_chunk_header_bytes = [0u8; EVENT_CHUNK_HEADER_LEN];
    event_chunk_header_bytes.copy_from_slice(&bytes[FILE_HEADER_LEN..stream_start]);

    Ok(ParsedFile {
        file_header_bytes,
        event_chunk_header_bytes,
        events: decoded.events,
        trailing_bytes: Vec::new(),
        detected_version: decoded.detected_version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        use_unicode: decoded.use_unicode,
    })
}

fn expect_magic(r: &mut ByteReader, offset: usize, expected: &[u8; 4]) -> Result<(), FlpError> {
    let found = r.read_bytes(4)?;
    if &found[..] != expected {
        let mut found_arr = [0u8; 4];
        found_arr.copy_from_slice(&found);
        return Err(FlpError::BadMagic {
            offset,
            expected: *expected,
            found: found_arr,
        });
    }
    Ok(())
}
