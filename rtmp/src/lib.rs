//! RTMP chunk header codec.
//!
//! Every RTMP chunk starts with a basic header (format + chunk stream id),
//! followed by one of four message header shapes and an optional extended
//! timestamp. Formats 1-3 omit fields, format 3 reuses the previous header
//! of the same chunk stream, so decoding needs the connection's
//! [`HeaderHistory`].

pub mod error;
mod protocol;

pub use error::RtmpError;
pub use protocol::{
    MessageType,
    basic_header::{BasicHeader, ChunkType, MAX_CHUNK_STREAM_ID, MIN_CHUNK_STREAM_ID},
    chunk::ChunkHeader,
    chunk_reader::ChunkHeaderReader,
    chunk_writer::{ChunkHeaderWriter, DEFAULT_CHUNK_SIZE},
    history::{ChunkHistory, HeaderHistory},
    message_header::{
        EXTENDED_TIMESTAMP_SENTINEL, MAX_MESSAGE_LEN, MessageHeader, RawMessageHeader,
    },
};
