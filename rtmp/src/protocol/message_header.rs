use std::io::Read;

use bytes::{BufMut, BytesMut};

use crate::protocol::basic_header::ChunkType;

/// Largest value a 24-bit field can hold. Seeing it in a timestamp field
/// means the real value follows as a 4-byte extended timestamp.
pub const EXTENDED_TIMESTAMP_SENTINEL: u32 = 0xFFFFFF;

/// Longest message the 3-byte length field can describe.
pub const MAX_MESSAGE_LEN: u32 = 0xFFFFFF;

/// Message header with every field populated, regardless of the chunk
/// format it was read from or will be written as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub timestamp: u32,
    pub timestamp_delta: u32,
    pub msg_len: u32,
    pub msg_type_id: u8,
    pub msg_stream_id: u32,
}

/// Message header as it is laid out on the wire for each chunk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMessageHeader {
    // Type 0 - 11 bytes
    Full {
        // 3 bytes
        timestamp: u32,
        // 3 bytes
        msg_len: u32,
        // 1 byte
        msg_type_id: u8,
        // 4 bytes, little endian
        msg_stream_id: u32,
    },
    // Type 1 - 7 bytes
    NoMessageStreamId {
        // 3 bytes
        timestamp_delta: u32,
        // 3 bytes
        msg_len: u32,
        // 1 byte
        msg_type_id: u8,
    },
    // Type 2 - 3 bytes
    TimestampOnly {
        // 3 bytes
        timestamp_delta: u32,
    },
    // Type 3 - 0 bytes
    NoHeader,
}

impl RawMessageHeader {
    /// Picks the fields `fmt` carries. 24-bit fields are clamped to
    /// [`EXTENDED_TIMESTAMP_SENTINEL`].
    pub fn from_logical(fmt: ChunkType, header: &MessageHeader) -> Self {
        let timestamp = header.timestamp.min(EXTENDED_TIMESTAMP_SENTINEL);
        let timestamp_delta = header.timestamp_delta.min(EXTENDED_TIMESTAMP_SENTINEL);
        let msg_len = header.msg_len.min(EXTENDED_TIMESTAMP_SENTINEL);

        match fmt {
            ChunkType::Full => RawMessageHeader::Full {
                timestamp,
                msg_len,
                msg_type_id: header.msg_type_id,
                msg_stream_id: header.msg_stream_id,
            },
            ChunkType::NoMessageStreamId => RawMessageHeader::NoMessageStreamId {
                timestamp_delta,
                msg_len,
                msg_type_id: header.msg_type_id,
            },
            ChunkType::TimestampOnly => RawMessageHeader::TimestampOnly { timestamp_delta },
            ChunkType::NoHeader => RawMessageHeader::NoHeader,
        }
    }

    pub fn wire_len(&self) -> usize {
        match self {
            RawMessageHeader::Full { .. } => 11,
            RawMessageHeader::NoMessageStreamId { .. } => 7,
            RawMessageHeader::TimestampOnly { .. } => 3,
            RawMessageHeader::NoHeader => 0,
        }
    }

    pub fn encode_into(&self, buf: &mut BytesMut) {
        match *self {
            RawMessageHeader::Full {
                timestamp,
                msg_len,
                msg_type_id,
                msg_stream_id,
            } => {
                // [timestamp(3)] [msg_len(3)] [msg_type_id(1)] [msg_stream_id(4 LE)]
                put_u24(buf, timestamp);
                put_u24(buf, msg_len);
                buf.put_u8(msg_type_id);
                buf.put_u32_le(msg_stream_id);
            }
            RawMessageHeader::NoMessageStreamId {
                timestamp_delta,
                msg_len,
                msg_type_id,
            } => {
                // [timestamp_delta(3)] [msg_len(3)] [msg_type_id(1)]
                put_u24(buf, timestamp_delta);
                put_u24(buf, msg_len);
                buf.put_u8(msg_type_id);
            }
            RawMessageHeader::TimestampOnly { timestamp_delta } => {
                put_u24(buf, timestamp_delta);
            }
            RawMessageHeader::NoHeader => (),
        }
    }

    /// Reads the explicit part of a message header. `NoHeader` consumes
    /// nothing, its fields have to be looked up in the chunk stream history.
    pub fn read(fmt: ChunkType, reader: &mut impl Read) -> std::io::Result<Self> {
        let header = match fmt {
            ChunkType::Full => {
                let mut data = [0u8; 11];
                reader.read_exact(&mut data)?;
                RawMessageHeader::Full {
                    timestamp: read_u24(&data[0..3]),
                    msg_len: read_u24(&data[3..6]),
                    msg_type_id: data[6],
                    msg_stream_id: u32::from_le_bytes([data[7], data[8], data[9], data[10]]),
                }
            }
            ChunkType::NoMessageStreamId => {
                let mut data = [0u8; 7];
                reader.read_exact(&mut data)?;
                RawMessageHeader::NoMessageStreamId {
                    timestamp_delta: read_u24(&data[0..3]),
                    msg_len: read_u24(&data[3..6]),
                    msg_type_id: data[6],
                }
            }
            ChunkType::TimestampOnly => {
                let mut data = [0u8; 3];
                reader.read_exact(&mut data)?;
                RawMessageHeader::TimestampOnly {
                    timestamp_delta: read_u24(&data),
                }
            }
            ChunkType::NoHeader => RawMessageHeader::NoHeader,
        };
        Ok(header)
    }

    /// Fields the format does not carry are left at zero.
    pub fn into_logical(self) -> MessageHeader {
        match self {
            RawMessageHeader::Full {
                timestamp,
                msg_len,
                msg_type_id,
                msg_stream_id,
            } => MessageHeader {
                timestamp,
                msg_len,
                msg_type_id,
                msg_stream_id,
                ..Default::default()
            },
            RawMessageHeader::NoMessageStreamId {
                timestamp_delta,
                msg_len,
                msg_type_id,
            } => MessageHeader {
                timestamp_delta,
                msg_len,
                msg_type_id,
                ..Default::default()
            },
            RawMessageHeader::TimestampOnly { timestamp_delta } => MessageHeader {
                timestamp_delta,
                ..Default::default()
            },
            RawMessageHeader::NoHeader => MessageHeader::default(),
        }
    }
}

/// Zero-extends exactly 3 big endian bytes.
pub(crate) fn read_u24(s: &[u8]) -> u32 {
    u32::from_be_bytes([0, s[0], s[1], s[2]])
}

/// Writes the low 3 bytes of `val` big endian. Callers clamp first.
pub(crate) fn put_u24(buf: &mut BytesMut, val: u32) {
    buf.put_slice(&val.to_be_bytes()[1..4]);
}
