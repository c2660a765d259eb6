use std::io::Read;

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::error::RtmpError;

pub const MIN_CHUNK_STREAM_ID: u32 = 2;
pub const MAX_CHUNK_STREAM_ID: u32 = 65599;

// cs_id markers stored in the low 6 bits of the first byte
const TWO_BYTE_MARKER: u8 = 0;
const THREE_BYTE_MARKER: u8 = 1;
const CS_ID_MASK: u8 = 0b0011_1111;

/// Chunk header format, the 2-bit `fmt` field of the basic header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    // Type 0 - 11 bytes
    Full = 0,
    // Type 1 - 7 bytes
    NoMessageStreamId = 1,
    // Type 2 - 3 bytes
    TimestampOnly = 2,
    // Type 3 - 0 bytes
    NoHeader = 3,
}

impl ChunkType {
    /// Takes the top two bits of the first basic header byte.
    pub fn from_wire(first_byte: u8) -> Self {
        match first_byte >> 6 {
            0 => ChunkType::Full,
            1 => ChunkType::NoMessageStreamId,
            2 => ChunkType::TimestampOnly,
            _ => ChunkType::NoHeader,
        }
    }

    pub fn into_raw(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ChunkType {
    type Error = RtmpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChunkType::Full),
            1 => Ok(ChunkType::NoMessageStreamId),
            2 => Ok(ChunkType::TimestampOnly),
            3 => Ok(ChunkType::NoHeader),
            _ => Err(RtmpError::UnknownFormat(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicHeader {
    pub fmt: ChunkType,
    /// Chunk stream ID - 6, 14 or 22 bits on the wire (depends on first 6 bits)
    pub cs_id: u32,
}

impl BasicHeader {
    pub fn new(fmt: ChunkType, cs_id: u32) -> Self {
        Self { fmt, cs_id }
    }

    /// Number of bytes `encode_into` will produce for this cs_id.
    pub fn wire_len(&self) -> Result<usize, RtmpError> {
        match self.cs_id {
            MIN_CHUNK_STREAM_ID..64 => Ok(1),
            64..320 => Ok(2),
            320..=MAX_CHUNK_STREAM_ID => Ok(3),
            cs_id => Err(RtmpError::InvalidChunkStreamId(cs_id)),
        }
    }

    pub fn encode_into(&self, buf: &mut BytesMut) -> Result<(), RtmpError> {
        let fmt_bits = self.fmt.into_raw() << 6;
        match self.wire_len()? {
            //  0 1 2 3 4 5 6 7
            // +-+-+-+-+-+-+-+-+
            // |fmt|   cs id   |
            // +-+-+-+-+-+-+-+-+
            1 => buf.put_u8(fmt_bits | self.cs_id as u8),
            //  0                   1
            //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
            // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
            // |fmt|     0     |   cs id - 64  |
            // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
            2 => {
                buf.put_u8(fmt_bits | TWO_BYTE_MARKER);
                buf.put_u8((self.cs_id - 64) as u8);
            }
            //  0                   1                   2
            //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
            // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
            // |fmt|     1     |     cs id - 64 (16 bit BE)    |
            // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
            _ => {
                buf.put_u8(fmt_bits | THREE_BYTE_MARKER);
                buf.put_u16((self.cs_id - 64) as u16);
            }
        }
        Ok(())
    }

    /// Reads a basic header, returns it together with the number of bytes consumed.
    ///
    /// Running out of data is reported as `RtmpError::Io` with the source's
    /// error, regardless of which byte was missing.
    pub fn read(reader: &mut impl Read) -> Result<(Self, usize), RtmpError> {
        let mut first = [0u8; 1];
        reader.read_exact(&mut first)?;
        let first_byte = first[0];
        trace!(first_byte, "Basic header first byte");

        let fmt = ChunkType::from_wire(first_byte);
        let (cs_id, len) = match first_byte & CS_ID_MASK {
            TWO_BYTE_MARKER => {
                let mut rest = [0u8; 1];
                reader.read_exact(&mut rest)?;
                (rest[0] as u32 + 64, 2)
            }
            THREE_BYTE_MARKER => {
                let mut rest = [0u8; 2];
                reader.read_exact(&mut rest)?;
                (u16::from_be_bytes(rest) as u32 + 64, 3)
            }
            n => (n as u32, 1),
        };

        Ok((Self { fmt, cs_id }, len))
    }
}
