use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::{
    error::RtmpError,
    protocol::{
        MessageType,
        basic_header::{BasicHeader, ChunkType},
        history::HeaderHistory,
        message_header::{EXTENDED_TIMESTAMP_SENTINEL, MessageHeader, RawMessageHeader},
    },
};

// basic header (3) + full message header (11) + extended timestamp (4)
const MAX_CHUNK_HEADER_LEN: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub basic: BasicHeader,
    pub message: MessageHeader,
    /// Present when `timestamp` or `timestamp_delta` holds the 0xFFFFFF sentinel.
    pub extended_timestamp: Option<u32>,
}

impl ChunkHeader {
    pub fn new(basic: BasicHeader, message: MessageHeader) -> Self {
        Self {
            basic,
            message,
            extended_timestamp: None,
        }
    }

    pub fn fmt(&self) -> ChunkType {
        self.basic.fmt
    }

    pub fn cs_id(&self) -> u32 {
        self.basic.cs_id
    }

    pub fn msg_type(&self) -> Result<MessageType, RtmpError> {
        MessageType::try_from(self.message.msg_type_id)
    }

    /// Absolute timestamp with the extended timestamp applied.
    pub fn effective_timestamp(&self) -> u32 {
        match self.message.timestamp {
            EXTENDED_TIMESTAMP_SENTINEL => self
                .extended_timestamp
                .unwrap_or(EXTENDED_TIMESTAMP_SENTINEL),
            timestamp => timestamp,
        }
    }

    /// Timestamp delta with the extended timestamp applied. The extension
    /// belongs to the absolute timestamp if both fields are saturated.
    pub fn effective_timestamp_delta(&self) -> u32 {
        match (self.message.timestamp, self.message.timestamp_delta) {
            (EXTENDED_TIMESTAMP_SENTINEL, delta) => delta,
            (_, EXTENDED_TIMESTAMP_SENTINEL) => self
                .extended_timestamp
                .unwrap_or(EXTENDED_TIMESTAMP_SENTINEL),
            (_, delta) => delta,
        }
    }

    /// Serializes basic header, message header and, if needed, extended
    /// timestamp. Does not consult any history.
    pub fn encode(&self) -> Result<Bytes, RtmpError> {
        let mut buf = BytesMut::with_capacity(MAX_CHUNK_HEADER_LEN);
        self.basic.encode_into(&mut buf)?;
        RawMessageHeader::from_logical(self.basic.fmt, &self.message).encode_into(&mut buf);
        if let Some(extended) = self.extended_timestamp_to_write() {
            buf.put_u32(extended);
        }
        Ok(buf.freeze())
    }

    /// Reads one chunk header. Returns the header and the number of bytes
    /// consumed; the chunk payload that follows is left in `reader`.
    ///
    /// The decoded header is not added to `history`, the caller records it
    /// once it accepts the chunk.
    pub fn decode(
        reader: &mut impl Read,
        history: &impl HeaderHistory,
    ) -> Result<(Self, usize), RtmpError> {
        let (basic, mut len) = BasicHeader::read(reader)?;

        let message = match basic.fmt {
            ChunkType::NoHeader => history.previous(basic.cs_id)?.message,
            fmt => {
                let raw = RawMessageHeader::read(fmt, reader)?;
                len += raw.wire_len();
                raw.into_logical()
            }
        };

        let extended_timestamp = if message.timestamp == EXTENDED_TIMESTAMP_SENTINEL
            || message.timestamp_delta == EXTENDED_TIMESTAMP_SENTINEL
        {
            let mut data = [0u8; 4];
            reader.read_exact(&mut data)?;
            len += 4;
            Some(u32::from_be_bytes(data))
        } else {
            None
        };

        let header = Self {
            basic,
            message,
            extended_timestamp,
        };
        debug!(
            fmt = ?header.basic.fmt,
            cs_id = header.basic.cs_id,
            timestamp = header.effective_timestamp(),
            timestamp_delta = header.effective_timestamp_delta(),
            msg_len = header.message.msg_len,
            msg_type_id = header.message.msg_type_id,
            msg_stream_id = header.message.msg_stream_id,
            header_len = len,
            "Decoded chunk header"
        );
        Ok((header, len))
    }

    fn extended_timestamp_to_write(&self) -> Option<u32> {
        let extension = |value: u32| match value {
            // re-encoding a decoded header keeps the value that came with it
            EXTENDED_TIMESTAMP_SENTINEL => self.extended_timestamp.unwrap_or(value),
            value => value,
        };
        if self.message.timestamp >= EXTENDED_TIMESTAMP_SENTINEL {
            Some(extension(self.message.timestamp))
        } else if self.message.timestamp_delta >= EXTENDED_TIMESTAMP_SENTINEL {
            Some(extension(self.message.timestamp_delta))
        } else {
            None
        }
    }
}
