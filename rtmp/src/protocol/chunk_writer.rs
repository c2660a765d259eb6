use std::{cmp::min, io::Write};

use crate::{
    error::RtmpError,
    protocol::{
        basic_header::{BasicHeader, ChunkType},
        chunk::ChunkHeader,
        message_header::{MAX_MESSAGE_LEN, MessageHeader},
    },
};

pub const DEFAULT_CHUNK_SIZE: usize = 128;

pub struct ChunkHeaderWriter<W: Write> {
    stream: W,
    chunk_size: usize,
}

impl<W: Write> ChunkHeaderWriter<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Writes a single chunk header. Returns the number of bytes written.
    pub fn write_header(&mut self, header: &ChunkHeader) -> Result<usize, RtmpError> {
        let bytes = header.encode()?;
        self.stream.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Splits `payload` into chunks: type 0 header first, type 3 headers
    /// on continuation chunks. `msg_len` is taken from the payload, which
    /// has to fit the 24-bit length field.
    pub fn write_message(
        &mut self,
        cs_id: u32,
        message: &MessageHeader,
        payload: &[u8],
    ) -> Result<(), RtmpError> {
        let msg_len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        if msg_len > MAX_MESSAGE_LEN {
            return Err(RtmpError::MessageTooLarge(msg_len));
        }
        let message = MessageHeader {
            msg_len,
            ..*message
        };
        let first = ChunkHeader::new(BasicHeader::new(ChunkType::Full, cs_id), message);
        let continuation = ChunkHeader::new(BasicHeader::new(ChunkType::NoHeader, cs_id), message);

        let mut offset = 0;
        loop {
            let chunk_len = min(self.chunk_size, payload.len() - offset);
            match offset {
                0 => self.write_header(&first)?,
                _ => self.write_header(&continuation)?,
            };
            self.stream.write_all(&payload[offset..offset + chunk_len])?;
            offset += chunk_len;

            if offset >= payload.len() {
                break;
            }
        }

        self.stream.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}
