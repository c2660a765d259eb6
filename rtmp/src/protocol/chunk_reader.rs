use std::io::{BufRead, Read};

use bytes::{Bytes, BytesMut};
use tracing::warn;

use crate::{
    error::RtmpError,
    protocol::{
        chunk::ChunkHeader,
        history::{ChunkHistory, HeaderHistory},
    },
};

/// Decodes consecutive chunk headers from one connection, keeping the
/// chunk stream history needed for compressed headers.
///
/// Payload bytes are not interpreted; after every header the caller reads
/// or skips the chunk payload with [`read_payload`](Self::read_payload) or
/// [`skip_payload`](Self::skip_payload).
pub struct ChunkHeaderReader<R: BufRead> {
    reader: R,
    history: ChunkHistory,
    bytes_read: u64,
}

impl<R: BufRead> ChunkHeaderReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            history: ChunkHistory::new(),
            bytes_read: 0,
        }
    }

    /// Returns `Ok(None)` if the stream ended cleanly before the next
    /// chunk. Running out of data inside a header is an error.
    pub fn read_header(&mut self) -> Result<Option<(ChunkHeader, usize)>, RtmpError> {
        if self.reader.fill_buf()?.is_empty() {
            return Ok(None);
        }

        match ChunkHeader::decode(&mut self.reader, &self.history) {
            Ok((header, len)) => {
                self.bytes_read += len as u64;
                self.history.record(header);
                Ok(Some((header, len)))
            }
            Err(err) => {
                warn!(%err, offset = self.bytes_read, "Failed to decode chunk header");
                Err(err)
            }
        }
    }

    pub fn read_payload(&mut self, len: usize) -> Result<Bytes, RtmpError> {
        let mut payload = BytesMut::zeroed(len);
        self.reader.read_exact(&mut payload)?;
        self.bytes_read += len as u64;
        Ok(payload.freeze())
    }

    pub fn skip_payload(&mut self, len: usize) -> Result<(), RtmpError> {
        let skipped = std::io::copy(
            &mut (&mut self.reader).take(len as u64),
            &mut std::io::sink(),
        )?;
        self.bytes_read += skipped;
        if skipped < len as u64 {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
        Ok(())
    }

    pub fn history(&self) -> &ChunkHistory {
        &self.history
    }

    /// Total bytes consumed so far, headers and payloads.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
