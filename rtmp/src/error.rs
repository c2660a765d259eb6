use thiserror::Error;

#[derive(Error, Debug)]
pub enum RtmpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid chunk stream ID: {0} (allowed range is 2-65599)")]
    InvalidChunkStreamId(u32),

    #[error("Unknown chunk header format: {0}")]
    UnknownFormat(u8),

    #[error("Missing previous chunk header for CSID {0}")]
    MissingHeader(u32),

    #[error("Message too large: {0} bytes")]
    MessageTooLarge(u32),

    #[error("Unsupported RTMP message type: {0}")]
    UnsupportedMessageType(u8),
}

impl RtmpError {
    /// True when the byte source ran out of data. Whether that is a clean
    /// end of session depends on where the read stopped, see
    /// [`crate::ChunkHeaderReader::read_header`].
    pub fn is_eof(&self) -> bool {
        matches!(self, RtmpError::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}
