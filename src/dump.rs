use std::{cmp::min, collections::HashMap, io::BufRead};

use rtmp::{ChunkHeaderReader, ChunkType, MessageType, RtmpError};
use tracing::{debug, info};

use crate::config::MAX_CHUNK_SIZE;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DumpSummary {
    pub chunks: u64,
    pub messages: u64,
    pub header_bytes: u64,
    pub payload_bytes: u64,
}

/// Per chunk stream state needed to find where each chunk payload ends.
#[derive(Debug, Default)]
struct ChunkStreamState {
    msg_len: u32,
    msg_type_id: u8,
    remaining: usize,
    // payload of a SetChunkSize message being read
    control_payload: Vec<u8>,
}

/// Walks a post-handshake RTMP byte stream chunk by chunk and logs every
/// chunk header. Payloads are skipped, except SetChunkSize messages which
/// change how the following chunks are delimited.
pub fn dump_chunks(input: impl BufRead, chunk_size: usize) -> Result<DumpSummary, RtmpError> {
    let mut reader = ChunkHeaderReader::new(input);
    let mut streams: HashMap<u32, ChunkStreamState> = HashMap::new();
    let mut chunk_size = chunk_size;
    let mut summary = DumpSummary::default();

    while let Some((header, header_len)) = reader.read_header()? {
        let state = streams.entry(header.cs_id()).or_default();

        // Type 2 and 3 headers as decoded do not carry length and type, they
        // stay those of the previous message on this chunk stream.
        match header.fmt() {
            ChunkType::Full | ChunkType::NoMessageStreamId => {
                state.msg_len = header.message.msg_len;
                state.msg_type_id = header.message.msg_type_id;
            }
            ChunkType::TimestampOnly | ChunkType::NoHeader => (),
        }

        let starts_message = header.fmt() != ChunkType::NoHeader || state.remaining == 0;
        if starts_message {
            state.remaining = state.msg_len as usize;
            state.control_payload.clear();
            summary.messages += 1;
        }

        let payload_len = min(state.remaining, chunk_size);
        state.remaining -= payload_len;

        let msg_type = MessageType::try_from(state.msg_type_id).ok();
        info!(
            fmt = ?header.fmt(),
            cs_id = header.cs_id(),
            timestamp = header.effective_timestamp(),
            timestamp_delta = header.effective_timestamp_delta(),
            msg_len = state.msg_len,
            msg_type_id = state.msg_type_id,
            ?msg_type,
            msg_stream_id = header.message.msg_stream_id,
            header_len,
            payload_len,
            "Chunk"
        );

        if msg_type == Some(MessageType::SetChunkSize) {
            let payload = reader.read_payload(payload_len)?;
            state.control_payload.extend_from_slice(&payload);
            if state.remaining == 0 {
                if let Some(size) = parse_chunk_size(&state.control_payload) {
                    debug!(old = chunk_size, new = size, "Peer changed chunk size");
                    chunk_size = size;
                }
            }
        } else {
            reader.skip_payload(payload_len)?;
        }

        summary.chunks += 1;
        summary.header_bytes += header_len as u64;
        summary.payload_bytes += payload_len as u64;
    }

    Ok(summary)
}

fn parse_chunk_size(payload: &[u8]) -> Option<usize> {
    let bytes: [u8; 4] = payload.get(0..4)?.try_into().ok()?;
    let size = (u32::from_be_bytes(bytes) & 0x7FFF_FFFF) as usize;
    (1..=MAX_CHUNK_SIZE).contains(&size).then_some(size)
}
