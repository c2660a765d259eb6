use std::collections::HashMap;

use crate::{
    error::RtmpError,
    protocol::{basic_header::ChunkType, chunk::ChunkHeader},
};

/// Previously decoded chunk headers of one connection.
///
/// A header without a message header of its own (format 3) copies every
/// field from the most recent header on the same chunk stream. That
/// lookup only succeeds once the chunk stream was opened with a format 0
/// header, since formats 1 and 2 do not carry a message stream id.
pub trait HeaderHistory {
    fn previous(&self, cs_id: u32) -> Result<&ChunkHeader, RtmpError>;

    fn record(&mut self, header: ChunkHeader);
}

/// Plain append-only list, lookups scan backwards from the newest entry.
impl HeaderHistory for Vec<ChunkHeader> {
    fn previous(&self, cs_id: u32) -> Result<&ChunkHeader, RtmpError> {
        let mut lineage = self.iter().rev().filter(|h| h.basic.cs_id == cs_id);
        let latest = lineage.next().ok_or(RtmpError::MissingHeader(cs_id))?;
        let established = latest.basic.fmt == ChunkType::Full
            || lineage.any(|h| h.basic.fmt == ChunkType::Full);
        match established {
            true => Ok(latest),
            false => Err(RtmpError::MissingHeader(cs_id)),
        }
    }

    fn record(&mut self, header: ChunkHeader) {
        self.push(header);
    }
}

#[derive(Debug, Clone)]
struct ChunkStreamContext {
    last_header: ChunkHeader,
    opened_with_full_header: bool,
}

/// Keeps only the last header per chunk stream.
#[derive(Debug, Default, Clone)]
pub struct ChunkHistory {
    context: HashMap<u32, ChunkStreamContext>,
}

impl ChunkHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.context.len()
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    pub fn clear(&mut self) {
        self.context.clear();
    }
}

impl HeaderHistory for ChunkHistory {
    fn previous(&self, cs_id: u32) -> Result<&ChunkHeader, RtmpError> {
        match self.context.get(&cs_id) {
            Some(ctx) if ctx.opened_with_full_header => Ok(&ctx.last_header),
            _ => Err(RtmpError::MissingHeader(cs_id)),
        }
    }

    fn record(&mut self, header: ChunkHeader) {
        let is_full = header.basic.fmt == ChunkType::Full;
        match self.context.get_mut(&header.basic.cs_id) {
            Some(ctx) => {
                ctx.opened_with_full_header |= is_full;
                ctx.last_header = header;
            }
            None => {
                self.context.insert(
                    header.basic.cs_id,
                    ChunkStreamContext {
                        last_header: header,
                        opened_with_full_header: is_full,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{basic_header::BasicHeader, message_header::MessageHeader};

    fn header(fmt: ChunkType, cs_id: u32, msg_len: u32) -> ChunkHeader {
        ChunkHeader::new(
            BasicHeader::new(fmt, cs_id),
            MessageHeader {
                msg_len,
                ..Default::default()
            },
        )
    }

    fn check_history(mut history: impl HeaderHistory) {
        assert!(matches!(
            history.previous(3),
            Err(RtmpError::MissingHeader(3))
        ));

        history.record(header(ChunkType::NoMessageStreamId, 3, 10));
        assert!(matches!(
            history.previous(3),
            Err(RtmpError::MissingHeader(3))
        ));

        history.record(header(ChunkType::Full, 3, 20));
        history.record(header(ChunkType::Full, 4, 30));
        history.record(header(ChunkType::TimestampOnly, 3, 40));
        assert_eq!(history.previous(3).unwrap().message.msg_len, 40);
        assert_eq!(history.previous(4).unwrap().message.msg_len, 30);
        assert!(history.previous(5).is_err());
    }

    #[test]
    fn test_vec_history() {
        check_history(Vec::<ChunkHeader>::new());
    }

    #[test]
    fn test_map_history() {
        check_history(ChunkHistory::new());
    }

    #[test]
    fn test_map_history_keeps_one_entry_per_stream() {
        let mut history = ChunkHistory::new();
        history.record(header(ChunkType::Full, 3, 1));
        history.record(header(ChunkType::NoHeader, 3, 1));
        history.record(header(ChunkType::Full, 64, 1));
        assert_eq!(history.len(), 2);
        history.clear();
        assert!(history.is_empty());
    }
}
