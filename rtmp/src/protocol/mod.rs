use crate::error::RtmpError;

pub(crate) mod basic_header;
pub(crate) mod chunk;
pub(crate) mod chunk_reader;
pub(crate) mod chunk_writer;
pub(crate) mod history;
pub(crate) mod message_header;


/// Message type id carried in type 0 and type 1 message headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    // https://rtmp.veriskope.com/docs/spec/#54-protocol-control-messages
    SetChunkSize = 1,
    AbortMessage = 2,
    Acknowledgement = 3,
    UserControl = 4,
    WindowAckSize = 5,
    SetPeerBandwidth = 6,

    Audio = 8,
    Video = 9,

    DataMessageAmf3 = 0x0F,
    SharedObjectAmf3 = 0x10,
    CommandMessageAmf3 = 0x11,
    DataMessageAmf0 = 0x12,
    SharedObjectAmf0 = 0x13,
    CommandMessageAmf0 = 0x14,

    AggregateMessage = 0x16,
}

const MESSAGE_TYPES: [MessageType; 15] = [
    MessageType::SetChunkSize,
    MessageType::AbortMessage,
    MessageType::Acknowledgement,
    MessageType::UserControl,
    MessageType::WindowAckSize,
    MessageType::SetPeerBandwidth,
    MessageType::Audio,
    MessageType::Video,
    MessageType::DataMessageAmf3,
    MessageType::SharedObjectAmf3,
    MessageType::CommandMessageAmf3,
    MessageType::DataMessageAmf0,
    MessageType::SharedObjectAmf0,
    MessageType::CommandMessageAmf0,
    MessageType::AggregateMessage,
];

impl TryFrom<u8> for MessageType {
    type Error = RtmpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MESSAGE_TYPES
            .into_iter()
            .find(|msg_type| u8::from(*msg_type) == value)
            .ok_or(RtmpError::UnsupportedMessageType(value))
    }
}

impl From<MessageType> for u8 {
    fn from(msg_type: MessageType) -> Self {
        msg_type as u8
    }
}
