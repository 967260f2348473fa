//! Errors raised while framing overlay messages

pub type Result<T> = core::result::Result<T, SerializationError>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationError {
    #[error("buffer is too short: needed {needed} more bytes")]
    BufferTooShort { needed: usize },
    #[error("varint is longer than 5 bytes")]
    VarIntTooLong,
    #[error("unknown packet id {0:#04x}")]
    UnknownPacket(u32),
    #[error("string is not valid utf-8")]
    InvalidUtf8,
    #[error("unexpected metadata header {0:#04x}")]
    UnexpectedMetadata(u8),
}
