//! Low-level helpers to write the overlay packets into a byte buffer
use alloc::string::String;
use alloc::vec;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SerializationError};

/// Types that can be framed into the binary layout expected by the client.
pub trait ToBytes {
    /// Number of bytes written by [`ToBytes::to_bytes`]
    fn bytes_len(&self) -> usize;

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()>;

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self>
    where
        Self: Sized;

    /// Serialize into a freshly allocated frame
    fn to_frame(&self) -> Result<Bytes> {
        let mut buffer = BytesMut::with_capacity(self.bytes_len());
        self.to_bytes(&mut buffer)?;
        Ok(buffer.freeze())
    }
}

/// Maximum number of bytes used by a 32-bit varint
pub const MAX_VARINT_LEN: usize = 5;

/// Returns how many bytes it would take to encode `value` as a varint.
///
/// The varint stores 7 bits per byte, starting from the least significant bits.
pub const fn varint_len(value: u32) -> usize {
    if value < (1 << 7) {
        1
    } else if value < (1 << 14) {
        2
    } else if value < (1 << 21) {
        3
    } else if value < (1 << 28) {
        4
    } else {
        5
    }
}

pub(crate) fn ensure_capacity(buffer: &impl BufMut, len: usize) -> Result<()> {
    let available = buffer.remaining_mut();
    if available < len {
        return Err(SerializationError::BufferTooShort {
            needed: len - available,
        });
    }
    Ok(())
}

pub(crate) fn ensure_remaining(buffer: &impl Buf, len: usize) -> Result<()> {
    let available = buffer.remaining();
    if available < len {
        return Err(SerializationError::BufferTooShort {
            needed: len - available,
        });
    }
    Ok(())
}

pub(crate) fn write_varint(buffer: &mut impl BufMut, mut value: u32) -> Result<()> {
    ensure_capacity(buffer, varint_len(value))?;
    loop {
        if value & !0x7F == 0 {
            buffer.put_u8(value as u8);
            return Ok(());
        }
        buffer.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
}

pub(crate) fn read_varint(buffer: &mut impl Buf) -> Result<u32> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_LEN {
        ensure_remaining(buffer, 1)?;
        let byte = buffer.get_u8();
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(SerializationError::VarIntTooLong)
}

pub(crate) fn string_len(value: &str) -> usize {
    varint_len(value.len() as u32) + value.len()
}

pub(crate) fn write_string(buffer: &mut impl BufMut, value: &str) -> Result<()> {
    write_varint(buffer, value.len() as u32)?;
    ensure_capacity(buffer, value.len())?;
    buffer.put_slice(value.as_bytes());
    Ok(())
}

pub(crate) fn read_string(buffer: &mut impl Buf) -> Result<String> {
    let len = read_varint(buffer)? as usize;
    ensure_remaining(buffer, len)?;
    let mut raw = vec![0; len];
    buffer.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(|_| SerializationError::InvalidUtf8)
}
