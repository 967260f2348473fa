//! Entity metadata entries, as carried by the spawn and metadata packets
use alloc::string::String;
use alloc::vec::Vec;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SerializationError};
use crate::serialize::{
    ToBytes, ensure_capacity, ensure_remaining, read_string, string_len, write_string,
};

/// Index of the custom name of a living entity
pub const CUSTOM_NAME_INDEX: u8 = 2;
/// Index of the flag that keeps the custom name visible
pub const SHOW_NAME_INDEX: u8 = 3;
/// Index of the health of a living entity
pub const HEALTH_INDEX: u8 = 6;

/// Terminates a list of metadata entries
const END_OF_METADATA: u8 = 0x7F;

const BYTE_TYPE: u8 = 0;
const FLOAT_TYPE: u8 = 3;
const STRING_TYPE: u8 = 4;

/// A single entry of an entity's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataEntry {
    Byte { index: u8, value: u8 },
    Float { index: u8, value: f32 },
    String { index: u8, value: String },
}

impl MetadataEntry {
    pub fn index(&self) -> u8 {
        match self {
            MetadataEntry::Byte { index, .. }
            | MetadataEntry::Float { index, .. }
            | MetadataEntry::String { index, .. } => *index,
        }
    }

    fn header(&self) -> u8 {
        let kind = match self {
            MetadataEntry::Byte { .. } => BYTE_TYPE,
            MetadataEntry::Float { .. } => FLOAT_TYPE,
            MetadataEntry::String { .. } => STRING_TYPE,
        };
        (kind << 5) | (self.index() & 0x1F)
    }
}

/// Ordered list of metadata entries, closed by a terminator byte on the wire
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataList(pub Vec<MetadataEntry>);

impl MetadataList {
    /// Metadata that every overlay entity carries: its name and its health
    pub fn living(name: &str, health: f32) -> Self {
        Self(alloc::vec![
            MetadataEntry::String {
                index: CUSTOM_NAME_INDEX,
                value: String::from(name),
            },
            MetadataEntry::Float {
                index: HEALTH_INDEX,
                value: health,
            },
        ])
    }

    pub fn get(&self, index: u8) -> Option<&MetadataEntry> {
        self.0.iter().find(|entry| entry.index() == index)
    }
}

impl ToBytes for MetadataList {
    fn bytes_len(&self) -> usize {
        let entries: usize = self
            .0
            .iter()
            .map(|entry| {
                1 + match entry {
                    MetadataEntry::Byte { .. } => 1,
                    MetadataEntry::Float { .. } => 4,
                    MetadataEntry::String { value, .. } => string_len(value),
                }
            })
            .sum();
        entries + 1
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        for entry in &self.0 {
            ensure_capacity(buffer, 1)?;
            buffer.put_u8(entry.header());
            match entry {
                MetadataEntry::Byte { value, .. } => {
                    ensure_capacity(buffer, 1)?;
                    buffer.put_u8(*value);
                }
                MetadataEntry::Float { value, .. } => {
                    ensure_capacity(buffer, 4)?;
                    buffer.put_f32(*value);
                }
                MetadataEntry::String { value, .. } => write_string(buffer, value)?,
            }
        }
        ensure_capacity(buffer, 1)?;
        buffer.put_u8(END_OF_METADATA);
        Ok(())
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        let mut entries = Vec::new();
        loop {
            ensure_remaining(buffer, 1)?;
            let header = buffer.get_u8();
            if header == END_OF_METADATA {
                return Ok(Self(entries));
            }
            let index = header & 0x1F;
            let entry = match header >> 5 {
                BYTE_TYPE => {
                    ensure_remaining(buffer, 1)?;
                    MetadataEntry::Byte {
                        index,
                        value: buffer.get_u8(),
                    }
                }
                FLOAT_TYPE => {
                    ensure_remaining(buffer, 4)?;
                    MetadataEntry::Float {
                        index,
                        value: buffer.get_f32(),
                    }
                }
                STRING_TYPE => MetadataEntry::String {
                    index,
                    value: read_string(buffer)?,
                },
                _ => return Err(SerializationError::UnexpectedMetadata(header)),
            };
            entries.push(entry);
        }
    }
}
