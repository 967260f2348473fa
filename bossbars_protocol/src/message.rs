//! The four packets used to draw, move and remove an overlay entity.
//!
//! Each packet is framed as a varint packet id followed by its body, using the
//! play-state ids of the 1.8 protocol.
use alloc::string::String;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityKind};
use crate::error::{Result, SerializationError};
use crate::metadata::{
    CUSTOM_NAME_INDEX, HEALTH_INDEX, MetadataEntry, MetadataList, SHOW_NAME_INDEX,
};
use crate::pose::{FIXED_POINT_SCALE, Pose, angle_byte, fixed_point_floor, scaled_angle_byte};
use crate::serialize::{ToBytes, ensure_capacity, ensure_remaining, read_varint, varint_len, write_varint};

pub const DESTROY_ENTITIES_ID: u32 = 0x13;
pub const SPAWN_LIVING_ID: u32 = 0x0F;
pub const ENTITY_METADATA_ID: u32 = 0x1C;
pub const ENTITY_TELEPORT_ID: u32 = 0x18;

/// Number of bytes taken by the three fixed-point coordinates
const POSITION_LEN: usize = 12;

fn expect_packet(buffer: &mut impl Buf, expected: u32) -> Result<()> {
    let id = read_varint(buffer)?;
    if id != expected {
        return Err(SerializationError::UnknownPacket(id));
    }
    Ok(())
}

fn read_position(buffer: &mut impl Buf) -> Result<[i32; 3]> {
    ensure_remaining(buffer, POSITION_LEN)?;
    Ok([buffer.get_i32(), buffer.get_i32(), buffer.get_i32()])
}

fn angle_degrees(byte: i8) -> f32 {
    byte as f32 * 360.0 / 256.0
}

/// Kind of an [`OverlayMessage`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Teardown,
    Spawn,
    Metadata,
    Teleport,
}

/// Removes the synthetic entity from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teardown {
    pub entity: EntityId,
}

/// Creates the synthetic entity on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub entity: EntityId,
    pub kind: EntityKind,
    /// Placement in real units. It is quantized to 1/32 of a unit on the wire.
    pub pose: Pose,
    pub display_text: String,
    /// Health of the creature, which the client renders as the fill of the bar
    pub display_value: f32,
}

/// Re-asserts the visual attributes of the entity after it was spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub entity: EntityId,
    pub display_text: String,
    pub show_name: bool,
    pub display_value: f32,
}

/// Moves the entity, with an already encoded position and orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub entity: EntityId,
    /// Fixed-point position: `unit * 32`
    pub position: [i32; 3],
    pub yaw: i8,
    pub pitch: i8,
    pub on_ground: bool,
}

impl Teleport {
    /// Teleport packet placing `entity` at `pose`
    pub fn new(entity: EntityId, pose: &Pose) -> Self {
        Self {
            entity,
            position: pose.fixed_position(),
            yaw: angle_byte(pose.yaw),
            pitch: angle_byte(pose.pitch),
            on_ground: false,
        }
    }
}

impl Metadata {
    fn entries(&self) -> MetadataList {
        let mut list = MetadataList::living(&self.display_text, self.display_value);
        list.0.insert(
            1,
            MetadataEntry::Byte {
                index: SHOW_NAME_INDEX,
                value: self.show_name as u8,
            },
        );
        list
    }
}

impl Spawn {
    fn entries(&self) -> MetadataList {
        MetadataList::living(&self.display_text, self.display_value)
    }
}

fn display_attributes(list: &MetadataList) -> (String, f32) {
    let display_text = match list.get(CUSTOM_NAME_INDEX) {
        Some(MetadataEntry::String { value, .. }) => value.clone(),
        _ => String::new(),
    };
    let display_value = match list.get(HEALTH_INDEX) {
        Some(MetadataEntry::Float { value, .. }) => *value,
        _ => 0.0,
    };
    (display_text, display_value)
}

impl ToBytes for Teardown {
    fn bytes_len(&self) -> usize {
        varint_len(DESTROY_ENTITIES_ID) + varint_len(1) + varint_len(self.entity.0)
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        write_varint(buffer, DESTROY_ENTITIES_ID)?;
        // the packet can destroy several entities, we only ever destroy one
        write_varint(buffer, 1)?;
        write_varint(buffer, self.entity.0)?;
        Ok(())
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        expect_packet(buffer, DESTROY_ENTITIES_ID)?;
        Self::read_body(buffer)
    }
}

impl Teardown {
    fn read_body(buffer: &mut impl Buf) -> Result<Self> {
        let count = read_varint(buffer)?;
        let entity = EntityId(read_varint(buffer)?);
        // extra entities are not ours, skip them
        for _ in 1..count {
            read_varint(buffer)?;
        }
        Ok(Self { entity })
    }
}

impl ToBytes for Spawn {
    fn bytes_len(&self) -> usize {
        varint_len(SPAWN_LIVING_ID)
            + varint_len(self.entity.0)
            // type
            + 1
            + POSITION_LEN
            // yaw, pitch, head
            + 3
            // velocity
            + 6
            + self.entries().bytes_len()
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        write_varint(buffer, SPAWN_LIVING_ID)?;
        write_varint(buffer, self.entity.0)?;
        ensure_capacity(buffer, 1 + POSITION_LEN + 3 + 6)?;
        buffer.put_u8(self.kind.type_id());
        buffer.put_i32(fixed_point_floor(self.pose.x));
        buffer.put_i32(fixed_point_floor(self.pose.y));
        buffer.put_i32(fixed_point_floor(self.pose.z));
        let yaw = scaled_angle_byte(self.pose.yaw);
        buffer.put_i8(yaw);
        buffer.put_i8(scaled_angle_byte(self.pose.pitch));
        // head rotation follows the body
        buffer.put_i8(yaw);
        // the entity never moves on its own
        buffer.put_i16(0);
        buffer.put_i16(0);
        buffer.put_i16(0);
        self.entries().to_bytes(buffer)
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        expect_packet(buffer, SPAWN_LIVING_ID)?;
        Self::read_body(buffer)
    }
}

impl Spawn {
    fn read_body(buffer: &mut impl Buf) -> Result<Self> {
        let entity = EntityId(read_varint(buffer)?);
        ensure_remaining(buffer, 1)?;
        let type_id = buffer.get_u8();
        let kind = EntityKind::from_type_id(type_id)
            .ok_or(SerializationError::UnexpectedMetadata(type_id))?;
        let [x, y, z] = read_position(buffer)?;
        ensure_remaining(buffer, 3 + 6)?;
        let yaw = buffer.get_i8();
        let pitch = buffer.get_i8();
        buffer.advance(1 + 6);
        let (display_text, display_value) = display_attributes(&MetadataList::from_bytes(buffer)?);
        Ok(Self {
            entity,
            kind,
            pose: Pose::new(
                x as f64 / FIXED_POINT_SCALE,
                y as f64 / FIXED_POINT_SCALE,
                z as f64 / FIXED_POINT_SCALE,
                angle_degrees(yaw),
                angle_degrees(pitch),
            ),
            display_text,
            display_value,
        })
    }
}

impl ToBytes for Metadata {
    fn bytes_len(&self) -> usize {
        varint_len(ENTITY_METADATA_ID) + varint_len(self.entity.0) + self.entries().bytes_len()
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        write_varint(buffer, ENTITY_METADATA_ID)?;
        write_varint(buffer, self.entity.0)?;
        self.entries().to_bytes(buffer)
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        expect_packet(buffer, ENTITY_METADATA_ID)?;
        Self::read_body(buffer)
    }
}

impl Metadata {
    fn read_body(buffer: &mut impl Buf) -> Result<Self> {
        let entity = EntityId(read_varint(buffer)?);
        let list = MetadataList::from_bytes(buffer)?;
        let show_name = matches!(
            list.get(SHOW_NAME_INDEX),
            Some(MetadataEntry::Byte { value, .. }) if *value != 0
        );
        let (display_text, display_value) = display_attributes(&list);
        Ok(Self {
            entity,
            display_text,
            show_name,
            display_value,
        })
    }
}

impl ToBytes for Teleport {
    fn bytes_len(&self) -> usize {
        varint_len(ENTITY_TELEPORT_ID) + varint_len(self.entity.0) + POSITION_LEN + 3
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        write_varint(buffer, ENTITY_TELEPORT_ID)?;
        write_varint(buffer, self.entity.0)?;
        ensure_capacity(buffer, POSITION_LEN + 3)?;
        for coordinate in self.position {
            buffer.put_i32(coordinate);
        }
        buffer.put_i8(self.yaw);
        buffer.put_i8(self.pitch);
        buffer.put_u8(self.on_ground as u8);
        Ok(())
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        expect_packet(buffer, ENTITY_TELEPORT_ID)?;
        Self::read_body(buffer)
    }
}

impl Teleport {
    fn read_body(buffer: &mut impl Buf) -> Result<Self> {
        let entity = EntityId(read_varint(buffer)?);
        let position = read_position(buffer)?;
        ensure_remaining(buffer, 3)?;
        Ok(Self {
            entity,
            position,
            yaw: buffer.get_i8(),
            pitch: buffer.get_i8(),
            on_ground: buffer.get_u8() != 0,
        })
    }
}

/// Any message sent to a client to manage its overlay entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayMessage {
    Teardown(Teardown),
    Spawn(Spawn),
    Metadata(Metadata),
    Teleport(Teleport),
}

impl OverlayMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            OverlayMessage::Teardown(_) => MessageKind::Teardown,
            OverlayMessage::Spawn(_) => MessageKind::Spawn,
            OverlayMessage::Metadata(_) => MessageKind::Metadata,
            OverlayMessage::Teleport(_) => MessageKind::Teleport,
        }
    }

    /// The synthetic entity targeted by this message
    pub fn entity(&self) -> EntityId {
        match self {
            OverlayMessage::Teardown(m) => m.entity,
            OverlayMessage::Spawn(m) => m.entity,
            OverlayMessage::Metadata(m) => m.entity,
            OverlayMessage::Teleport(m) => m.entity,
        }
    }
}

impl From<Teardown> for OverlayMessage {
    fn from(value: Teardown) -> Self {
        Self::Teardown(value)
    }
}

impl From<Spawn> for OverlayMessage {
    fn from(value: Spawn) -> Self {
        Self::Spawn(value)
    }
}

impl From<Metadata> for OverlayMessage {
    fn from(value: Metadata) -> Self {
        Self::Metadata(value)
    }
}

impl From<Teleport> for OverlayMessage {
    fn from(value: Teleport) -> Self {
        Self::Teleport(value)
    }
}

impl ToBytes for OverlayMessage {
    fn bytes_len(&self) -> usize {
        match self {
            OverlayMessage::Teardown(m) => m.bytes_len(),
            OverlayMessage::Spawn(m) => m.bytes_len(),
            OverlayMessage::Metadata(m) => m.bytes_len(),
            OverlayMessage::Teleport(m) => m.bytes_len(),
        }
    }

    fn to_bytes(&self, buffer: &mut impl BufMut) -> Result<()> {
        match self {
            OverlayMessage::Teardown(m) => m.to_bytes(buffer),
            OverlayMessage::Spawn(m) => m.to_bytes(buffer),
            OverlayMessage::Metadata(m) => m.to_bytes(buffer),
            OverlayMessage::Teleport(m) => m.to_bytes(buffer),
        }
    }

    fn from_bytes(buffer: &mut impl Buf) -> Result<Self> {
        match read_varint(buffer)? {
            DESTROY_ENTITIES_ID => Teardown::read_body(buffer).map(Self::Teardown),
            SPAWN_LIVING_ID => Spawn::read_body(buffer).map(Self::Spawn),
            ENTITY_METADATA_ID => Metadata::read_body(buffer).map(Self::Metadata),
            ENTITY_TELEPORT_ID => Teleport::read_body(buffer).map(Self::Teleport),
            id => Err(SerializationError::UnknownPacket(id)),
        }
    }
}
