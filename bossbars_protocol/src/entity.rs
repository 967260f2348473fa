//! Identifiers of the client-side entities used to draw a bar
use core::fmt::Formatter;
use serde::{Deserialize, Serialize};

/// Identifier of a synthetic entity.
///
/// The id is only meaningful for the session of the client that received the spawn packet;
/// the server world never contains an entity with this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

/// Kind of creature spawned to draw the bar.
///
/// Only creatures that the client renders with a boss bar are useful here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    Wither,
    EnderDragon,
}

impl EntityKind {
    /// Mob type id used in the spawn packet
    pub const fn type_id(&self) -> u8 {
        match self {
            EntityKind::Wither => 64,
            EntityKind::EnderDragon => 63,
        }
    }

    pub const fn from_type_id(type_id: u8) -> Option<Self> {
        match type_id {
            64 => Some(EntityKind::Wither),
            63 => Some(EntityKind::EnderDragon),
            _ => None,
        }
    }
}
