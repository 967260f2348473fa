/*! # Bossbars Protocol

Wire messages used to draw a boss bar on a single client.

The bar is drawn by a creature that only exists on the client: the server spawns it with
[`Spawn`](message::Spawn), keeps it in front of the camera with [`Teleport`](message::Teleport)
and removes it with [`Teardown`](message::Teardown).
*/
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod entity;
pub mod error;
pub mod message;
pub mod metadata;
pub mod pose;
pub mod serialize;

pub use error::{Result, SerializationError};
pub use serialize::ToBytes;

pub mod prelude {
    pub use crate::entity::{EntityId, EntityKind};
    pub use crate::error::SerializationError;
    pub use crate::message::{Metadata, MessageKind, OverlayMessage, Spawn, Teardown, Teleport};
    pub use crate::pose::Pose;
    pub use crate::serialize::ToBytes;
}
