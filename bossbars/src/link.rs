//! Interface between the overlays and the transport that owns the client connections
use bevy_ecs::event::Event;
use bossbars_protocol::prelude::{EntityId, OverlayMessage, Pose};
use serde::{Deserialize, Serialize};

/// Identifies a connected client.
///
/// The id does not keep the connection alive: it is only a key, and whether the client is
/// still there must be asked to the [`ClientLink`] every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub u64);

/// Lifecycle notifications emitted by the transport.
///
/// With the [`BossBarsPlugin`](crate::plugin::BossBarsPlugin), trigger them on the world.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected(ClientId),
    Disconnected(ClientId),
}

/// Capabilities that the overlays need from the transport layer.
///
/// Every method takes the client explicitly, so a single link serves all the overlays.
pub trait ClientLink {
    /// Send a message to the client. Sending is best-effort, but messages sent to the same
    /// client must be delivered in order.
    fn send(&mut self, client: ClientId, message: OverlayMessage);

    fn is_connected(&self, client: ClientId) -> bool;

    /// The position of the client's camera, or `None` if the client is gone
    fn eye_pose(&self, client: ClientId) -> Option<Pose>;

    /// Allocate an id for a new synthetic entity.
    ///
    /// The id must not collide with entities that the client already knows about.
    fn allocate_entity_id(&mut self) -> EntityId;

    /// Start routing disconnect notifications for this client to the registry
    fn watch_disconnect(&mut self, client: ClientId) {}

    /// Stop routing disconnect notifications for this client
    fn unwatch_disconnect(&mut self, client: ClientId) {}
}

/// Hands out entity ids in increasing order, wrapping around on overflow
#[derive(Debug, Clone)]
pub struct EntityIdAllocator {
    next_id: EntityId,
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::starting_at(EntityId(0))
    }
}

impl EntityIdAllocator {
    /// Allocator whose first id is `first`.
    ///
    /// Use a range that the server never uses for real entities.
    pub fn starting_at(first: EntityId) -> Self {
        Self { next_id: first }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = EntityId(self.next_id.0.wrapping_add(1));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_allocator_wraps() {
        let mut allocator = EntityIdAllocator::starting_at(EntityId(u32::MAX));
        assert_eq!(allocator.allocate(), EntityId(u32::MAX));
        assert_eq!(allocator.allocate(), EntityId(0));
        assert_eq!(allocator.allocate(), EntityId(1));
    }
}
