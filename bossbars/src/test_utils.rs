//! In-memory collaborators to exercise overlays and registries without a transport
use alloc::vec::Vec;
use bossbars_protocol::prelude::{EntityId, MessageKind, OverlayMessage, Pose};
use core::time::Duration;
use hashbrown::{HashMap, HashSet};

use crate::link::{ClientId, ClientLink, EntityIdAllocator};
use crate::scheduler::{Scheduler, TaskHandle};

/// Entity ids handed out by [`MockLink`] start here, far from the ids of real entities
pub const MOCK_FIRST_ENTITY_ID: EntityId = EntityId(10_000);

/// [`ClientLink`] that records every message sent
#[derive(Debug)]
pub struct MockLink {
    connected: HashSet<ClientId>,
    eyes: HashMap<ClientId, Pose>,
    watched: HashSet<ClientId>,
    entities: EntityIdAllocator,
    pub sent: Vec<(ClientId, OverlayMessage)>,
}

impl Default for MockLink {
    fn default() -> Self {
        Self {
            connected: HashSet::default(),
            eyes: HashMap::default(),
            watched: HashSet::default(),
            entities: EntityIdAllocator::starting_at(MOCK_FIRST_ENTITY_ID),
            sent: Vec::new(),
        }
    }
}

impl MockLink {
    pub fn connect(&mut self, client: ClientId, eye: Pose) {
        self.connected.insert(client);
        self.eyes.insert(client, eye);
    }

    pub fn disconnect(&mut self, client: ClientId) {
        self.connected.remove(&client);
        self.eyes.remove(&client);
    }

    /// Move the camera of a connected client
    pub fn set_eye(&mut self, client: ClientId, eye: Pose) {
        if self.connected.contains(&client) {
            self.eyes.insert(client, eye);
        }
    }

    /// The client stays connected, but its camera position can no longer be read
    pub fn clear_eye(&mut self, client: ClientId) {
        self.eyes.remove(&client);
    }

    pub fn is_watched(&self, client: ClientId) -> bool {
        self.watched.contains(&client)
    }

    pub fn sent_to(&self, client: ClientId) -> Vec<&OverlayMessage> {
        self.sent
            .iter()
            .filter(|(target, _)| *target == client)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn kinds_sent_to(&self, client: ClientId) -> Vec<MessageKind> {
        self.sent_to(client)
            .into_iter()
            .map(OverlayMessage::kind)
            .collect()
    }
}

impl ClientLink for MockLink {
    fn send(&mut self, client: ClientId, message: OverlayMessage) {
        self.sent.push((client, message));
    }

    fn is_connected(&self, client: ClientId) -> bool {
        self.connected.contains(&client)
    }

    fn eye_pose(&self, client: ClientId) -> Option<Pose> {
        self.eyes.get(&client).copied()
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        self.entities.allocate()
    }

    fn watch_disconnect(&mut self, client: ClientId) {
        self.watched.insert(client);
    }

    fn unwatch_disconnect(&mut self, client: ClientId) {
        self.watched.remove(&client);
    }
}

/// [`Scheduler`] that runs the active job once per [`Scheduler::advance`] and counts
/// how often jobs were started and cancelled
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    next_handle: u64,
    active: HashSet<TaskHandle>,
    pub started: usize,
    pub cancelled: usize,
}

impl RecordingScheduler {
    pub fn active_jobs(&self) -> usize {
        self.active.len()
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.active.insert(handle);
        self.started += 1;
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.active.remove(&handle) {
            self.cancelled += 1;
        }
    }

    fn advance(&mut self, handle: TaskHandle, delta: Duration) -> u32 {
        self.active.contains(&handle) as u32
    }
}
