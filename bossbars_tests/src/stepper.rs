use bossbars::prelude::*;
use bossbars::test_utils::MockLink;
use core::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, info};

/// Eye of a freshly connected client: standing on the ground, looking at the horizon
pub const SPAWN_EYE: Pose = Pose::new(0.0, 65.62, 0.0, 0.0, 0.0);

/// Stepper with:
/// - an [`OverlayRegistry`] updated by a [`TimerScheduler`]
/// - a [`MockLink`] standing in for the transport, where clients can be connected,
///   moved and disconnected
///
/// Every frame advances the scheduler by `frame_duration`.
pub struct Stepper {
    pub registry: OverlayRegistry<MockLink, TimerScheduler>,
    pub frame_duration: Duration,
    next_client: u64,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new(OverlayConfig::default(), Duration::from_millis(50))
    }
}

impl Stepper {
    pub fn new(config: OverlayConfig, frame_duration: Duration) -> Self {
        Self {
            registry: OverlayRegistry::new(MockLink::default(), TimerScheduler::default(), config),
            frame_duration,
            next_client: 0,
        }
    }

    /// Stepper where every frame runs exactly one update
    pub fn one_update_per_frame() -> Self {
        let config = OverlayConfig::default();
        let frame_duration = config.update_interval;
        Self::new(config, frame_duration)
    }

    pub fn link(&self) -> &MockLink {
        self.registry.link()
    }

    pub fn link_mut(&mut self) -> &mut MockLink {
        self.registry.link_mut()
    }

    pub fn connect_client(&mut self) -> ClientId {
        let client = ClientId(self.next_client);
        self.next_client += 1;
        self.link_mut().connect(client, SPAWN_EYE);
        debug!(?client, "connected client");
        client
    }

    /// Drop the connection, and optionally notify the registry like the transport would
    pub fn disconnect_client(&mut self, client: ClientId, notify: bool) {
        self.link_mut().disconnect(client);
        if notify {
            self.registry
                .handle_event(ConnectionEvent::Disconnected(client));
        }
    }

    pub fn move_client(&mut self, client: ClientId, eye: Pose) {
        self.link_mut().set_eye(client, eye);
    }

    /// Messages sent to `client` since the last call
    pub fn take_messages(&mut self, client: ClientId) -> Vec<OverlayMessage> {
        let sent = core::mem::take(&mut self.link_mut().sent);
        let (taken, kept): (Vec<_>, Vec<_>) = sent
            .into_iter()
            .partition(|(target, _)| *target == client);
        self.link_mut().sent = kept;
        taken.into_iter().map(|(_, message)| message).collect()
    }

    pub fn take_kinds(&mut self, client: ClientId) -> Vec<MessageKind> {
        self.take_messages(client)
            .iter()
            .map(OverlayMessage::kind)
            .collect()
    }

    pub fn frame_step(&mut self) {
        self.registry.advance(self.frame_duration);
    }

    pub fn frame_step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.frame_step();
        }
    }
}
