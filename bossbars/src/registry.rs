/*! Registry owning the overlay of every client

# Registry

The [`OverlayRegistry`] holds at most one [`Overlay`] per client, and drives all of them
from a single repeating job:
- the job is started when the first overlay is added, and cancelled as soon as the
  registry becomes empty
- every run of the job updates each overlay, and drops the overlays of clients that are
  no longer connected

The registry is also the only listener of disconnect notifications: the transport forwards
[`ConnectionEvent`]s to [`OverlayRegistry::handle_event`], which tears down the matching
overlay.

## Example

```rust
use bossbars::prelude::*;
use core::time::Duration;

/// A transport with a single client standing at the origin
struct SingleClient {
    online: bool,
    next_entity: u32,
    sent: Vec<OverlayMessage>,
}

impl ClientLink for SingleClient {
    fn send(&mut self, _: ClientId, message: OverlayMessage) {
        self.sent.push(message);
    }

    fn is_connected(&self, client: ClientId) -> bool {
        self.online && client == ClientId(7)
    }

    fn eye_pose(&self, client: ClientId) -> Option<Pose> {
        self.is_connected(client).then(Pose::default)
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        self.next_entity += 1;
        EntityId(self.next_entity)
    }
}

let client = ClientId(7);
let link = SingleClient { online: true, next_entity: 0, sent: Vec::new() };
let mut registry = OverlayRegistry::with_defaults(link, TimerScheduler::default());
registry.set(client, "Wave 2", 75.0).unwrap();
assert!(registry.is_ticking());

// each run of the job updates the overlays
registry.advance(Duration::from_millis(250));
assert_eq!(registry.link().sent.len(), 3);

registry.link_mut().online = false;
registry.handle_event(ConnectionEvent::Disconnected(client));
assert!(registry.get_if_present(client).is_none());
assert!(!registry.is_ticking());
```
*/
use core::time::Duration;

use indexmap::IndexMap;
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};

use crate::config::OverlayConfig;
use crate::error::{OverlayError, Result};
use crate::link::{ClientId, ClientLink, ConnectionEvent};
use crate::overlay::Overlay;
use crate::scheduler::{Scheduler, TaskHandle};

/// The repeating job that updates the overlays
#[derive(Debug)]
struct TickJob {
    interval: Duration,
    handle: Option<TaskHandle>,
}

impl TickJob {
    fn start(&mut self, scheduler: &mut impl Scheduler) {
        if self.handle.is_none() {
            let handle = scheduler.schedule_repeating(self.interval);
            debug!(?handle, interval = ?self.interval, "started overlay updates");
            self.handle = Some(handle);
        }
    }

    fn stop(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
            debug!(?handle, "stopped overlay updates");
        }
    }
}

#[derive(Debug)]
pub struct OverlayRegistry<L: ClientLink, S: Scheduler> {
    link: L,
    scheduler: S,
    config: OverlayConfig,
    /// Iterated in insertion order
    overlays: IndexMap<ClientId, Overlay>,
    job: TickJob,
}

impl<L: ClientLink, S: Scheduler> OverlayRegistry<L, S> {
    pub fn new(link: L, scheduler: S, config: OverlayConfig) -> Self {
        Self {
            link,
            scheduler,
            job: TickJob {
                interval: config.update_interval,
                handle: None,
            },
            config,
            overlays: IndexMap::new(),
        }
    }

    pub fn with_defaults(link: L, scheduler: S) -> Self {
        Self::new(link, scheduler, OverlayConfig::default())
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Returns the overlay of `client`, creating an empty and full one if needed.
    ///
    /// Fails if the overlay has to be created but the client is not connected.
    pub fn get_or_create(&mut self, client: ClientId) -> Result<&mut Overlay> {
        if !self.overlays.contains_key(&client) {
            let overlay = Overlay::new(client, &self.config);
            self.insert(overlay)?;
        }
        self.overlays
            .get_mut(&client)
            .ok_or(OverlayError::ClientUnavailable(client))
    }

    pub fn get_if_present(&self, client: ClientId) -> Option<&Overlay> {
        self.overlays.get(&client)
    }

    pub fn get_if_present_mut(&mut self, client: ClientId) -> Option<&mut Overlay> {
        self.overlays.get_mut(&client)
    }

    /// Set the text and fraction of the overlay of `client`, creating it if needed
    pub fn set<'a>(
        &mut self,
        client: ClientId,
        text: impl Into<Option<&'a str>>,
        fraction: f32,
    ) -> Result<&mut Overlay> {
        let text = text.into();
        if !self.overlays.contains_key(&client) {
            let overlay = Overlay::with_text_and_fraction(client, text, fraction, &self.config)?;
            self.insert(overlay)?;
        } else if let Some(overlay) = self.overlays.get_mut(&client) {
            overlay.set_text_and_fraction(text, fraction)?;
        }
        self.overlays
            .get_mut(&client)
            .ok_or(OverlayError::ClientUnavailable(client))
    }

    /// Give the overlay of `client` the same text and fraction as `source`
    pub fn set_from(&mut self, client: ClientId, source: &Overlay) -> Result<&mut Overlay> {
        self.set(client, source.text(), source.fraction())
    }

    /// Remove the overlay of `client` and tear down its entity
    pub fn remove(&mut self, client: ClientId) -> Option<Overlay> {
        let mut overlay = self.overlays.shift_remove(&client)?;
        overlay.teardown(&mut self.link);
        debug!(?client, remaining = self.overlays.len(), "removed overlay");
        if self.overlays.is_empty() {
            self.job.stop(&mut self.scheduler);
        }
        Some(overlay)
    }

    /// Tear down every overlay
    pub fn remove_all(&mut self) {
        for (_, mut overlay) in self.overlays.drain(..) {
            overlay.teardown(&mut self.link);
        }
        self.job.stop(&mut self.scheduler);
    }

    /// Stop the updates and forget every overlay, without sending anything to the clients
    pub fn shutdown(&mut self) {
        self.job.stop(&mut self.scheduler);
        for client in self.overlays.keys() {
            self.link.unwatch_disconnect(*client);
        }
        info!(dropped = self.overlays.len(), "shutting down overlay registry");
        self.overlays.clear();
    }

    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected(client) => {
                trace!(?client, "client connected");
            }
            ConnectionEvent::Disconnected(client) => {
                self.on_disconnect(client);
            }
        }
    }

    /// Drop the overlay of a client that disconnected.
    ///
    /// Returns false if the client had no overlay, for example because the notification
    /// was already handled.
    pub fn on_disconnect(&mut self, client: ClientId) -> bool {
        let Some(mut overlay) = self.overlays.shift_remove(&client) else {
            trace!(?client, "disconnected client had no overlay");
            return false;
        };
        overlay.teardown(&mut self.link);
        debug!(?client, "dropped overlay of disconnected client");
        if self.overlays.is_empty() {
            self.job.stop(&mut self.scheduler);
        }
        true
    }

    /// Run the update job once: update every overlay, and drop those of disconnected clients.
    ///
    /// A failure for one client never prevents the other overlays from being updated.
    pub fn tick(&mut self) {
        if self.overlays.is_empty() {
            self.job.stop(&mut self.scheduler);
            return;
        }
        let link = &mut self.link;
        self.overlays.retain(|client, overlay| {
            if !link.is_connected(*client) {
                debug!(?client, "client is gone, dropping its overlay");
                overlay.teardown(&mut *link);
                return false;
            }
            match overlay.update(&mut *link) {
                Ok(outcome) => {
                    trace!(?client, ?outcome, "updated overlay");
                    true
                }
                Err(OverlayError::ClientUnavailable(_)) => {
                    debug!(?client, "client is unavailable, dropping its overlay");
                    overlay.teardown(&mut *link);
                    false
                }
                Err(e) => {
                    warn!(?client, "failed to update overlay: {e}");
                    true
                }
            }
        });
        if self.overlays.is_empty() {
            self.job.stop(&mut self.scheduler);
        }
    }

    /// Advance the scheduler clock by `delta`, running the update job as many times as it fired
    pub fn advance(&mut self, delta: Duration) {
        let Some(handle) = self.job.handle else {
            return;
        };
        let runs = self.scheduler.advance(handle, delta);
        for _ in 0..runs {
            self.tick();
            if !self.is_ticking() {
                break;
            }
        }
    }

    /// True while the update job is scheduled
    pub fn is_ticking(&self) -> bool {
        self.job.handle.is_some()
    }

    pub fn tick_handle(&self) -> Option<TaskHandle> {
        self.job.handle
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn contains(&self, client: ClientId) -> bool {
        self.overlays.contains_key(&client)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClientId, &Overlay)> + '_ {
        self.overlays.iter().map(|(client, overlay)| (*client, overlay))
    }

    fn insert(&mut self, overlay: Overlay) -> Result<()> {
        let client = overlay.client();
        if !self.link.is_connected(client) {
            return Err(OverlayError::ClientNotConnected(client));
        }
        self.link.watch_disconnect(client);
        self.overlays.insert(client, overlay);
        self.job.start(&mut self.scheduler);
        debug!(?client, overlays = self.overlays.len(), "added overlay");
        Ok(())
    }
}
