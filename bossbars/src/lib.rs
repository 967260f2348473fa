/*! # Bossbars

Boss bars displayed to individual clients, without any matching entity on the server.

Each client gets at most one [`Overlay`](overlay::Overlay): a text and a fill fraction that
the client renders as the health bar of a boss creature. The creature is synthesized with
raw packets sent through a [`ClientLink`](link::ClientLink), and follows the client's camera
so that the bar never disappears.

The [`OverlayRegistry`](registry::OverlayRegistry) owns the overlays, updates them from a
repeating job provided by a [`Scheduler`](scheduler::Scheduler), and drops them when their
client disconnects. In a Bevy app, the [`BossBarsPlugin`](plugin::BossBarsPlugin) drives
the registry from the frame time.
*/

extern crate alloc;

pub mod anchor;
pub mod config;
pub mod error;
pub mod link;
pub mod overlay;
pub mod plugin;
pub mod registry;
pub mod scheduler;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use bossbars_protocol as protocol;

pub mod prelude {
    pub use crate::config::{AnchorConfig, OverlayConfig};
    pub use crate::error::OverlayError;
    pub use crate::link::{ClientId, ClientLink, ConnectionEvent, EntityIdAllocator};
    pub use crate::overlay::{Overlay, UpdateOutcome};
    pub use crate::plugin::{BossBarsPlugin, Overlays};
    pub use crate::registry::OverlayRegistry;
    pub use crate::scheduler::{Scheduler, TaskHandle, TimerScheduler};

    pub use bossbars_protocol::prelude::*;
}
