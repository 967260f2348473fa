//! Bevy integration of the [`OverlayRegistry`]
//!
//! The registry lives in the [`Overlays`] resource, which must be inserted by the app since
//! it owns the transport. The plugin then:
//! - advances the registry by the frame time in [`Update`]
//! - routes every triggered [`ConnectionEvent`] to the registry
use core::marker::PhantomData;

use bevy_app::{App, Plugin, Update};
use bevy_derive::{Deref, DerefMut};
use bevy_ecs::observer::On;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use bevy_time::Time;
#[allow(unused_imports)]
use tracing::trace;

use crate::link::{ClientLink, ConnectionEvent};
use crate::registry::OverlayRegistry;
use crate::scheduler::Scheduler;

/// Resource holding the registry of the app
#[derive(Resource, Deref, DerefMut)]
pub struct Overlays<L: ClientLink, S: Scheduler>(pub OverlayRegistry<L, S>);

pub struct BossBarsPlugin<L, S> {
    _marker: PhantomData<fn() -> (L, S)>,
}

impl<L, S> Default for BossBarsPlugin<L, S> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<L, S> BossBarsPlugin<L, S>
where
    L: ClientLink + Send + Sync + 'static,
    S: Scheduler + Send + Sync + 'static,
{
    fn advance(time: Res<Time>, mut overlays: ResMut<Overlays<L, S>>) {
        overlays.advance(time.delta());
    }

    fn handle_connection_event(trigger: On<ConnectionEvent>, mut overlays: ResMut<Overlays<L, S>>) {
        trace!(event = ?*trigger, "received connection event");
        overlays.handle_event(*trigger);
    }
}

impl<L, S> Plugin for BossBarsPlugin<L, S>
where
    L: ClientLink + Send + Sync + 'static,
    S: Scheduler + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        app.init_resource::<Time>();
        app.add_systems(Update, Self::advance);
        app.add_observer(Self::handle_connection_event);
    }
}
