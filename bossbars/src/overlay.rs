//! Per-client state of a boss bar, and the packets that keep the client in sync with it.
//!
//! The client draws the bar because it believes a boss creature is nearby. The [`Overlay`]
//! spawns that creature right in front of the client's camera and teleports it every update
//! so that it follows the camera. Changing the text or the fraction requires respawning the
//! creature, which is deferred to the next [`Overlay::update`].
use alloc::string::String;

use bossbars_protocol::prelude::*;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::anchor::anchor_pose;
use crate::config::{AnchorConfig, OverlayConfig};
use crate::error::{OverlayError, Result};
use crate::link::{ClientId, ClientLink};

/// Fraction of a newly created overlay
pub const DEFAULT_FRACTION: f32 = 100.0;

/// Texts longer than this are truncated
pub const MAX_TEXT_LEN: usize = 64;

/// Length of a text after truncation.
///
/// This is one less than [`MAX_TEXT_LEN`]: a 64-character text is kept as is, but a
/// 65-character text is cut down to 63 characters.
pub const TRUNCATED_TEXT_LEN: usize = MAX_TEXT_LEN - 1;

/// Check that `fraction` is a finite percentage
pub fn check_fraction(fraction: f32) -> Result<f32> {
    if !fraction.is_finite() || !(0.0..=100.0).contains(&fraction) {
        return Err(OverlayError::InvalidFraction(fraction));
    }
    Ok(fraction)
}

/// Missing texts become empty, long texts are truncated
pub fn normalize_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    if text.chars().count() > MAX_TEXT_LEN {
        return text.chars().take(TRUNCATED_TEXT_LEN).collect();
    }
    String::from(text)
}

/// What an [`Overlay::update`] sent to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The entity was destroyed and spawned again with the latest text and fraction
    Respawned,
    /// The entity was moved to follow the camera
    Teleported,
    /// Nothing changed since the last update
    Unchanged,
}

/// A boss bar displayed to a single client
#[derive(Debug)]
pub struct Overlay {
    client: ClientId,
    text: String,
    fraction: f32,
    /// Synthetic entity currently drawn by the client, if it was spawned
    entity: Option<EntityId>,
    /// The client's view is stale and the entity must be respawned
    dirty: bool,
    /// Anchor pose sent during the last update
    last_pose: Option<Pose>,
    anchor: AnchorConfig,
    health_scale: f32,
    entity_kind: EntityKind,
}

impl Overlay {
    /// Overlay with an empty text and a full bar
    pub fn new(client: ClientId, config: &OverlayConfig) -> Self {
        Self {
            client,
            text: String::new(),
            fraction: DEFAULT_FRACTION,
            entity: None,
            dirty: true,
            last_pose: None,
            anchor: config.anchor,
            health_scale: config.health_scale,
            entity_kind: config.entity_kind,
        }
    }

    /// Overlay with a full bar
    pub fn with_text<'a>(
        client: ClientId,
        text: impl Into<Option<&'a str>>,
        config: &OverlayConfig,
    ) -> Self {
        let mut overlay = Self::new(client, config);
        overlay.text = normalize_text(text.into());
        overlay
    }

    pub fn with_text_and_fraction<'a>(
        client: ClientId,
        text: impl Into<Option<&'a str>>,
        fraction: f32,
        config: &OverlayConfig,
    ) -> Result<Self> {
        let fraction = check_fraction(fraction)?;
        let mut overlay = Self::with_text(client, text, config);
        overlay.fraction = fraction;
        Ok(overlay)
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Health of the synthetic entity, which the client renders as the fill of the bar
    pub fn display_value(&self) -> f32 {
        self.health_scale * self.fraction
    }

    /// The synthetic entity, between its spawn and its teardown
    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_pose(&self) -> Option<Pose> {
        self.last_pose
    }

    /// Set the text of the bar. The client receives it at the next update.
    ///
    /// `None` clears the text, and texts longer than [`MAX_TEXT_LEN`] characters are truncated.
    pub fn set_text<'a>(&mut self, text: impl Into<Option<&'a str>>) {
        let text = normalize_text(text.into());
        self.dirty = self.dirty || text != self.text;
        self.text = text;
    }

    /// Set the fraction of the bar, between 0 and 100. The client receives it at the next update.
    ///
    /// The overlay is left untouched if the fraction is invalid.
    pub fn set_fraction(&mut self, fraction: f32) -> Result<()> {
        let fraction = check_fraction(fraction)?;
        self.dirty = self.dirty || fraction != self.fraction;
        self.fraction = fraction;
        Ok(())
    }

    /// Set both the text and the fraction, with a single change check
    pub fn set_text_and_fraction<'a>(
        &mut self,
        text: impl Into<Option<&'a str>>,
        fraction: f32,
    ) -> Result<()> {
        let fraction = check_fraction(fraction)?;
        let text = normalize_text(text.into());
        self.dirty = self.dirty || text != self.text || fraction != self.fraction;
        self.text = text;
        self.fraction = fraction;
        Ok(())
    }

    /// Where the synthetic entity should currently be.
    ///
    /// This is recomputed from the client's eye every time since the client moves freely.
    pub fn anchor_pose(&self, link: &impl ClientLink) -> Result<Pose> {
        if !link.is_connected(self.client) {
            return Err(OverlayError::ClientUnavailable(self.client));
        }
        let eye = link
            .eye_pose(self.client)
            .ok_or(OverlayError::ClientUnavailable(self.client))?;
        Ok(anchor_pose(&eye, &self.anchor))
    }

    /// Bring the client's view of the overlay up to date.
    ///
    /// If the overlay is dirty the entity is respawned, otherwise it is teleported if the
    /// anchor pose moved since the last update. Nothing is sent if the client is gone.
    pub fn update(&mut self, link: &mut impl ClientLink) -> Result<UpdateOutcome> {
        let pose = self.anchor_pose(&*link)?;
        if self.dirty {
            self.respawn(link, pose);
            return Ok(UpdateOutcome::Respawned);
        }

        let moved = self.last_pose != Some(pose);
        self.last_pose = Some(pose);
        match self.entity {
            Some(entity) if moved => {
                trace!(client = ?self.client, ?entity, ?pose, "teleporting overlay");
                link.send(self.client, Teleport::new(entity, &pose).into());
                Ok(UpdateOutcome::Teleported)
            }
            _ => Ok(UpdateOutcome::Unchanged),
        }
    }

    /// Teleport the entity to the current anchor pose, even if it did not move.
    ///
    /// Returns false if the entity was not spawned yet.
    pub fn teleport(&mut self, link: &mut impl ClientLink) -> Result<bool> {
        let pose = self.anchor_pose(&*link)?;
        let Some(entity) = self.entity else {
            return Ok(false);
        };
        link.send(self.client, Teleport::new(entity, &pose).into());
        self.last_pose = Some(pose);
        Ok(true)
    }

    /// Remove the entity from the client and stop listening to its disconnection.
    ///
    /// Returns true if a teardown packet was sent, which only requires the client to still be
    /// connected. If no entity was spawned yet, the packet targets a freshly allocated id.
    pub fn teardown(&mut self, link: &mut impl ClientLink) -> bool {
        let entity = self.entity.take();
        self.dirty = true;
        self.last_pose = None;
        link.unwatch_disconnect(self.client);
        if !link.is_connected(self.client) {
            trace!(client = ?self.client, ?entity, "client is gone, skipping teardown packet");
            return false;
        }
        let entity = entity.unwrap_or_else(|| link.allocate_entity_id());
        debug!(client = ?self.client, ?entity, "tearing down overlay");
        link.send(self.client, Teardown { entity }.into());
        true
    }

    fn respawn(&mut self, link: &mut impl ClientLink, pose: Pose) {
        let entity = link.allocate_entity_id();
        // without a previous entity, the fresh id is cleared in case the client still
        // holds a stale entity under it
        let stale = self.entity.replace(entity).unwrap_or(entity);
        trace!(client = ?self.client, ?stale, ?entity, text = %self.text, fraction = self.fraction, "respawning overlay");

        link.send(self.client, Teardown { entity: stale }.into());
        link.send(
            self.client,
            Spawn {
                entity,
                kind: self.entity_kind,
                pose,
                display_text: self.text.clone(),
                display_value: self.display_value(),
            }
            .into(),
        );
        link.send(
            self.client,
            Metadata {
                entity,
                display_text: self.text.clone(),
                show_name: true,
                display_value: self.display_value(),
            }
            .into(),
        );
        self.dirty = false;
        self.last_pose = Some(pose);
    }
}
