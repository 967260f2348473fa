//! Configuration shared by every overlay of a registry
use bossbars_protocol::prelude::EntityKind;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Where the overlay entity is placed relative to the client's camera
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Distance between the camera and the entity, in world units
    pub distance: f64,
    /// The entity is lowered by this amount so that the bar is centered on the view
    pub vertical_offset: f64,
    /// Lowest height at which the entity can be placed; the client stops rendering
    /// entities that are below the world
    pub min_height: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            distance: 30.0,
            vertical_offset: 2.0,
            min_height: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How often the overlays are updated while at least one of them exists
    pub update_interval: Duration,
    pub anchor: AnchorConfig,
    /// The health of the entity is `health_scale * fraction`
    pub health_scale: f32,
    pub entity_kind: EntityKind,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            // 5 server ticks
            update_interval: Duration::from_millis(250),
            anchor: AnchorConfig::default(),
            health_scale: 3.0,
            entity_kind: EntityKind::Wither,
        }
    }
}

impl OverlayConfig {
    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorConfig) -> Self {
        self.anchor = anchor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: OverlayConfig = serde_json::from_str(
            r#"{
                "health_scale": 2.0,
                "anchor": { "distance": 20.0 },
                "entity_kind": "EnderDragon"
            }"#,
        )
        .unwrap();
        assert_eq!(config.health_scale, 2.0);
        assert_eq!(config.entity_kind, EntityKind::EnderDragon);
        assert_eq!(config.anchor.distance, 20.0);
        assert_eq!(config.anchor.vertical_offset, 2.0);
        assert_eq!(config.update_interval, Duration::from_millis(250));
    }
}
