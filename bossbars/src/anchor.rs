//! Placement of the overlay entity in front of the client's camera
use bossbars_protocol::prelude::Pose;

use crate::config::AnchorConfig;

/// Compute where the overlay entity should be, given the client's eye.
///
/// The entity is placed `distance` units away in the direction the client faces. The
/// horizontal offset shrinks with the cosine of the pitch, so that looking straight up or
/// down brings it right above or below the camera. The orientation is copied from the eye.
pub fn anchor_pose(eye: &Pose, config: &AnchorConfig) -> Pose {
    // yaw 0 faces +Z, which is 90 degrees away from the X axis
    let yaw = ((eye.yaw + 90.0) as f64).to_radians();
    let pitch = (eye.pitch as f64).to_radians();
    let horizontal = config.distance * pitch.cos();

    let x = eye.x + yaw.cos() * horizontal;
    let y = eye.y + (-pitch).sin() * config.distance - config.vertical_offset;
    let z = eye.z + yaw.sin() * horizontal;
    Pose::new(x, y.max(config.min_height), z, eye.yaw, eye.pitch)
}
