//! The overlay entity follows the camera of its client

use crate::stepper::{SPAWN_EYE, Stepper};
use approx::assert_relative_eq;
use bossbars::anchor::anchor_pose;
use bossbars::prelude::*;
use test_log::test;

fn spawned(stepper: &mut Stepper) -> ClientId {
    let client = stepper.connect_client();
    stepper.registry.set(client, "Follow me", 60.0).unwrap();
    stepper.frame_step();
    stepper.take_messages(client);
    client
}

#[test]
fn test_spawn_in_front_of_the_camera() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    stepper.frame_step();

    let messages = stepper.take_messages(client);
    let OverlayMessage::Spawn(spawn) = &messages[1] else {
        panic!("expected a spawn packet");
    };
    let expected = anchor_pose(&SPAWN_EYE, &stepper.registry.config().anchor);
    assert_relative_eq!(spawn.pose.x, expected.x);
    assert_relative_eq!(spawn.pose.y, expected.y);
    assert_relative_eq!(spawn.pose.z, expected.z);
    assert_eq!(
        stepper.registry.get_if_present(client).unwrap().last_pose(),
        Some(expected)
    );
}

#[test]
fn test_teleport_when_camera_moves() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = spawned(&mut stepper);
    let entity = stepper.registry.get_if_present(client).unwrap().entity().unwrap();

    let eye = Pose::new(10.0, 70.0, -4.0, 90.0, 0.0);
    stepper.move_client(client, eye);
    stepper.frame_step();

    let messages = stepper.take_messages(client);
    let expected = anchor_pose(&eye, &stepper.registry.config().anchor);
    assert_eq!(
        messages,
        vec![OverlayMessage::Teleport(Teleport::new(entity, &expected))]
    );

    // standing still afterwards sends nothing
    stepper.frame_step_n(3);
    assert!(stepper.take_kinds(client).is_empty());
}

#[test]
fn test_every_frame_of_motion_is_followed() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = spawned(&mut stepper);

    for step in 1..=5 {
        let eye = Pose::new(step as f64, 65.62, 0.0, 10.0 * step as f32, 0.0);
        stepper.move_client(client, eye);
        stepper.frame_step();
    }
    assert_eq!(stepper.take_kinds(client), vec![MessageKind::Teleport; 5]);
}

#[test]
fn test_looking_down_keeps_the_entity_above_ground() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.move_client(client, Pose::new(0.0, 2.0, 0.0, 0.0, 90.0));
    stepper.registry.get_or_create(client).unwrap();
    stepper.frame_step();

    let pose = stepper
        .registry
        .get_if_present(client)
        .unwrap()
        .last_pose()
        .unwrap();
    assert_relative_eq!(pose.y, stepper.registry.config().anchor.min_height);
}

#[test]
fn test_moving_before_spawn_sends_spawn_only() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    stepper.move_client(client, Pose::new(-20.0, 80.0, 5.0, 45.0, -30.0));
    stepper.frame_step();

    assert_eq!(
        stepper.take_kinds(client),
        vec![MessageKind::Teardown, MessageKind::Spawn, MessageKind::Metadata]
    );
}

#[test]
fn test_clients_are_tracked_independently() {
    let mut stepper = Stepper::one_update_per_frame();
    let still = spawned(&mut stepper);
    let walking = spawned(&mut stepper);

    stepper.move_client(walking, Pose::new(0.0, 65.62, 8.0, 0.0, 0.0));
    stepper.frame_step();
    assert!(stepper.take_kinds(still).is_empty());
    assert_eq!(stepper.take_kinds(walking), vec![MessageKind::Teleport]);
}
