//! Creation, update and removal of overlays through the registry

use crate::stepper::Stepper;
use bossbars::prelude::*;
use core::time::Duration;
use test_log::test;

#[test]
fn test_job_restarts_after_registry_emptied() {
    let mut stepper = Stepper::default();
    let alice = stepper.connect_client();
    let bob = stepper.connect_client();

    stepper.registry.get_or_create(alice).unwrap();
    let first_job = stepper.registry.tick_handle().unwrap();
    assert!(stepper.registry.scheduler().is_active(first_job));

    stepper.registry.remove(alice);
    assert!(!stepper.registry.is_ticking());
    assert!(!stepper.registry.scheduler().is_active(first_job));

    stepper.registry.get_or_create(bob).unwrap();
    let second_job = stepper.registry.tick_handle().unwrap();
    assert_ne!(first_job, second_job);
    assert_eq!(stepper.registry.scheduler().active_jobs(), 1);
}

#[test]
fn test_updates_follow_the_interval() {
    let mut stepper = Stepper::default();
    let client = stepper.connect_client();
    stepper.registry.set(client, "Wave 1", 100.0).unwrap();

    // 4 frames of 50ms: the 250ms interval has not elapsed yet
    stepper.frame_step_n(4);
    assert!(stepper.take_kinds(client).is_empty());

    stepper.frame_step();
    assert_eq!(
        stepper.take_kinds(client),
        vec![MessageKind::Teardown, MessageKind::Spawn, MessageKind::Metadata]
    );

    // the camera does not move: the following updates send nothing
    stepper.frame_step_n(20);
    assert!(stepper.take_kinds(client).is_empty());
}

#[test]
fn test_long_frame_runs_several_updates() {
    let mut stepper = Stepper::new(OverlayConfig::default(), Duration::from_millis(600));
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();

    // 600ms covers two updates: the spawn, then nothing since the camera did not move
    stepper.frame_step();
    assert_eq!(stepper.take_kinds(client).len(), 3);

    // two more updates: the first one teleports, the second finds the entity in place
    stepper.move_client(client, Pose::new(3.0, 65.62, 0.0, 0.0, 0.0));
    stepper.frame_step();
    assert_eq!(stepper.take_kinds(client), vec![MessageKind::Teleport]);
}

#[test]
fn test_text_change_respawns_with_new_values() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.set(client, "Wave 1", 100.0).unwrap();
    stepper.frame_step();
    let first = stepper.registry.get_if_present(client).unwrap().entity().unwrap();
    stepper.take_messages(client);

    stepper.registry.set(client, "Wave 2", 25.0).unwrap();
    stepper.frame_step();
    let messages = stepper.take_messages(client);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], OverlayMessage::Teardown(Teardown { entity: first }));
    let OverlayMessage::Spawn(spawn) = &messages[1] else {
        panic!("expected a spawn packet");
    };
    assert_eq!(spawn.display_text, "Wave 2");
    assert_eq!(spawn.display_value, 75.0);
    assert_ne!(spawn.entity, first);
    let OverlayMessage::Metadata(metadata) = &messages[2] else {
        panic!("expected a metadata packet");
    };
    assert_eq!(metadata.entity, spawn.entity);
    assert!(metadata.show_name);
}

#[test]
fn test_voided_text_does_not_respawn_when_already_empty() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    stepper.frame_step();
    stepper.take_messages(client);

    // setting the text it already had must not resend the bar
    stepper
        .registry
        .get_or_create(client)
        .unwrap()
        .set_text(None::<&str>);
    stepper.frame_step();
    assert!(stepper.take_kinds(client).is_empty());
}

#[test]
fn test_remove_all_tears_down_every_client() {
    let mut stepper = Stepper::one_update_per_frame();
    let clients: Vec<_> = (0..3).map(|_| stepper.connect_client()).collect();
    for client in &clients {
        stepper.registry.get_or_create(*client).unwrap();
    }
    stepper.frame_step();

    stepper.registry.remove_all();
    for client in &clients {
        let kinds = stepper.take_kinds(*client);
        assert_eq!(kinds.last(), Some(&MessageKind::Teardown));
        assert_eq!(kinds.len(), 4);
    }
    assert!(!stepper.registry.is_ticking());
    assert_eq!(stepper.registry.scheduler().active_jobs(), 0);
}

#[test]
fn test_frames_are_framed_as_packets() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.set(client, "Framed", 50.0).unwrap();
    stepper.frame_step();

    for message in stepper.take_messages(client) {
        let frame = message.to_frame().unwrap();
        assert_eq!(frame.len(), message.bytes_len());
        let mut reader = frame;
        let decoded = OverlayMessage::from_bytes(&mut reader).unwrap();
        assert_eq!(decoded.kind(), message.kind());
        assert_eq!(decoded.entity(), message.entity());
    }
}
