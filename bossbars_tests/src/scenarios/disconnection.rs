//! Overlays of clients that leave are dropped, with or without a notification

use crate::stepper::Stepper;
use bossbars::prelude::*;
use test_log::test;

#[test]
fn test_notified_disconnect_drops_overlay() {
    let mut stepper = Stepper::one_update_per_frame();
    let leaving = stepper.connect_client();
    let staying = stepper.connect_client();
    stepper.registry.get_or_create(leaving).unwrap();
    stepper.registry.get_or_create(staying).unwrap();
    stepper.frame_step();
    stepper.take_messages(leaving);
    stepper.take_messages(staying);

    stepper.disconnect_client(leaving, true);
    assert!(!stepper.registry.contains(leaving));
    assert!(!stepper.link().is_watched(leaving));
    assert!(stepper.link().is_watched(staying));
    assert!(stepper.take_kinds(leaving).is_empty());

    stepper.frame_step_n(4);
    assert!(stepper.take_kinds(leaving).is_empty());
    assert!(stepper.registry.is_ticking());
}

#[test]
fn test_silent_disconnect_is_noticed_by_the_next_update() {
    let mut stepper = Stepper::default();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    stepper.frame_step_n(5);
    stepper.take_messages(client);

    stepper.disconnect_client(client, false);
    assert!(stepper.registry.contains(client));

    // the overlay survives until the job runs again
    stepper.frame_step_n(4);
    assert!(stepper.registry.contains(client));
    stepper.frame_step();
    assert!(!stepper.registry.contains(client));
    assert!(!stepper.registry.is_ticking());
    assert!(stepper.take_kinds(client).is_empty());
}

#[test]
fn test_late_notification_after_pruning() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    stepper.frame_step();

    stepper.disconnect_client(client, false);
    stepper.frame_step();
    assert!(!stepper.registry.contains(client));

    // the transport notifies after the registry already dropped the overlay
    assert!(!stepper.registry.on_disconnect(client));
    assert_eq!(stepper.registry.scheduler().active_jobs(), 0);
}

#[test]
fn test_last_disconnect_stops_the_job() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.get_or_create(client).unwrap();
    let job = stepper.registry.tick_handle().unwrap();

    stepper.disconnect_client(client, true);
    assert!(!stepper.registry.is_ticking());
    assert!(!stepper.registry.scheduler().is_active(job));
}

#[test]
fn test_reconnected_client_gets_a_new_overlay() {
    let mut stepper = Stepper::one_update_per_frame();
    let client = stepper.connect_client();
    stepper.registry.set(client, "Before", 10.0).unwrap();
    stepper.frame_step();
    stepper.disconnect_client(client, true);
    stepper.take_messages(client);

    stepper.link_mut().connect(client, crate::stepper::SPAWN_EYE);
    let overlay = stepper.registry.get_or_create(client).unwrap();
    assert_eq!(overlay.text(), "");
    assert_eq!(overlay.fraction(), 100.0);
    stepper.frame_step();
    assert_eq!(
        stepper.take_kinds(client),
        vec![MessageKind::Teardown, MessageKind::Spawn, MessageKind::Metadata]
    );
}

#[test]
fn test_creating_overlay_for_absent_client_fails() {
    let mut stepper = Stepper::default();
    let client = stepper.connect_client();
    stepper.disconnect_client(client, true);

    assert_eq!(
        stepper.registry.get_or_create(client).unwrap_err(),
        OverlayError::ClientNotConnected(client)
    );
    assert!(!stepper.registry.is_ticking());
}
