//! End-to-end pipeline tests over mock hardware.
//!
//! These wire the real decoder, whitelist, bridge, and task loops
//! together exactly as `taglockd` does, substituting mock devices at
//! the hardware seams.

use std::sync::Arc;
use std::time::Duration;

use taglock_bridge::{MockTransport, Reporter, command_queue, run_consumer};
use taglock_core::TagId;
use taglock_core::constants::{
    RECORD_LEN, SCAN_WINDOW, TOPIC_AUTHORIZED, TOPIC_BUTTON, TOPIC_DENIED,
};
use taglock_device::tasks::{run_button_loop, run_scan_loop};
use taglock_hardware::mock::{MockButton, MockByteSource, MockClock, MockDoor};
use taglock_rfid::TagDecoder;
use taglock_protocol::encode_record;
use taglock_storage::{MemoryBlobStore, Whitelist};

fn tag(raw: u32) -> TagId {
    TagId::new(raw).unwrap()
}

fn window(id: u32) -> Vec<u8> {
    let mut window = vec![0xAAu8; SCAN_WINDOW];
    window[..RECORD_LEN].copy_from_slice(&encode_record(0x0A, id));
    window
}

/// Poll until `condition` holds, failing after two seconds.
async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_authorized_tag_opens_door_and_reports() {
    let whitelist = Arc::new(Whitelist::load(MemoryBlobStore::new()).await);
    whitelist.toggle(tag(42)).await.unwrap();

    let (source, source_handle) = MockByteSource::new();
    let decoder = TagDecoder::new(source, MockClock::new());
    let (door, door_handle) = MockDoor::new();
    let transport = MockTransport::new();
    let reporter = Arc::new(Reporter::new(transport.clone()));

    let scan = tokio::spawn(run_scan_loop(
        decoder,
        Arc::clone(&whitelist),
        Arc::new(door),
        reporter,
    ));

    source_handle.feed(window(42)).await;
    wait_until(|| !transport.events().is_empty()).await;

    assert_eq!(
        transport.events(),
        vec![(TOPIC_AUTHORIZED.to_string(), "42".to_string())]
    );
    assert_eq!(door_handle.pulse_count(), 1);

    scan.abort();
}

#[tokio::test]
async fn test_unknown_tag_denied_without_actuation() {
    let whitelist = Arc::new(Whitelist::load(MemoryBlobStore::new()).await);

    let (source, source_handle) = MockByteSource::new();
    let decoder = TagDecoder::new(source, MockClock::new());
    let (door, door_handle) = MockDoor::new();
    let transport = MockTransport::new();
    let reporter = Arc::new(Reporter::new(transport.clone()));

    let scan = tokio::spawn(run_scan_loop(
        decoder,
        Arc::clone(&whitelist),
        Arc::new(door),
        reporter,
    ));

    source_handle.feed(window(99)).await;
    wait_until(|| !transport.events().is_empty()).await;

    assert_eq!(
        transport.events(),
        vec![(TOPIC_DENIED.to_string(), "99".to_string())]
    );
    assert_eq!(door_handle.pulse_count(), 0);

    scan.abort();
}

#[tokio::test]
async fn test_remote_toggle_authorizes_subsequent_scan() {
    let whitelist = Arc::new(Whitelist::load(MemoryBlobStore::new()).await);

    let (command_sender, command_receiver) = command_queue();
    let consumer = tokio::spawn(run_consumer(command_receiver, Arc::clone(&whitelist)));

    assert!(command_sender.submit("42"));

    // The consumer applies the toggle; wait for it to land.
    {
        let whitelist = Arc::clone(&whitelist);
        tokio::time::timeout(Duration::from_secs(2), async move {
            while whitelist.search(tag(42)).await.is_none() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("remote toggle not applied in time");
    }

    let (source, source_handle) = MockByteSource::new();
    let decoder = TagDecoder::new(source, MockClock::new());
    let (door, door_handle) = MockDoor::new();
    let transport = MockTransport::new();
    let reporter = Arc::new(Reporter::new(transport.clone()));

    let scan = tokio::spawn(run_scan_loop(
        decoder,
        Arc::clone(&whitelist),
        Arc::new(door),
        reporter,
    ));

    source_handle.feed(window(42)).await;
    wait_until(|| door_handle.pulse_count() == 1).await;

    scan.abort();
    drop(command_sender);
    consumer.await.unwrap();
}

#[tokio::test]
async fn test_suppressed_rescan_is_not_reported() {
    let whitelist = Arc::new(Whitelist::load(MemoryBlobStore::new()).await);
    whitelist.toggle(tag(42)).await.unwrap();

    let (source, source_handle) = MockByteSource::new();
    let clock = MockClock::new();
    let decoder = TagDecoder::new(source, clock.clone());
    let (door, door_handle) = MockDoor::new();
    let transport = MockTransport::new();
    let reporter = Arc::new(Reporter::new(transport.clone()));

    let scan = tokio::spawn(run_scan_loop(
        decoder,
        Arc::clone(&whitelist),
        Arc::new(door),
        reporter,
    ));

    source_handle.feed(window(42)).await;
    wait_until(|| door_handle.pulse_count() == 1).await;

    // Reader re-transmits while the tag is still held: inside the idle
    // window the read is suppressed, nothing else is published.
    clock.advance(Duration::from_millis(100));
    source_handle.feed(window(42)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(door_handle.pulse_count(), 1);
    assert_eq!(transport.events().len(), 1);

    scan.abort();
}

#[tokio::test]
async fn test_button_press_opens_and_reports() {
    let (button, button_handle) = MockButton::new();
    let (door, door_handle) = MockDoor::new();
    let transport = MockTransport::new();
    let reporter = Arc::new(Reporter::new(transport.clone()));

    let loop_task = tokio::spawn(run_button_loop(
        button,
        Arc::new(door),
        reporter,
        MockClock::new(),
        Duration::from_millis(2000),
    ));

    button_handle.press().await;
    wait_until(|| door_handle.pulse_count() == 1).await;

    assert_eq!(
        transport.events(),
        vec![(TOPIC_BUTTON.to_string(), "button".to_string())]
    );

    loop_task.abort();
}
