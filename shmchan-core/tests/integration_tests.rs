// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end tests for shmchan over the in-process transport.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use shmchan_core::{
    clear_channel_storage, receive_message, send_message, Channel, ChannelError, ChannelState,
    ChannelType, ConfigLoader, MemoryTransport, Mode, Timeout,
};
use tempfile::TempDir;

fn open(
    transport: &Arc<MemoryTransport>,
    channel_type: ChannelType,
    name: &str,
    mode: Mode,
) -> Channel {
    Channel::open(transport.clone(), channel_type, name, mode).expect("Failed to open channel")
}

/// Payloads of every length round-trip byte-for-byte and each receive frees
/// its buffer.
#[test]
fn test_round_trip_fidelity() {
    let transport = MemoryTransport::shared();
    let rx = open(&transport, ChannelType::Channel, "fidelity", Mode::RECEIVER);
    let tx = open(&transport, ChannelType::Channel, "fidelity", Mode::SENDER);

    for len in [0usize, 1, 7, 64, 4096, 65536] {
        let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        tx.send(&payload, Timeout::Millis(100)).unwrap();

        let received = rx.receive(Timeout::Millis(1000)).unwrap();
        assert_eq!(received, payload, "payload of {} bytes corrupted", len);
        assert_eq!(transport.outstanding_buffers(), 0);
    }
    assert_eq!(transport.released_buffers(), 6);
}

#[test]
fn test_close_is_idempotent() {
    let transport = MemoryTransport::shared();
    let mut channel = open(&transport, ChannelType::Channel, "idem", Mode::DUPLEX);

    for _ in 0..5 {
        channel.close();
    }
    assert!(channel.is_closed());
    assert_eq!(channel.state(), ChannelState::Closed);
    drop(channel);

    assert_eq!(transport.destroyed_handles(), 1);
    assert_eq!(transport.live_handles(), 0);
}

#[test]
fn test_operations_after_close_fail_with_invalid_state() {
    let transport = MemoryTransport::shared();
    let mut channel = open(&transport, ChannelType::Channel, "closed", Mode::DUPLEX);
    channel.close();

    let errors: Vec<ChannelError> = vec![
        channel.send(b"x", Timeout::Millis(1)).unwrap_err(),
        channel.try_send(b"x", Timeout::Millis(1)).unwrap_err(),
        channel.receive(Timeout::Millis(1)).unwrap_err(),
        channel.try_receive().unwrap_err(),
        channel.wait_for_receivers(0, Timeout::Millis(1)).unwrap_err(),
        channel.connect(None).unwrap_err(),
    ];
    for err in errors {
        assert!(err.is_invalid_state(), "unexpected error: {}", err);
    }
    assert_eq!(channel.receiver_count(), None);
}

#[test]
fn test_try_send_without_receiver_returns_false() {
    let transport = MemoryTransport::shared();
    let tx = open(&transport, ChannelType::Channel, "lonely", Mode::SENDER);

    assert!(!tx.try_send(b"anyone?", Timeout::Millis(1)).unwrap());
}

#[test]
fn test_try_receive_on_empty_channel() {
    let transport = MemoryTransport::shared();
    let rx = open(&transport, ChannelType::Channel, "empty", Mode::RECEIVER);

    assert_eq!(rx.try_receive().unwrap(), None);
    assert_eq!(transport.outstanding_buffers(), 0);
}

#[test]
fn test_wait_for_zero_receivers_is_immediate() {
    let transport = MemoryTransport::shared();
    let tx = open(&transport, ChannelType::Channel, "zero", Mode::SENDER);

    let start = Instant::now();
    assert!(tx.wait_for_receivers(0, Timeout::TransportDefault).unwrap());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_broadcast_ping() {
    let transport = MemoryTransport::shared();
    let mut tx = open(&transport, ChannelType::Route, "T", Mode::SENDER);
    let mut rx = open(&transport, ChannelType::Route, "T", Mode::RECEIVER);

    tx.send(b"ping", Timeout::TransportDefault).unwrap();
    assert_eq!(rx.receive(Timeout::Millis(1000)).unwrap(), b"ping");

    tx.close();
    rx.close();
    assert_eq!(transport.live_handles(), 0);
}

#[test]
fn test_broadcast_reaches_every_receiver() {
    let transport = MemoryTransport::shared();
    let tx = open(&transport, ChannelType::Channel, "fanout", Mode::SENDER);
    let receivers: Vec<Channel> = (0..3)
        .map(|_| open(&transport, ChannelType::Channel, "fanout", Mode::RECEIVER))
        .collect();

    assert_eq!(tx.receiver_count(), Some(3));
    tx.send(b"all", Timeout::Millis(100)).unwrap();

    for rx in &receivers {
        assert_eq!(rx.receive(Timeout::Millis(100)).unwrap(), b"all");
    }
}

#[test]
fn test_clear_storage_then_reopen_fresh() {
    let transport = MemoryTransport::shared();
    {
        // Leave route storage behind after the handle is gone.
        let _rx = open(&transport, ChannelType::Route, "stale", Mode::RECEIVER);
    }

    clear_channel_storage(transport.as_ref(), "stale").unwrap();
    assert_eq!(transport.channel_count(), 0);

    // A different channel type would collide with surviving storage.
    let rx = open(&transport, ChannelType::Channel, "stale", Mode::RECEIVER);
    assert_eq!(rx.try_receive().unwrap(), None);
    assert_eq!(rx.receiver_count(), Some(1));
}

#[test]
fn test_open_type_collision_fails() {
    let transport = MemoryTransport::shared();
    let _route = open(&transport, ChannelType::Route, "collide", Mode::SENDER);

    let err = Channel::open(
        transport.clone(),
        ChannelType::Channel,
        "collide",
        Mode::RECEIVER,
    )
    .unwrap_err();
    assert!(matches!(err, ChannelError::ConnectionFailed { code: -2, .. }));
}

#[test]
fn test_disconnected_receiver_misses_messages() {
    let transport = MemoryTransport::shared();
    let tx = open(&transport, ChannelType::Channel, "gap", Mode::SENDER);
    let mut rx = open(&transport, ChannelType::Channel, "gap", Mode::RECEIVER);

    rx.disconnect().unwrap();
    assert_eq!(tx.receiver_count(), Some(0));
    let err = tx.send(b"missed", Timeout::Millis(10)).unwrap_err();
    assert!(matches!(err, ChannelError::SendFailed { code: -3, .. }));

    rx.connect(None).unwrap();
    tx.send(b"seen", Timeout::Millis(10)).unwrap();
    assert_eq!(rx.receive(Timeout::Millis(100)).unwrap(), b"seen");
}

#[test]
fn test_receive_timeout_is_error() {
    let transport = MemoryTransport::shared();
    let rx = open(&transport, ChannelType::Channel, "quiet", Mode::RECEIVER);

    let err = rx.receive(Timeout::Millis(10)).unwrap_err();
    assert!(err.is_timeout());
}

#[test]
fn test_sender_cannot_receive() {
    let transport = MemoryTransport::shared();
    let tx = open(&transport, ChannelType::Channel, "oneway", Mode::SENDER);

    let err = tx.try_receive().unwrap_err();
    assert!(matches!(err, ChannelError::ReceiveFailed { code: -4, .. }));
}

#[test]
fn test_threaded_sender_receiver() {
    let transport = MemoryTransport::shared();
    clear_channel_storage(transport.as_ref(), "threads").unwrap();

    let rx = open(&transport, ChannelType::Channel, "threads", Mode::RECEIVER);
    let sender_transport = transport.clone();

    let sender = thread::spawn(move || {
        let tx = Channel::open(
            sender_transport,
            ChannelType::Channel,
            "threads",
            Mode::SENDER,
        )
        .unwrap();
        assert!(tx.wait_for_receivers(1, Timeout::Millis(1000)).unwrap());
        for i in 0..5 {
            tx.send(format!("Hello {}", i).as_bytes(), Timeout::Millis(100))
                .unwrap();
        }
    });

    let received: Vec<Vec<u8>> = (0..5)
        .map(|_| rx.receive(Timeout::Millis(2000)).unwrap())
        .collect();
    sender.join().unwrap();

    for (i, message) in received.iter().enumerate() {
        assert_eq!(message, format!("Hello {}", i).as_bytes());
    }
    assert_eq!(transport.outstanding_buffers(), 0);
}

#[test]
fn test_channel_moves_between_threads() {
    let transport = MemoryTransport::shared();
    let rx = open(&transport, ChannelType::Channel, "moved", Mode::RECEIVER);
    let tx = open(&transport, ChannelType::Channel, "moved", Mode::SENDER);

    let handle = thread::spawn(move || rx.receive(Timeout::Millis(2000)).unwrap());
    tx.send(b"across", Timeout::Millis(100)).unwrap();
    assert_eq!(handle.join().unwrap(), b"across");
}

#[test]
fn test_convenience_round_trip() {
    let transport = MemoryTransport::shared();
    let receiver_transport = transport.clone();

    let receiver = thread::spawn(move || {
        receive_message(
            receiver_transport,
            "oneshot",
            Timeout::Millis(2000),
            ChannelType::Channel,
        )
    });

    // The one-shot receiver must be connected before the message is sent.
    let probe = open(&transport, ChannelType::Channel, "oneshot", Mode::SENDER);
    assert!(probe.wait_for_receivers(1, Timeout::Millis(2000)).unwrap());
    drop(probe);

    send_message(transport.clone(), "oneshot", b"once", ChannelType::Channel).unwrap();
    assert_eq!(receiver.join().unwrap().unwrap(), b"once");
    assert_eq!(transport.live_handles(), 0);
}

#[test]
fn test_config_opens_declared_channels() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("channels.yaml");
    std::fs::write(
        &config_path,
        r#"
defaults:
  send_timeout_ms: 50
  recv_timeout_ms: 500

channels:
  - name: cfg-events
    mode: receiver
    channel_type: route
  - name: cfg-publisher
    mode: sender
"#,
    )
    .expect("Failed to write config");

    let config = ConfigLoader::load_file(&config_path).unwrap();
    let transport = MemoryTransport::shared();

    let events = config.channel("cfg-events").unwrap();
    let rx = events.open(transport.clone()).unwrap();
    assert_eq!(rx.channel_type(), ChannelType::Route);
    assert_eq!(rx.mode(), Mode::RECEIVER);

    let tx = Channel::open(transport.clone(), events.channel_type, "cfg-events", Mode::SENDER)
        .unwrap();
    tx.send(b"configured", events.send_timeout).unwrap();
    assert_eq!(rx.receive(events.recv_timeout).unwrap(), b"configured");
}

#[test]
fn test_config_file_not_found() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = ConfigLoader::load_file(temp_dir.path().join("missing.yaml"));
    assert!(result.is_err());
}
