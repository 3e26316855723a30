// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan demo` command - Threaded sender and receiver on one channel.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use shmchan_core::{
    clear_channel_storage, Channel, ChannelError, ChannelType, Mode, Timeout, Transport,
};

/// Per-message receive timeout.
const RECV_TIMEOUT: Timeout = Timeout::Millis(1000);
/// How long the sender waits for the receiver to connect.
const CONNECT_TIMEOUT: Timeout = Timeout::Millis(5000);
/// Pause between sends.
const SEND_INTERVAL: Duration = Duration::from_millis(100);

pub fn execute(
    transport: Arc<dyn Transport>,
    channel: &str,
    messages: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Running shmchan demo on '{}' ({})...", channel, transport.name());

    clear_channel_storage(transport.as_ref(), channel)?;

    let receiver = {
        let transport = Arc::clone(&transport);
        let channel = channel.to_string();
        thread::spawn(move || run_receiver(transport, &channel, messages))
    };
    let sender = {
        let transport = Arc::clone(&transport);
        let channel = channel.to_string();
        thread::spawn(move || run_sender(transport, &channel, messages))
    };

    let received = receiver
        .join()
        .map_err(|_| "receiver thread panicked")??;
    let sent = sender.join().map_err(|_| "sender thread panicked")??;

    println!();
    println!("Demo completed: {} sent, {} received", sent, received);
    Ok(())
}

fn run_sender(
    transport: Arc<dyn Transport>,
    channel: &str,
    messages: usize,
) -> Result<usize, ChannelError> {
    let tx = Channel::open(transport, ChannelType::Channel, channel, Mode::SENDER)?;

    if !tx.wait_for_receivers(1, CONNECT_TIMEOUT)? {
        tracing::warn!(channel = %tx.name(), "No receiver connected, nothing sent");
        return Ok(0);
    }

    for i in 0..messages {
        let message = format!("Hello {}", i);
        tx.send(message.as_bytes(), Timeout::TransportDefault)?;
        println!("Sent: {}", message);
        thread::sleep(SEND_INTERVAL);
    }
    Ok(messages)
}

fn run_receiver(
    transport: Arc<dyn Transport>,
    channel: &str,
    messages: usize,
) -> Result<usize, ChannelError> {
    let rx = Channel::open(transport, ChannelType::Channel, channel, Mode::RECEIVER)?;

    let mut received = 0;
    for _ in 0..messages {
        match rx.receive(RECV_TIMEOUT) {
            Ok(data) => {
                println!("Received: {}", String::from_utf8_lossy(&data));
                received += 1;
            }
            Err(e) => {
                eprintln!("Receive error: {}", e);
                tracing::debug!(channel = %rx.name(), error = %e, "Receive failed, continuing");
            }
        }
    }
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shmchan_core::MemoryTransport;

    #[test]
    fn test_demo_over_memory_transport() {
        let transport = MemoryTransport::shared();
        execute(transport.clone(), "demo_test", 3).unwrap();
        assert_eq!(transport.live_handles(), 0);
        assert_eq!(transport.outstanding_buffers(), 0);
    }

    #[test]
    fn test_receiver_counts_only_delivered() {
        let transport = MemoryTransport::shared();
        // Nobody sends, every receive times out.
        let received = run_receiver(transport, "silent", 1).unwrap();
        assert_eq!(received, 0);
    }
}
