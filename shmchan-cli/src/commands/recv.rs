// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan recv` command - Receive and print messages.

use std::sync::Arc;

use shmchan_core::{Channel, ChannelName, Config, Mode, Timeout, Transport};

pub fn execute(
    transport: Arc<dyn Transport>,
    config: &Config,
    channel: &str,
    count: usize,
    timeout_ms: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let channel_config = config.channel_or_default(ChannelName::new(channel)?, Mode::RECEIVER);
    let timeout = timeout_ms
        .map(Timeout::from_millis)
        .unwrap_or(channel_config.recv_timeout);

    let rx = Channel::open(
        transport,
        channel_config.channel_type,
        channel_config.name.as_str(),
        Mode::RECEIVER,
    )?;

    tracing::info!(channel = %rx.name(), count, timeout = %timeout, "Waiting for messages");

    for index in 0..count {
        let message = rx.receive(timeout)?;
        println!(
            "[{}] {} bytes: {}",
            index + 1,
            message.len(),
            String::from_utf8_lossy(&message)
        );
    }

    Ok(())
}
