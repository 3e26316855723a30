// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan send` command - Send one message.

use std::sync::Arc;

use shmchan_core::{Channel, ChannelName, Config, Mode, Timeout, Transport};

use crate::error::CliError;

pub fn execute(
    transport: Arc<dyn Transport>,
    config: &Config,
    channel: &str,
    message: &str,
    timeout_ms: Option<u64>,
    no_push: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let channel_config = config.channel_or_default(ChannelName::new(channel)?, Mode::SENDER);
    let timeout = timeout_ms
        .map(Timeout::from_millis)
        .unwrap_or(channel_config.send_timeout);

    let tx = Channel::open(
        transport,
        channel_config.channel_type,
        channel_config.name.as_str(),
        Mode::SENDER,
    )?;

    tracing::info!(
        channel = %tx.name(),
        bytes = message.len(),
        timeout = %timeout,
        "Sending message"
    );

    if no_push {
        if !tx.try_send(message.as_bytes(), timeout)? {
            return Err(CliError::NotDelivered {
                channel: tx.name().to_string(),
            }
            .into());
        }
        println!("✓ Delivered {} bytes to '{}'", message.len(), tx.name());
    } else {
        tx.send(message.as_bytes(), timeout)?;
        println!("✓ Sent {} bytes to '{}'", message.len(), tx.name());
    }

    Ok(())
}
