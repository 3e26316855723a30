// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan receivers` command - Show or wait for connected receivers.

use std::sync::Arc;

use shmchan_core::{Channel, ChannelName, Config, Mode, Timeout, Transport};

use crate::error::CliError;

pub fn execute(
    transport: Arc<dyn Transport>,
    config: &Config,
    channel: &str,
    wait: Option<usize>,
    timeout_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let channel_config = config.channel_or_default(ChannelName::new(channel)?, Mode::SENDER);
    let tx = Channel::open(
        transport,
        channel_config.channel_type,
        channel_config.name.as_str(),
        Mode::SENDER,
    )?;

    if let Some(target) = wait {
        let timeout = Timeout::from_millis(timeout_ms);
        tracing::info!(channel = %tx.name(), target, timeout = %timeout, "Waiting for receivers");

        if !tx.wait_for_receivers(target, timeout)? {
            return Err(CliError::ReceiversNotReached {
                channel: tx.name().to_string(),
                target,
            }
            .into());
        }
    }

    match tx.receiver_count() {
        Some(count) => println!("{}: {} receiver(s)", tx.name(), count),
        None => println!("{}: receiver count unavailable", tx.name()),
    }
    Ok(())
}
