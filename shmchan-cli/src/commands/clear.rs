// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan clear` command - Remove stale channel storage.

use std::sync::Arc;

use shmchan_core::{clear_channel_storage, Transport};

pub fn execute(
    transport: Arc<dyn Transport>,
    channel: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(channel = %channel, transport = transport.name(), "Clearing channel storage");

    clear_channel_storage(transport.as_ref(), channel)?;
    println!("✓ Cleared storage for '{}'", channel);
    Ok(())
}
