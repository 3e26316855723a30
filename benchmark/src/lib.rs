// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared fixtures for shmchan benchmarks.

use std::sync::Arc;

use shmchan_core::{Channel, ChannelError, ChannelType, Mode, Transport};

/// Payload sizes exercised by the throughput benchmarks.
pub const PAYLOAD_SIZES: &[usize] = &[64, 1024, 4096, 16384, 65536];

/// Deterministic payload of `size` bytes.
pub fn payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// A connected sender/receiver pair on `name`.
pub struct ChannelPair {
    pub tx: Channel,
    pub rx: Channel,
}

impl ChannelPair {
    pub fn open(
        transport: Arc<dyn Transport>,
        channel_type: ChannelType,
        name: &str,
    ) -> Result<Self, ChannelError> {
        // Receiver first so the sender sees it connected.
        let rx = Channel::open(Arc::clone(&transport), channel_type, name, Mode::RECEIVER)?;
        let tx = Channel::open(transport, channel_type, name, Mode::SENDER)?;
        Ok(Self { tx, rx })
    }
}

/// Unique channel name for one benchmark case.
pub fn bench_channel_name(prefix: &str, size: usize) -> String {
    format!("{}_{}_{}", prefix, size, std::process::id())
}
