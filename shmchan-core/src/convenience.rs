// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! One-shot helpers built on [`Channel`].

use std::sync::Arc;

use crate::channel::Channel;
use crate::error::ChannelError;
use crate::transport::Transport;
use crate::types::{ChannelName, ChannelType, Mode, Timeout};

/// Open `name` as a sender, send `data` once, and close.
pub fn send_message(
    transport: Arc<dyn Transport>,
    name: &str,
    data: &[u8],
    channel_type: ChannelType,
) -> Result<(), ChannelError> {
    let mut channel = Channel::open(transport, channel_type, name, Mode::SENDER)?;
    channel.connect(None)?;
    channel.send(data, Timeout::TransportDefault)
}

/// Open `name` as a receiver, receive one message, and close.
///
/// Only messages sent after the receiver connects are delivered.
pub fn receive_message(
    transport: Arc<dyn Transport>,
    name: &str,
    timeout: impl Into<Timeout>,
    channel_type: ChannelType,
) -> Result<Vec<u8>, ChannelError> {
    let mut channel = Channel::open(transport, channel_type, name, Mode::RECEIVER)?;
    channel.connect(None)?;
    channel.receive(timeout)
}

/// Remove storage left behind for `name` by channels that were never closed.
pub fn clear_channel_storage(transport: &dyn Transport, name: &str) -> Result<(), ChannelError> {
    let name = ChannelName::new(name)?;
    transport.clear_storage(&name.to_c_string());
    tracing::debug!(channel = %name, transport = transport.name(), "Cleared channel storage");
    Ok(())
}
