// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Named, typed channel endpoints.
//!
//! A [`Channel`] exclusively owns one transport handle. Lifecycle operations
//! live in `handle`, message transfer in `transfer`, and receive buffer
//! ownership in `buffer`.

mod buffer;
mod handle;
mod transfer;

use std::fmt;
use std::sync::Arc;

use crate::state::{ChannelState, ChannelStateMachine};
use crate::transport::{RawHandle, Transport};
use crate::types::{ChannelName, ChannelType, Mode};

/// One named communication endpoint over the shared-memory transport.
///
/// The handle is released exactly once, by [`Channel::close`] or on drop.
/// A channel may be moved to another thread but not shared between threads;
/// the transport handle is single-writer.
pub struct Channel {
    transport: Arc<dyn Transport>,
    name: ChannelName,
    channel_type: ChannelType,
    mode: Mode,
    handle: Option<RawHandle>,
    state: ChannelStateMachine,
}

// SAFETY: the handle is owned by exactly one Channel and the transport binding
// is Send + Sync. Channel is deliberately not Sync.
unsafe impl Send for Channel {}

impl Channel {
    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    /// Mode given at construction.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> ChannelState {
        self.state.state()
    }

    /// Handle present and associated.
    pub fn is_connected(&self) -> bool {
        self.handle.is_some() && self.state.state() == ChannelState::Connected
    }

    /// Handle released.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("channel_type", &self.channel_type)
            .field("mode", &self.mode)
            .field("state", &self.state.state())
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.close();
    }
}
