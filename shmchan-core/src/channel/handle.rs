// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Channel handle lifecycle: open, connect, disconnect, close.

use std::sync::Arc;

use super::Channel;
use crate::error::ChannelError;
use crate::state::{ChannelState, ChannelStateMachine};
use crate::status::Status;
use crate::transport::{RawHandle, Transport};
use crate::types::{ChannelName, ChannelType, Mode};

impl Channel {
    /// Open `name` on `transport`.
    ///
    /// The transport associates the handle with `mode` on creation, so the
    /// channel starts connected.
    ///
    /// # Errors
    /// `InvalidArgument` for a malformed name, `ConnectionFailed` if the
    /// transport refuses to create the handle.
    pub fn open(
        transport: Arc<dyn Transport>,
        channel_type: ChannelType,
        name: impl AsRef<str>,
        mode: Mode,
    ) -> Result<Self, ChannelError> {
        let name = ChannelName::new(name.as_ref())?;
        let c_name = name.to_c_string();

        let handle = transport
            .create(channel_type, &c_name, mode)
            .ok_or_else(|| {
                ChannelError::connection_failed(format!("Failed to create channel '{}'", name))
            })?;

        let mut state = ChannelStateMachine::new();
        let opened = state.transition_to(name.as_str(), ChannelState::Open)
            && state.transition_to(name.as_str(), ChannelState::Connected);
        debug_assert!(opened, "fresh channel must reach Connected");

        tracing::debug!(
            channel = %name,
            channel_type = %channel_type,
            mode = %mode,
            transport = transport.name(),
            "Opened channel"
        );

        Ok(Self {
            transport,
            name,
            channel_type,
            mode,
            handle: Some(handle),
            state,
        })
    }

    /// Associate the handle again. `None` reuses the construction mode.
    /// No-op while connected.
    pub fn connect(&mut self, mode: Option<Mode>) -> Result<(), ChannelError> {
        let handle = self.live_handle()?;
        if self.is_connected() {
            return Ok(());
        }

        let mode = mode.unwrap_or(self.mode);
        // SAFETY: handle is live until close() takes it
        let status = Status::from_raw(unsafe { self.transport.connect(handle, mode) });
        status.check(format!("Failed to connect to channel '{}'", self.name))?;

        let moved = self.state.transition_to(self.name.as_str(), ChannelState::Connected);
        debug_assert!(moved, "connect from {}", self.state.state());
        Ok(())
    }

    /// Release the association but keep the handle.
    ///
    /// No-op when not connected or closed. A transport failure is returned,
    /// but the channel is considered disconnected either way.
    pub fn disconnect(&mut self) -> Result<(), ChannelError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        if !self.is_connected() {
            return Ok(());
        }

        // SAFETY: handle is live until close() takes it
        let status = Status::from_raw(unsafe { self.transport.disconnect(handle) });
        let moved = self.state.transition_to(self.name.as_str(), ChannelState::Disconnected);
        debug_assert!(moved, "disconnect from {}", self.state.state());
        status.check(format!("Failed to disconnect from channel '{}'", self.name))
    }

    /// Disconnect if needed and release the handle. Idempotent; never fails.
    pub fn close(&mut self) {
        if self.handle.is_none() {
            return;
        }

        if self.is_connected() {
            if let Err(e) = self.disconnect() {
                tracing::warn!(
                    channel = %self.name,
                    error = %e,
                    "Ignoring disconnect failure during close"
                );
            }
        }

        if let Some(handle) = self.handle.take() {
            // SAFETY: taken out of self.handle, so this is the only release
            unsafe { self.transport.destroy(handle) };
        }
        let moved = self.state.transition_to(self.name.as_str(), ChannelState::Closed);
        debug_assert!(moved, "close from {}", self.state.state());

        tracing::debug!(channel = %self.name, "Closed channel");
    }

    /// The handle, or `InvalidState` once released.
    pub(crate) fn live_handle(&self) -> Result<RawHandle, ChannelError> {
        self.handle.ok_or_else(|| ChannelError::InvalidState {
            channel: self.name.to_string(),
            state: self.state.state().name(),
        })
    }

    /// The handle of a connected channel.
    pub(crate) fn connected_handle(&self) -> Result<RawHandle, ChannelError> {
        let handle = self.live_handle()?;
        if !self.is_connected() {
            return Err(ChannelError::connection_failed(format!(
                "Channel '{}' not connected",
                self.name
            )));
        }
        Ok(handle)
    }
}
