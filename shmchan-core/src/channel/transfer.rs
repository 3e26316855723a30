// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Message transfer over a live channel handle.
//!
//! `send` and `receive` treat a timeout as an error. `try_send`, `try_receive`
//! and `wait_for_receivers` report it as a soft negative result.

use super::buffer::ReceivedBuffer;
use super::Channel;
use crate::error::ChannelError;
use crate::status::{raw, Status};
use crate::transport::RawBuffer;
use crate::types::Timeout;

impl Channel {
    /// Blocking send. The transport may force-push once `timeout` expires.
    ///
    /// # Errors
    /// Any non-success status, including `Timeout`.
    pub fn send(&self, data: &[u8], timeout: impl Into<Timeout>) -> Result<(), ChannelError> {
        let handle = self.connected_handle()?;
        let timeout = timeout.into();

        // SAFETY: handle is live for the duration of &self
        let status = Status::from_raw(unsafe {
            self.transport.send(handle, data, timeout.as_raw_ms())
        });
        status.check(format!("Failed to send data on '{}'", self.name))?;

        tracing::trace!(channel = %self.name, bytes = data.len(), "Sent message");
        Ok(())
    }

    /// Send without force-push.
    ///
    /// Returns `false` if the transport timed out; the message was not delivered.
    pub fn try_send(&self, data: &[u8], timeout: impl Into<Timeout>) -> Result<bool, ChannelError> {
        let handle = self.connected_handle()?;
        let timeout = timeout.into();

        // SAFETY: handle is live for the duration of &self
        let status = Status::from_raw(unsafe {
            self.transport.try_send(handle, data, timeout.as_raw_ms())
        });
        match status {
            Status::Success => Ok(true),
            Status::Timeout => Ok(false),
            other => Err(ChannelError::from_status(
                other,
                format!("Failed to send data on '{}'", self.name),
            )),
        }
    }

    /// Blocking receive.
    ///
    /// # Errors
    /// Any non-success status, including `Timeout`. Never returns "no data".
    pub fn receive(&self, timeout: impl Into<Timeout>) -> Result<Vec<u8>, ChannelError> {
        let handle = self.connected_handle()?;
        let timeout = timeout.into();

        let mut descriptor = RawBuffer::empty();
        // SAFETY: handle is live for the duration of &self
        let status = Status::from_raw(unsafe {
            self.transport.recv(handle, &mut descriptor, timeout.as_raw_ms())
        });
        status.check(format!("Failed to receive data on '{}'", self.name))?;

        self.take_delivery(descriptor)
    }

    /// Non-blocking receive. `None` when no message is available.
    pub fn try_receive(&self) -> Result<Option<Vec<u8>>, ChannelError> {
        let handle = self.connected_handle()?;

        let mut descriptor = RawBuffer::empty();
        // SAFETY: handle is live for the duration of &self
        let status = Status::from_raw(unsafe { self.transport.try_recv(handle, &mut descriptor) });
        match status {
            Status::Success => self.take_delivery(descriptor).map(Some),
            Status::Timeout => Ok(None),
            other => Err(ChannelError::from_status(
                other,
                format!("Failed to receive data on '{}'", self.name),
            )),
        }
    }

    /// Receivers currently connected, as reported by the transport.
    ///
    /// `None` once the channel is closed or if the transport reports an error.
    pub fn receiver_count(&self) -> Option<usize> {
        let handle = self.handle?;
        // SAFETY: handle is live for the duration of &self
        let count = unsafe { self.transport.receiver_count(handle) };
        usize::try_from(count).ok()
    }

    /// Block until at least `count` receivers are connected.
    ///
    /// Does not require the channel itself to be connected. Returns `false`
    /// if the timeout elapsed first.
    pub fn wait_for_receivers(
        &self,
        count: usize,
        timeout: impl Into<Timeout>,
    ) -> Result<bool, ChannelError> {
        let handle = self.live_handle()?;
        let timeout = timeout.into();

        // SAFETY: handle is live for the duration of &self
        let result = unsafe {
            self.transport.wait_for_receivers(handle, count, timeout.as_raw_ms())
        };
        match result {
            raw::WAIT_REACHED => Ok(true),
            raw::WAIT_NOT_REACHED => Ok(false),
            code => Err(ChannelError::ConnectionFailed {
                code,
                context: format!("Failed to wait for receivers on '{}'", self.name),
            }),
        }
    }

    /// Copy a successfully received descriptor out and release it.
    fn take_delivery(&self, descriptor: RawBuffer) -> Result<Vec<u8>, ChannelError> {
        // SAFETY: filled by a receive on this transport that returned success
        let buffer = unsafe { ReceivedBuffer::acquire(self.transport.as_ref(), descriptor) };
        tracing::trace!(channel = %self.name, bytes = buffer.len(), "Received message");
        buffer.into_bytes()
    }
}
