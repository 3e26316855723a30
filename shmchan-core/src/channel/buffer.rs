// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Receive buffer ownership.
//!
//! A [`ReceivedBuffer`] owns one transport-allocated descriptor from the moment
//! a receive call succeeds. It copies the payload out and releases the
//! descriptor on drop, so every exit path frees it exactly once.

use crate::error::ChannelError;
use crate::transport::{RawBuffer, Transport};

pub(crate) struct ReceivedBuffer<'t> {
    transport: &'t dyn Transport,
    raw: RawBuffer,
}

impl<'t> ReceivedBuffer<'t> {
    /// Take ownership of a descriptor filled by a successful receive.
    ///
    /// # Safety
    /// `raw` must have been filled by a receive on `transport` that returned
    /// success, and must not be released elsewhere.
    pub(crate) unsafe fn acquire(transport: &'t dyn Transport, raw: RawBuffer) -> Self {
        Self { transport, raw }
    }

    pub(crate) fn len(&self) -> usize {
        self.raw.size
    }

    /// Copy the payload into caller-owned memory and release the descriptor.
    pub(crate) fn into_bytes(self) -> Result<Vec<u8>, ChannelError> {
        self.copy_out()
        // `self` drops here, releasing the descriptor on both Ok and Err.
    }

    fn copy_out(&self) -> Result<Vec<u8>, ChannelError> {
        if self.raw.size == 0 {
            return Ok(Vec::new());
        }
        if self.raw.data.is_null() {
            return Err(ChannelError::memory(format!(
                "Received descriptor of {} bytes with null data",
                self.raw.size
            )));
        }

        // SAFETY: the transport guarantees `data` points to `size` readable
        // bytes until the descriptor is released, which happens in Drop.
        let payload =
            unsafe { std::slice::from_raw_parts(self.raw.data as *const u8, self.raw.size) };
        Ok(payload.to_vec())
    }
}

impl Drop for ReceivedBuffer<'_> {
    fn drop(&mut self) {
        // SAFETY: acquired from a successful receive and released only here
        unsafe { self.transport.free_buffer(&mut self.raw) };
    }
}
