// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport boundary.
//!
//! [`Transport`] mirrors the libipc C API one call per method. Status-returning
//! methods hand back the raw `i32` so that mapping happens in one place, the
//! channel layer. A binding is created once per process by the caller and
//! injected into every [`Channel`](crate::Channel) as an `Arc<dyn Transport>`.

mod memory;
#[cfg(feature = "native")]
mod native;
#[cfg(test)]
pub(crate) mod scripted;

use std::ffi::{c_void, CStr};
use std::ptr::NonNull;

use crate::types::{ChannelType, Mode};

pub use memory::{MemoryTransport, DEFAULT_SEND_TIMEOUT_MS, INBOX_CAPACITY};
#[cfg(feature = "native")]
pub use native::NativeTransport;

/// Opaque transport-level reference to channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RawHandle(NonNull<c_void>);

impl RawHandle {
    /// Wrap a pointer returned by the transport. Null means creation failed.
    pub fn from_ptr(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Release callback stored in a [`RawBuffer`].
pub type FreeFn = unsafe extern "C" fn(data: *mut c_void, ctx: *mut c_void);

/// Buffer descriptor filled in by a receive call.
///
/// Layout-identical to libipc's `ipc_buffer`. Only valid after the receive
/// call returned success.
#[repr(C)]
#[derive(Debug)]
pub struct RawBuffer {
    pub data: *mut c_void,
    pub size: libc::size_t,
    pub free_fn: Option<FreeFn>,
    pub ctx: *mut c_void,
}

impl RawBuffer {
    pub const fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            size: 0,
            free_fn: None,
            ctx: std::ptr::null_mut(),
        }
    }
}

impl Default for RawBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

/// The shared-memory transport as seen from the channel layer.
///
/// Methods taking a [`RawHandle`] are `unsafe`: the handle must have been
/// returned by [`Transport::create`] on the same transport and not yet passed
/// to [`Transport::destroy`].
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Allocate a handle for `name`. `None` on failure.
    fn create(&self, channel_type: ChannelType, name: &CStr, mode: Mode) -> Option<RawHandle>;

    /// Release a handle. Called at most once per handle.
    ///
    /// # Safety
    /// `handle` must be live; it is dangling afterwards.
    unsafe fn destroy(&self, handle: RawHandle);

    /// # Safety
    /// `handle` must be live.
    unsafe fn connect(&self, handle: RawHandle, mode: Mode) -> i32;

    /// # Safety
    /// `handle` must be live.
    unsafe fn disconnect(&self, handle: RawHandle) -> i32;

    /// Blocking send; may force-push once `timeout_ms` expires.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32;

    /// Send that never force-pushes; reports timeout on expiry.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn try_send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32;

    /// Blocking receive. `buffer` is filled only on success.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn recv(&self, handle: RawHandle, buffer: &mut RawBuffer, timeout_ms: u64) -> i32;

    /// Non-blocking receive. Timeout status means no data.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn try_recv(&self, handle: RawHandle, buffer: &mut RawBuffer) -> i32;

    /// Release a received buffer.
    ///
    /// # Safety
    /// `buffer` must have been filled by a successful receive on this transport
    /// and not released before.
    unsafe fn free_buffer(&self, buffer: &mut RawBuffer);

    /// Connected receiver count. Negative on error.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn receiver_count(&self, handle: RawHandle) -> i32;

    /// `1` when `count` receivers are connected, `0` on timeout, anything
    /// else on error.
    ///
    /// # Safety
    /// `handle` must be live.
    unsafe fn wait_for_receivers(&self, handle: RawHandle, count: usize, timeout_ms: u64) -> i32;

    /// Remove persistent storage left behind for `name`.
    fn clear_storage(&self, name: &CStr);
}
