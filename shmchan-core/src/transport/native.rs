// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Native libipc binding.
//!
//! Links against the libipc C API. All unsafe FFI calls are confined here.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::sync::{Arc, OnceLock};

use libc::size_t;

use super::{RawBuffer, RawHandle, Transport};
use crate::types::{ChannelType, Mode};

#[link(name = "ipc")]
extern "C" {
    fn ipc_channel_create(channel_type: c_int, name: *const c_char, mode: c_int) -> *mut c_void;
    fn ipc_channel_destroy(handle: *mut c_void);
    fn ipc_channel_connect(handle: *mut c_void, mode: c_int) -> c_int;
    fn ipc_channel_disconnect(handle: *mut c_void) -> c_int;
    fn ipc_channel_send(
        handle: *mut c_void,
        data: *const c_void,
        size: size_t,
        timeout_ms: u64,
    ) -> c_int;
    fn ipc_channel_try_send(
        handle: *mut c_void,
        data: *const c_void,
        size: size_t,
        timeout_ms: u64,
    ) -> c_int;
    fn ipc_channel_recv(handle: *mut c_void, buffer: *mut RawBuffer, timeout_ms: u64) -> c_int;
    fn ipc_channel_try_recv(handle: *mut c_void, buffer: *mut RawBuffer) -> c_int;
    fn ipc_buffer_free(buffer: *mut RawBuffer);
    fn ipc_channel_recv_count(handle: *mut c_void) -> c_int;
    fn ipc_channel_wait_for_recv(handle: *mut c_void, count: size_t, timeout_ms: u64) -> c_int;
    fn ipc_channel_clear_storage(name: *const c_char);
}

static BINDING: OnceLock<Arc<NativeTransport>> = OnceLock::new();

/// Process-wide binding to the native libipc library.
#[derive(Debug)]
pub struct NativeTransport {
    _private: (),
}

impl NativeTransport {
    /// Initialize the binding. Repeated calls return the same instance.
    pub fn init() -> Arc<NativeTransport> {
        BINDING
            .get_or_init(|| {
                tracing::info!("Initialized native libipc transport binding");
                Arc::new(NativeTransport { _private: () })
            })
            .clone()
    }
}

impl Transport for NativeTransport {
    fn name(&self) -> &'static str {
        "libipc"
    }

    fn create(&self, channel_type: ChannelType, name: &CStr, mode: Mode) -> Option<RawHandle> {
        // SAFETY: name is a valid NUL-terminated string for the duration of the call
        let ptr = unsafe { ipc_channel_create(channel_type.raw(), name.as_ptr(), mode.raw()) };
        RawHandle::from_ptr(ptr)
    }

    unsafe fn destroy(&self, handle: RawHandle) {
        ipc_channel_destroy(handle.as_ptr())
    }

    unsafe fn connect(&self, handle: RawHandle, mode: Mode) -> i32 {
        ipc_channel_connect(handle.as_ptr(), mode.raw())
    }

    unsafe fn disconnect(&self, handle: RawHandle) -> i32 {
        ipc_channel_disconnect(handle.as_ptr())
    }

    unsafe fn send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32 {
        ipc_channel_send(
            handle.as_ptr(),
            data.as_ptr() as *const c_void,
            data.len(),
            timeout_ms,
        )
    }

    unsafe fn try_send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32 {
        ipc_channel_try_send(
            handle.as_ptr(),
            data.as_ptr() as *const c_void,
            data.len(),
            timeout_ms,
        )
    }

    unsafe fn recv(&self, handle: RawHandle, buffer: &mut RawBuffer, timeout_ms: u64) -> i32 {
        ipc_channel_recv(handle.as_ptr(), buffer as *mut RawBuffer, timeout_ms)
    }

    unsafe fn try_recv(&self, handle: RawHandle, buffer: &mut RawBuffer) -> i32 {
        ipc_channel_try_recv(handle.as_ptr(), buffer as *mut RawBuffer)
    }

    unsafe fn free_buffer(&self, buffer: &mut RawBuffer) {
        ipc_buffer_free(buffer as *mut RawBuffer)
    }

    unsafe fn receiver_count(&self, handle: RawHandle) -> i32 {
        ipc_channel_recv_count(handle.as_ptr())
    }

    unsafe fn wait_for_receivers(&self, handle: RawHandle, count: usize, timeout_ms: u64) -> i32 {
        ipc_channel_wait_for_recv(handle.as_ptr(), count, timeout_ms)
    }

    fn clear_storage(&self, name: &CStr) {
        // SAFETY: name is a valid NUL-terminated string for the duration of the call
        unsafe { ipc_channel_clear_storage(name.as_ptr()) }
    }
}
