// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Test transport returning pre-programmed status codes.

use std::ffi::{c_void, CStr};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{RawBuffer, RawHandle, Transport};
use crate::status::raw;
use crate::types::{ChannelType, Mode};

/// What a successful receive hands back.
#[derive(Debug, Clone)]
pub(crate) enum Delivery {
    Payload(Vec<u8>),
    /// Null data with a non-zero size; the copy step must fail.
    Corrupt,
}

pub(crate) struct ScriptedTransport {
    pub create_ok: AtomicBool,
    pub connect_code: AtomicI32,
    pub disconnect_code: AtomicI32,
    pub send_code: AtomicI32,
    pub try_send_code: AtomicI32,
    pub recv_code: AtomicI32,
    pub try_recv_code: AtomicI32,
    pub receiver_count: AtomicI32,
    pub wait_code: AtomicI32,
    pub delivery: Mutex<Delivery>,

    pub created: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub connects: AtomicUsize,
    pub disconnects: AtomicUsize,
    pub freed: AtomicUsize,
    pub cleared: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            create_ok: AtomicBool::new(true),
            connect_code: AtomicI32::new(raw::SUCCESS),
            disconnect_code: AtomicI32::new(raw::SUCCESS),
            send_code: AtomicI32::new(raw::SUCCESS),
            try_send_code: AtomicI32::new(raw::SUCCESS),
            recv_code: AtomicI32::new(raw::SUCCESS),
            try_recv_code: AtomicI32::new(raw::SUCCESS),
            receiver_count: AtomicI32::new(0),
            wait_code: AtomicI32::new(raw::WAIT_REACHED),
            delivery: Mutex::new(Delivery::Payload(Vec::new())),
            created: AtomicUsize::new(0),
            destroyed: AtomicUsize::new(0),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
            freed: AtomicUsize::new(0),
            cleared: Mutex::new(Vec::new()),
        }
    }

    pub fn set(code: &AtomicI32, value: i32) {
        code.store(value, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn fill(&self, buffer: &mut RawBuffer) {
        let delivery = self.delivery.lock().unwrap().clone();
        match delivery {
            Delivery::Payload(bytes) => {
                let bytes = Box::new(bytes);
                buffer.data = bytes.as_ptr() as *mut c_void;
                buffer.size = bytes.len();
                buffer.ctx = Box::into_raw(bytes) as *mut c_void;
            }
            Delivery::Corrupt => {
                buffer.data = std::ptr::null_mut();
                buffer.size = 16;
                buffer.ctx = std::ptr::null_mut();
            }
        }
        buffer.free_fn = Some(release);
    }
}

unsafe extern "C" fn release(_data: *mut c_void, ctx: *mut c_void) {
    if !ctx.is_null() {
        drop(Box::from_raw(ctx as *mut Vec<u8>));
    }
}

impl Transport for ScriptedTransport {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn create(&self, _channel_type: ChannelType, _name: &CStr, _mode: Mode) -> Option<RawHandle> {
        if !self.create_ok.load(Ordering::SeqCst) {
            return None;
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        RawHandle::from_ptr(Box::into_raw(Box::new(0u8)) as *mut c_void)
    }

    unsafe fn destroy(&self, handle: RawHandle) {
        drop(Box::from_raw(handle.as_ptr() as *mut u8));
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    unsafe fn connect(&self, _handle: RawHandle, _mode: Mode) -> i32 {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.connect_code.load(Ordering::SeqCst)
    }

    unsafe fn disconnect(&self, _handle: RawHandle) -> i32 {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.disconnect_code.load(Ordering::SeqCst)
    }

    unsafe fn send(&self, _handle: RawHandle, _data: &[u8], _timeout_ms: u64) -> i32 {
        self.send_code.load(Ordering::SeqCst)
    }

    unsafe fn try_send(&self, _handle: RawHandle, _data: &[u8], _timeout_ms: u64) -> i32 {
        self.try_send_code.load(Ordering::SeqCst)
    }

    unsafe fn recv(&self, _handle: RawHandle, buffer: &mut RawBuffer, _timeout_ms: u64) -> i32 {
        let code = self.recv_code.load(Ordering::SeqCst);
        if code == raw::SUCCESS {
            self.fill(buffer);
        }
        code
    }

    unsafe fn try_recv(&self, _handle: RawHandle, buffer: &mut RawBuffer) -> i32 {
        let code = self.try_recv_code.load(Ordering::SeqCst);
        if code == raw::SUCCESS {
            self.fill(buffer);
        }
        code
    }

    unsafe fn free_buffer(&self, buffer: &mut RawBuffer) {
        if let Some(free_fn) = buffer.free_fn.take() {
            free_fn(buffer.data, buffer.ctx);
        }
        self.freed.fetch_add(1, Ordering::SeqCst);
        *buffer = RawBuffer::empty();
    }

    unsafe fn receiver_count(&self, _handle: RawHandle) -> i32 {
        self.receiver_count.load(Ordering::SeqCst)
    }

    unsafe fn wait_for_receivers(
        &self,
        _handle: RawHandle,
        _count: usize,
        _timeout_ms: u64,
    ) -> i32 {
        self.wait_code.load(Ordering::SeqCst)
    }

    fn clear_storage(&self, name: &CStr) {
        self.cleared
            .lock()
            .unwrap()
            .push(name.to_string_lossy().into_owned());
    }
}
