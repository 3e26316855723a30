// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! In-process broadcast transport.
//!
//! Implements the libipc status-code contract on the heap so channels can be
//! exercised without the native library. Storage is keyed by channel name;
//! every connected receiver owns a bounded inbox and a sender never receives
//! its own messages. `send` fails when no other receiver is connected;
//! `try_send` waits for one until its timeout.
//!
//! Transport defaults for a raw timeout of `0`:
//! - `send` / `try_send`: [`DEFAULT_SEND_TIMEOUT_MS`]
//! - `recv` / `wait_for_receivers`: wait forever

use std::collections::{HashMap, VecDeque};
use std::ffi::{c_void, CStr};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::{RawBuffer, RawHandle, Transport};
use crate::status::raw;
use crate::types::{ChannelType, Mode, Timeout};

/// Messages buffered per receiver before senders must wait.
pub const INBOX_CAPACITY: usize = 255;

/// Send timeout applied when the caller defers to the transport.
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 100;

/// Shared storage behind one channel name.
struct ChannelCore {
    channel_type: ChannelType,
    state: Mutex<CoreState>,
    changed: Condvar,
}

#[derive(Default)]
struct CoreState {
    senders: usize,
    inboxes: HashMap<u64, VecDeque<Vec<u8>>>,
}

impl ChannelCore {
    fn new(channel_type: ChannelType) -> Self {
        Self {
            channel_type,
            state: Mutex::new(CoreState::default()),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn attach(&self, id: u64, mode: Mode) -> bool {
        let mut state = self.lock();
        if mode.is_sender() {
            if self.channel_type == ChannelType::Route && state.senders > 0 {
                return false;
            }
            state.senders += 1;
        }
        if mode.is_receiver() {
            state.inboxes.insert(id, VecDeque::new());
        }
        self.changed.notify_all();
        true
    }

    fn detach(&self, id: u64, mode: Mode) {
        let mut state = self.lock();
        if mode.is_sender() {
            state.senders = state.senders.saturating_sub(1);
        }
        if mode.is_receiver() {
            state.inboxes.remove(&id);
        }
        self.changed.notify_all();
    }

    /// Wait for a state change. Returns `true` once `deadline` has passed.
    fn wait<'a>(
        &self,
        guard: MutexGuard<'a, CoreState>,
        deadline: Option<Instant>,
    ) -> (MutexGuard<'a, CoreState>, bool) {
        match deadline {
            None => (
                self.changed
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner),
                false,
            ),
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return (guard, true);
                }
                let (guard, _) = self
                    .changed
                    .wait_timeout(guard, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner);
                (guard, false)
            }
        }
    }
}

impl CoreState {
    fn targets(&mut self, sender: u64) -> impl Iterator<Item = &mut VecDeque<Vec<u8>>> {
        self.inboxes
            .iter_mut()
            .filter(move |(id, _)| **id != sender)
            .map(|(_, inbox)| inbox)
    }

    fn has_targets(&self, sender: u64) -> bool {
        self.inboxes.keys().any(|id| *id != sender)
    }

    fn all_have_space(&self, sender: u64) -> bool {
        self.inboxes
            .iter()
            .filter(|(id, _)| **id != sender)
            .all(|(_, inbox)| inbox.len() < INBOX_CAPACITY)
    }

    /// Deliver to every receiver except `sender`, evicting the oldest message
    /// of any full inbox.
    fn broadcast(&mut self, sender: u64, data: &[u8]) {
        for inbox in self.targets(sender) {
            if inbox.len() >= INBOX_CAPACITY {
                inbox.pop_front();
            }
            inbox.push_back(data.to_vec());
        }
    }
}

/// Per-handle state. Boxed and handed to callers as a [`RawHandle`].
struct Endpoint {
    id: u64,
    core: Arc<ChannelCore>,
    /// Current association. `None` while disconnected.
    mode: Mutex<Option<Mode>>,
}

impl Endpoint {
    fn mode(&self) -> Option<Mode> {
        *self.mode.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Heap-backed transport with libipc semantics.
pub struct MemoryTransport {
    registry: DashMap<String, Arc<ChannelCore>>,
    next_endpoint: AtomicU64,
    live_handles: AtomicUsize,
    destroyed_handles: AtomicUsize,
    lent_buffers: AtomicUsize,
    released_buffers: AtomicUsize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            registry: DashMap::new(),
            next_endpoint: AtomicU64::new(1),
            live_handles: AtomicUsize::new(0),
            destroyed_handles: AtomicUsize::new(0),
            lent_buffers: AtomicUsize::new(0),
            released_buffers: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor for injection into channels.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Handles created and not yet destroyed.
    pub fn live_handles(&self) -> usize {
        self.live_handles.load(Ordering::Acquire)
    }

    /// Total handles destroyed.
    pub fn destroyed_handles(&self) -> usize {
        self.destroyed_handles.load(Ordering::Acquire)
    }

    /// Receive buffers lent out and not yet released.
    ///
    /// A snapshot: concurrent receives may move either counter between reads.
    pub fn outstanding_buffers(&self) -> usize {
        // Released first: a buffer is always lent before it is released.
        let released = self.released_buffers.load(Ordering::Acquire);
        let lent = self.lent_buffers.load(Ordering::Acquire);
        lent.saturating_sub(released)
    }

    /// Total receive buffers released.
    pub fn released_buffers(&self) -> usize {
        self.released_buffers.load(Ordering::Acquire)
    }

    /// Channel names with live storage.
    pub fn channel_count(&self) -> usize {
        self.registry.len()
    }

    /// # Safety
    /// `handle` must be a live handle created by this transport.
    unsafe fn endpoint<'a>(&self, handle: RawHandle) -> &'a Endpoint {
        &*(handle.as_ptr() as *const Endpoint)
    }

    fn deadline(timeout_ms: u64, default: Timeout) -> Option<Instant> {
        let timeout = match Timeout::from_millis(timeout_ms) {
            Timeout::TransportDefault => default,
            other => other,
        };
        match timeout {
            Timeout::Millis(ms) => Some(Instant::now() + Duration::from_millis(ms)),
            Timeout::TransportDefault | Timeout::Forever => None,
        }
    }

    fn lend(&self, payload: Vec<u8>, buffer: &mut RawBuffer) {
        let payload = Box::new(payload);
        buffer.data = payload.as_ptr() as *mut c_void;
        buffer.size = payload.len();
        buffer.free_fn = Some(release_payload);
        buffer.ctx = Box::into_raw(payload) as *mut c_void;
        self.lent_buffers.fetch_add(1, Ordering::AcqRel);
    }

    fn receive(
        &self,
        endpoint: &Endpoint,
        buffer: &mut RawBuffer,
        deadline: Option<Instant>,
    ) -> i32 {
        if !endpoint.mode().is_some_and(|m| m.is_receiver()) {
            return raw::ERROR_RECEIVE_FAILED;
        }

        let core = &endpoint.core;
        let mut state = core.lock();
        loop {
            let Some(inbox) = state.inboxes.get_mut(&endpoint.id) else {
                return raw::ERROR_RECEIVE_FAILED;
            };
            if let Some(message) = inbox.pop_front() {
                core.changed.notify_all();
                drop(state);
                self.lend(message, buffer);
                return raw::SUCCESS;
            }
            let (guard, expired) = core.wait(state, deadline);
            state = guard;
            if expired {
                return raw::ERROR_TIMEOUT;
            }
        }
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

unsafe extern "C" fn release_payload(_data: *mut c_void, ctx: *mut c_void) {
    if !ctx.is_null() {
        // SAFETY: ctx was produced by Box::into_raw in `lend`
        drop(Box::from_raw(ctx as *mut Vec<u8>));
    }
}

impl Transport for MemoryTransport {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create(&self, channel_type: ChannelType, name: &CStr, mode: Mode) -> Option<RawHandle> {
        let name = name.to_string_lossy().into_owned();
        let core = self
            .registry
            .entry(name.clone())
            .or_insert_with(|| Arc::new(ChannelCore::new(channel_type)))
            .clone();

        if core.channel_type != channel_type {
            tracing::debug!(
                channel = %name,
                existing = %core.channel_type,
                requested = %channel_type,
                "Channel type mismatch"
            );
            return None;
        }

        let id = self.next_endpoint.fetch_add(1, Ordering::AcqRel);
        if !core.attach(id, mode) {
            tracing::debug!(channel = %name, mode = %mode, "Route already has a sender");
            return None;
        }

        let endpoint = Box::new(Endpoint {
            id,
            core,
            mode: Mutex::new(Some(mode)),
        });
        self.live_handles.fetch_add(1, Ordering::AcqRel);
        RawHandle::from_ptr(Box::into_raw(endpoint) as *mut c_void)
    }

    unsafe fn destroy(&self, handle: RawHandle) {
        let endpoint = Box::from_raw(handle.as_ptr() as *mut Endpoint);
        if let Some(mode) = endpoint.mode() {
            endpoint.core.detach(endpoint.id, mode);
        }
        self.live_handles.fetch_sub(1, Ordering::AcqRel);
        self.destroyed_handles.fetch_add(1, Ordering::AcqRel);
    }

    unsafe fn connect(&self, handle: RawHandle, mode: Mode) -> i32 {
        let endpoint = self.endpoint(handle);
        let mut current = endpoint.mode.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            endpoint.core.detach(endpoint.id, previous);
        }
        if !endpoint.core.attach(endpoint.id, mode) {
            return raw::ERROR_CONNECTION_FAILED;
        }
        *current = Some(mode);
        raw::SUCCESS
    }

    unsafe fn disconnect(&self, handle: RawHandle) -> i32 {
        let endpoint = self.endpoint(handle);
        let mut current = endpoint.mode.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            endpoint.core.detach(endpoint.id, previous);
        }
        raw::SUCCESS
    }

    unsafe fn send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32 {
        let endpoint = self.endpoint(handle);
        if !endpoint.mode().is_some_and(|m| m.is_sender()) {
            return raw::ERROR_SEND_FAILED;
        }

        let deadline = Self::deadline(timeout_ms, Timeout::Millis(DEFAULT_SEND_TIMEOUT_MS));
        let core = &endpoint.core;
        let mut state = core.lock();
        loop {
            if !state.has_targets(endpoint.id) {
                return raw::ERROR_SEND_FAILED;
            }
            if state.all_have_space(endpoint.id) {
                break;
            }
            let (guard, expired) = core.wait(state, deadline);
            state = guard;
            if expired {
                // Force-push past the timeout.
                break;
            }
        }
        state.broadcast(endpoint.id, data);
        core.changed.notify_all();
        raw::SUCCESS
    }

    unsafe fn try_send(&self, handle: RawHandle, data: &[u8], timeout_ms: u64) -> i32 {
        let endpoint = self.endpoint(handle);
        if !endpoint.mode().is_some_and(|m| m.is_sender()) {
            return raw::ERROR_SEND_FAILED;
        }

        let deadline = Self::deadline(timeout_ms, Timeout::Millis(DEFAULT_SEND_TIMEOUT_MS));
        let core = &endpoint.core;
        let mut state = core.lock();
        loop {
            if state.has_targets(endpoint.id) && state.all_have_space(endpoint.id) {
                state.broadcast(endpoint.id, data);
                core.changed.notify_all();
                return raw::SUCCESS;
            }
            let (guard, expired) = core.wait(state, deadline);
            state = guard;
            if expired {
                return raw::ERROR_TIMEOUT;
            }
        }
    }

    unsafe fn recv(&self, handle: RawHandle, buffer: &mut RawBuffer, timeout_ms: u64) -> i32 {
        let endpoint = self.endpoint(handle);
        let deadline = Self::deadline(timeout_ms, Timeout::Forever);
        self.receive(endpoint, buffer, deadline)
    }

    unsafe fn try_recv(&self, handle: RawHandle, buffer: &mut RawBuffer) -> i32 {
        let endpoint = self.endpoint(handle);
        // A deadline in the past checks the inbox once without waiting.
        self.receive(endpoint, buffer, Some(Instant::now()))
    }

    unsafe fn free_buffer(&self, buffer: &mut RawBuffer) {
        if let Some(free_fn) = buffer.free_fn.take() {
            free_fn(buffer.data, buffer.ctx);
            self.released_buffers.fetch_add(1, Ordering::AcqRel);
        }
        *buffer = RawBuffer::empty();
    }

    unsafe fn receiver_count(&self, handle: RawHandle) -> i32 {
        let endpoint = self.endpoint(handle);
        let count = endpoint.core.lock().inboxes.len();
        i32::try_from(count).unwrap_or(i32::MAX)
    }

    unsafe fn wait_for_receivers(&self, handle: RawHandle, count: usize, timeout_ms: u64) -> i32 {
        let endpoint = self.endpoint(handle);
        let deadline = Self::deadline(timeout_ms, Timeout::Forever);
        let core = &endpoint.core;
        let mut state = core.lock();
        loop {
            if state.inboxes.len() >= count {
                return raw::WAIT_REACHED;
            }
            let (guard, expired) = core.wait(state, deadline);
            state = guard;
            if expired {
                return raw::WAIT_NOT_REACHED;
            }
        }
    }

    fn clear_storage(&self, name: &CStr) {
        let name = name.to_string_lossy();
        if self.registry.remove(name.as_ref()).is_some() {
            tracing::debug!(channel = %name, "Cleared channel storage");
        }
    }
}
