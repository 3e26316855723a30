// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI error types.

use shmchan_core::{ChannelError, IpcError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Transport '{0}' is not available in this build (enable the `native` feature)")]
    TransportUnavailable(&'static str),

    #[error(
        "`{command}` needs a transport shared between processes; \
         the in-process transport only serves `demo` (use --transport native)"
    )]
    InProcessOnly { command: &'static str },

    #[error("Message not delivered: '{channel}' timed out")]
    NotDelivered { channel: String },

    #[error("Timed out waiting for {target} receiver(s) on '{channel}'")]
    ReceiversNotReached { channel: String, target: usize },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Ipc(#[from] IpcError),
}
