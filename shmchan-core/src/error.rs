// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for shmchan.
//!
//! Explicit enum error types only. No `Box<dyn Error>`, no `anyhow::Result`.
//! Every transport failure carries the raw numeric status code.

use std::path::PathBuf;

use thiserror::Error;

use crate::status::Status;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum IpcError {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by channel lifecycle and transfer operations.
///
/// One variant per status in the taxonomy, plus `InvalidState` for calls
/// made against a released handle.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Invalid state: channel '{channel}' is {state}")]
    InvalidState {
        channel: String,
        state: &'static str,
    },

    #[error("Invalid argument ({code}): {context}")]
    InvalidArgument { code: i32, context: String },

    #[error("Connection failed ({code}): {context}")]
    ConnectionFailed { code: i32, context: String },

    #[error("Send failed ({code}): {context}")]
    SendFailed { code: i32, context: String },

    #[error("Receive failed ({code}): {context}")]
    ReceiveFailed { code: i32, context: String },

    #[error("Timeout ({code}): {context}")]
    Timeout { code: i32, context: String },

    #[error("Memory error ({code}): {context}")]
    Memory { code: i32, context: String },

    #[error("Unknown error ({code}): {context}")]
    Unknown { code: i32, context: String },
}

impl ChannelError {
    /// Build the error matching a non-success transport status.
    pub fn from_status(status: Status, context: impl Into<String>) -> Self {
        let context = context.into();
        let code = status.code();
        match status {
            Status::InvalidArgument => Self::InvalidArgument { code, context },
            Status::ConnectionFailed => Self::ConnectionFailed { code, context },
            Status::SendFailed => Self::SendFailed { code, context },
            Status::ReceiveFailed => Self::ReceiveFailed { code, context },
            Status::Timeout => Self::Timeout { code, context },
            Status::MemoryError => Self::Memory { code, context },
            // Success carries no error; reaching here is a protocol violation.
            Status::Success | Status::Unknown(_) => Self::Unknown { code, context },
        }
    }

    pub(crate) fn invalid_argument(context: impl Into<String>) -> Self {
        Self::from_status(Status::InvalidArgument, context)
    }

    pub(crate) fn connection_failed(context: impl Into<String>) -> Self {
        Self::from_status(Status::ConnectionFailed, context)
    }

    pub(crate) fn memory(context: impl Into<String>) -> Self {
        Self::from_status(Status::MemoryError, context)
    }

    /// The transport status behind this error, if any.
    pub fn status(&self) -> Option<Status> {
        self.code().map(Status::from_raw)
    }

    /// The raw numeric status code. `None` for `InvalidState`, which is
    /// detected locally and never reported by the transport.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::InvalidState { .. } => None,
            Self::InvalidArgument { code, .. }
            | Self::ConnectionFailed { code, .. }
            | Self::SendFailed { code, .. }
            | Self::ReceiveFailed { code, .. }
            | Self::Timeout { code, .. }
            | Self::Memory { code, .. }
            | Self::Unknown { code, .. } => Some(*code),
        }
    }

    /// Human-readable label of the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "Invalid state",
            Self::Unknown { .. } => "Unknown error",
            other => other
                .status()
                .map(|s| s.label())
                .unwrap_or("Unknown error"),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

/// Configuration errors. Any invalid field prevents the channel set from loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate channel name: {name}")]
    DuplicateChannel { name: String },

    #[error("Channel not configured: {name}")]
    UnknownChannel { name: String },
}

/// Result type alias using IpcError.
pub type IpcResult<T> = Result<T, IpcError>;
