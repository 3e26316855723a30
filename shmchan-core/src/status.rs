// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport status taxonomy.
//!
//! Every raw code returned by a transport call is mapped through [`Status`]
//! before any decision is made. Raw codes never leave the channel layer.

use std::fmt;

use crate::error::ChannelError;

/// Raw status codes of the libipc C API.
pub mod raw {
    pub const SUCCESS: i32 = 0;
    pub const ERROR_INVALID_ARGUMENT: i32 = -1;
    pub const ERROR_CONNECTION_FAILED: i32 = -2;
    pub const ERROR_SEND_FAILED: i32 = -3;
    pub const ERROR_RECEIVE_FAILED: i32 = -4;
    pub const ERROR_TIMEOUT: i32 = -5;
    pub const ERROR_MEMORY: i32 = -6;

    /// `ipc_channel_wait_for_recv`: receiver count reached.
    pub const WAIT_REACHED: i32 = 1;
    /// `ipc_channel_wait_for_recv`: not reached within the timeout.
    pub const WAIT_NOT_REACHED: i32 = 0;
}

/// Outcome of a transport operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    InvalidArgument,
    ConnectionFailed,
    SendFailed,
    ReceiveFailed,
    Timeout,
    MemoryError,
    /// A code outside the known set. The transport is an external boundary
    /// and may grow new codes.
    Unknown(i32),
}

impl Status {
    /// Map a raw transport code.
    pub const fn from_raw(code: i32) -> Self {
        match code {
            raw::SUCCESS => Self::Success,
            raw::ERROR_INVALID_ARGUMENT => Self::InvalidArgument,
            raw::ERROR_CONNECTION_FAILED => Self::ConnectionFailed,
            raw::ERROR_SEND_FAILED => Self::SendFailed,
            raw::ERROR_RECEIVE_FAILED => Self::ReceiveFailed,
            raw::ERROR_TIMEOUT => Self::Timeout,
            raw::ERROR_MEMORY => Self::MemoryError,
            other => Self::Unknown(other),
        }
    }

    /// The raw code this status was mapped from.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Success => raw::SUCCESS,
            Self::InvalidArgument => raw::ERROR_INVALID_ARGUMENT,
            Self::ConnectionFailed => raw::ERROR_CONNECTION_FAILED,
            Self::SendFailed => raw::ERROR_SEND_FAILED,
            Self::ReceiveFailed => raw::ERROR_RECEIVE_FAILED,
            Self::Timeout => raw::ERROR_TIMEOUT,
            Self::MemoryError => raw::ERROR_MEMORY,
            Self::Unknown(code) => *code,
        }
    }

    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InvalidArgument => "Invalid argument",
            Self::ConnectionFailed => "Connection failed",
            Self::SendFailed => "Send failed",
            Self::ReceiveFailed => "Receive failed",
            Self::Timeout => "Timeout",
            Self::MemoryError => "Memory error",
            Self::Unknown(_) => "Unknown error",
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Convert into a `Result`, attaching `context` to any failure.
    pub fn check(self, context: impl Into<String>) -> Result<(), ChannelError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ChannelError::from_status(self, context))
        }
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Self::from_raw(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}
