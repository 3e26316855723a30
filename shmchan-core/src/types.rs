// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated channel inputs.
//!
//! All types validate their invariants at creation time, so anything that
//! reaches the transport boundary is already well-formed.

use std::ffi::CString;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Maximum channel name length in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Validated channel name shared across cooperating processes.
/// Non-empty, at most [`MAX_NAME_LEN`] bytes, no interior NUL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Create a new ChannelName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ChannelError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ChannelError::invalid_argument(
                "Channel name cannot be empty",
            ));
        }

        if name.len() > MAX_NAME_LEN {
            return Err(ChannelError::invalid_argument(format!(
                "Channel name too long: {} bytes (max {})",
                name.len(),
                MAX_NAME_LEN
            )));
        }

        if name.contains('\0') {
            return Err(ChannelError::invalid_argument(
                "Channel name must not contain NUL bytes",
            ));
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// C string form for the transport boundary.
    pub fn to_c_string(&self) -> CString {
        // Interior NULs are rejected in `new`, so this cannot fail.
        CString::new(self.0.as_bytes()).unwrap_or_default()
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ChannelName {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ChannelName {
    type Error = ChannelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChannelName> for String {
    fn from(name: ChannelName) -> Self {
        name.0
    }
}

/// Delivery topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// Single producer, multiple consumers, broadcast.
    Route,
    /// Multiple producers, multiple consumers, broadcast.
    #[default]
    Channel,
}

impl ChannelType {
    /// Raw value passed to `ipc_channel_create`.
    pub const fn raw(&self) -> i32 {
        match self {
            Self::Route => 0,
            Self::Channel => 1,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ChannelType {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "route" => Ok(Self::Route),
            "channel" => Ok(Self::Channel),
            other => Err(ChannelError::invalid_argument(format!(
                "Unknown channel type '{}' (expected route or channel)",
                other
            ))),
        }
    }
}

/// Connection capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mode(u8);

impl Mode {
    pub const SENDER: Mode = Mode(1);
    pub const RECEIVER: Mode = Mode(2);
    pub const DUPLEX: Mode = Mode(1 | 2);

    /// Build from raw flag bits. Rejects empty and unknown bits.
    pub fn from_bits(bits: u8) -> Result<Self, ChannelError> {
        if bits == 0 || bits & !Self::DUPLEX.0 != 0 {
            return Err(ChannelError::invalid_argument(format!(
                "Invalid connection mode bits: {:#04x}",
                bits
            )));
        }
        Ok(Self(bits))
    }

    /// Raw value passed to the transport.
    pub const fn raw(&self) -> i32 {
        self.0 as i32
    }

    pub const fn contains(&self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_sender(&self) -> bool {
        self.contains(Self::SENDER)
    }

    pub const fn is_receiver(&self) -> bool {
        self.contains(Self::RECEIVER)
    }

    pub const fn name(&self) -> &'static str {
        match self.0 {
            1 => "sender",
            2 => "receiver",
            _ => "duplex",
        }
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mode: Option<Mode> = None;
        for part in s.split('|').map(str::trim) {
            let flag = match part.to_ascii_lowercase().as_str() {
                "sender" => Self::SENDER,
                "receiver" => Self::RECEIVER,
                "duplex" => Self::DUPLEX,
                other => {
                    return Err(ChannelError::invalid_argument(format!(
                        "Unknown connection mode '{}'",
                        other
                    )))
                }
            };
            mode = Some(mode.map_or(flag, |m| m | flag));
        }
        mode.ok_or_else(|| ChannelError::invalid_argument("Empty connection mode"))
    }
}

impl TryFrom<String> for Mode {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.name().to_string()
    }
}

/// How long a blocking transport call may wait.
///
/// The raw C API overloads `0` as "transport default"; this type keeps that
/// marker distinct from a real duration and from waiting indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeout {
    /// Let the transport choose (raw `0`).
    #[default]
    TransportDefault,
    /// Wait at most this many milliseconds. Never zero.
    Millis(u64),
    /// Block until the operation completes (raw `u64::MAX`).
    Forever,
}

impl Timeout {
    /// Raw value meaning "block indefinitely" in libipc.
    pub const RAW_FOREVER: u64 = u64::MAX;

    /// `0` maps to [`Timeout::TransportDefault`], `u64::MAX` to [`Timeout::Forever`].
    pub const fn from_millis(ms: u64) -> Self {
        match ms {
            0 => Self::TransportDefault,
            Self::RAW_FOREVER => Self::Forever,
            ms => Self::Millis(ms),
        }
    }

    /// Sub-millisecond durations round up so they never collapse into the
    /// transport default.
    pub fn from_duration(duration: Duration) -> Self {
        let ms = duration.as_millis();
        if ms == 0 && !duration.is_zero() {
            Self::Millis(1)
        } else {
            Self::from_millis(u64::try_from(ms).unwrap_or(Self::RAW_FOREVER))
        }
    }

    /// Value passed across the transport boundary.
    pub const fn as_raw_ms(&self) -> u64 {
        match self {
            Self::TransportDefault => 0,
            Self::Millis(ms) => *ms,
            Self::Forever => Self::RAW_FOREVER,
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportDefault => write!(f, "default"),
            Self::Millis(ms) => write!(f, "{}ms", ms),
            Self::Forever => write!(f, "forever"),
        }
    }
}
