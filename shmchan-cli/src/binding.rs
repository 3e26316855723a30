// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Transport selection and configuration loading for CLI commands.

use std::path::Path;
use std::sync::Arc;

use shmchan_core::{Config, ConfigLoader, MemoryTransport, Transport};

use crate::error::CliError;
use crate::TransportKind;

/// Create the process-wide transport binding.
pub fn init(kind: TransportKind) -> Result<Arc<dyn Transport>, CliError> {
    match kind {
        TransportKind::Memory => {
            tracing::debug!("Using in-process transport");
            Ok(MemoryTransport::shared())
        }
        #[cfg(feature = "native")]
        TransportKind::Native => Ok(shmchan_core::NativeTransport::init()),
        #[cfg(not(feature = "native"))]
        TransportKind::Native => Err(CliError::TransportUnavailable("native")),
    }
}

/// Transport for `command`, which talks to other processes.
///
/// The in-process transport is refused: nothing outside this process can
/// see its channels.
pub fn shared(kind: TransportKind, command: &'static str) -> Result<Arc<dyn Transport>, CliError> {
    if kind == TransportKind::Memory {
        return Err(CliError::InProcessOnly { command });
    }
    init(kind)
}

/// Load `path` if it exists; otherwise every channel uses the built-in defaults.
pub fn load_config(path: &str) -> Result<Config, CliError> {
    if !Path::new(path).exists() {
        tracing::debug!(config = %path, "No configuration file, using defaults");
        return Ok(Config::default());
    }

    Ok(ConfigLoader::load_file(path)?)
}

/// Configuration and shared transport for commands that open channels.
pub fn prepare(
    path: &str,
    kind: TransportKind,
    command: &'static str,
) -> Result<(Config, Arc<dyn Transport>), CliError> {
    let transport = shared(kind, command)?;
    let config = load_config(path)?;
    Ok((config, transport))
}
