// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! shmchan CLI
//!
//! Command-line interface for shmchan shared-memory channels.

use clap::{Parser, Subcommand, ValueEnum};

mod binding;
mod commands;
mod error;

/// shmchan - Typed channels over shared memory
#[derive(Parser)]
#[command(name = "shmchan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Channel configuration file path
    #[arg(short, long, default_value = "shmchan.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Transport binding to use
    #[arg(short, long, value_enum, default_value_t = TransportKind::for_build())]
    pub transport: TransportKind,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// In-process transport (only accepted by `demo`)
    Memory,
    /// Native libipc shared memory (requires the `native` feature)
    Native,
}

impl TransportKind {
    /// Native when this build links libipc, otherwise the in-process transport.
    pub const fn for_build() -> Self {
        if cfg!(feature = "native") {
            Self::Native
        } else {
            Self::Memory
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message
    Send {
        /// Channel name
        channel: String,

        /// Message text
        message: String,

        /// Send timeout in milliseconds (0 = transport default)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Never force-push; report if the message was not delivered
        #[arg(long)]
        no_push: bool,
    },

    /// Receive messages
    Recv {
        /// Channel name
        channel: String,

        /// Number of messages to receive
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Receive timeout in milliseconds (0 = transport default)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Clear storage left behind for a channel
    Clear {
        /// Channel name
        channel: String,
    },

    /// Show or wait for the receiver count of a channel
    Receivers {
        /// Channel name
        channel: String,

        /// Wait until at least this many receivers are connected
        #[arg(long)]
        wait: Option<usize>,

        /// Wait timeout in milliseconds (0 = transport default)
        #[arg(long, default_value_t = 0)]
        timeout_ms: u64,
    },

    /// Run a threaded sender/receiver demo over one transport binding
    Demo {
        /// Channel name
        #[arg(long, default_value = "test_channel")]
        channel: String,

        /// Number of messages
        #[arg(short = 'n', long, default_value_t = 5)]
        messages: usize,
    },

    /// Validate a channel configuration file
    Validate {
        /// Path to the configuration file
        file: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Send {
            channel,
            message,
            timeout_ms,
            no_push,
        } => {
            let (config, transport) = binding::prepare(&cli.config, cli.transport, "send")?;
            commands::send::execute(transport, &config, &channel, &message, timeout_ms, no_push)
        }
        Commands::Recv {
            channel,
            count,
            timeout_ms,
        } => {
            let (config, transport) = binding::prepare(&cli.config, cli.transport, "recv")?;
            commands::recv::execute(transport, &config, &channel, count, timeout_ms)
        }
        Commands::Clear { channel } => {
            commands::clear::execute(binding::shared(cli.transport, "clear")?, &channel)
        }
        Commands::Receivers {
            channel,
            wait,
            timeout_ms,
        } => {
            let (config, transport) = binding::prepare(&cli.config, cli.transport, "receivers")?;
            commands::receivers::execute(transport, &config, &channel, wait, timeout_ms)
        }
        Commands::Demo { channel, messages } => {
            commands::demo::execute(binding::init(cli.transport)?, &channel, messages)
        }
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
