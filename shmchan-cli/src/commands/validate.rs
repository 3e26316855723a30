// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmchan validate` command - Validate a channel configuration file.

use shmchan_core::ConfigLoader;

pub fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Defaults:");
            println!("  Channel Type: {}", config.defaults.channel_type);
            println!("  Send Timeout: {}", config.defaults.send_timeout);
            println!("  Recv Timeout: {}", config.defaults.recv_timeout);
            println!();
            println!("Channels ({}):", config.channels.len());
            for channel in &config.channels {
                println!(
                    "  - {} ({}, mode: {}, send: {}, recv: {})",
                    channel.name,
                    channel.channel_type,
                    channel.mode,
                    channel.send_timeout,
                    channel.recv_timeout
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
