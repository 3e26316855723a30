// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command modules.

pub mod clear;
pub mod demo;
pub mod receivers;
pub mod recv;
pub mod send;
pub mod validate;
