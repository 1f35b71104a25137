// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Utility modules
//!
//! Common utilities for the infrascope CLI.

pub mod colors;

pub use colors::*;
