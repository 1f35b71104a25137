// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! # infrascope - Infrastructure Configuration Analyzer
//!
//! `infrascope` ingests JSON or YAML infrastructure descriptions, normalizes
//! them into services, databases and environment variables, and reports on
//! what it found.
//!
//! ## Features
//!
//! - **Format detection** - Extension first, content sniffing second
//! - **Lenient decoding** - JSON or YAML, whichever actually parses
//! - **Normalization** - Many dialects mapped onto one canonical shape
//! - **Structure check** - Confidence that a file is infrastructure at all
//! - **Metadata** - Complexity, nesting and credential-looking keys
//! - **Diagrams** - Mermaid or DOT output of services and their stores
//!
//! ## Quick Start
//!
//! ```bash
//! # Analyze a compose file
//! infrascope analyze docker-compose.yml
//!
//! # Diagram it
//! infrascope graph docker-compose.yml
//!
//! # Export the normalized form
//! infrascope export docker-compose.yml --kind canonical
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod diagram;
pub mod errors;
pub mod model;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use analyzer::{InfraAnalyzer, IngestReport};
pub use config::Settings;
pub use errors::{InfraError, InfraResult};
pub use model::{CanonicalInfra, Database, Service};
pub use tree::RawTree;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
