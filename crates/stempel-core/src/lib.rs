// SPDX-License-Identifier: MIT
//
// Stempel — Core types, errors, and configuration shared across all crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::ProcessorConfig;
pub use error::StempelError;
pub use types::*;
