#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultGeminiClient is meant to be used through the GenerativeApiPort
// trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultGeminiClient;

// Configuration
pub use config::{DEFAULT_ENDPOINT, GeminiClientConfig};

// Errors
pub use error::{GeminiError, GeminiResult};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
