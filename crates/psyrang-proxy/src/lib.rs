#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod error;
pub mod models;
pub mod server;

pub use error::ApiError;
pub use server::{API_PATH, FUNCTION_PATH, MAX_BODY_BYTES, create_router, serve};

// Silence unused dev-dependency warnings
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use psyrang_gemini as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;
