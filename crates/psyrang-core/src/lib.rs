#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod decode;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use decode::{DecodeError, FenceStripper, ShapeCheck, TextNormalizer, decode_structured};
pub use domain::{InboundRequest, NormalizedResult, ResponseMode};
pub use error::{
    ErrorClass, INVALID_UPSTREAM_MESSAGE, MISSING_API_KEY_MESSAGE, ProxyError,
    UNEXPECTED_FORMAT_MESSAGE,
};
pub use ports::{
    GenerateContentRequest, GenerateContentResponse, GenerativeApiPort, UpstreamError,
};
pub use services::{ALLOWED_METHOD, ProxyService, RawRequest};
pub use settings::{
    API_KEY_ENV, ApiKey, DEFAULT_PROXY_PORT, ENDPOINT_ENV, PORT_ENV, ProxyConfig,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio as _;
#[cfg(test)]
use tokio_test as _;
