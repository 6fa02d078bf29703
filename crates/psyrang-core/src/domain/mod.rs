//! Domain types for the proxy.

pub mod request;
pub mod result;

pub use request::{InboundRequest, ResponseMode};
pub use result::NormalizedResult;
