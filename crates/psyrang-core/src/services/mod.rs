//! Application services built on top of the ports.

pub mod proxy;

pub use proxy::{ALLOWED_METHOD, ProxyService, RawRequest};
