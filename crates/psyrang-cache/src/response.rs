//! Asset responses as fetched from the network and held in a store.

/// A fetched or cached asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    /// Absolute URL the asset was fetched from.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// Create a 200 response.
    pub fn ok(url: impl Into<String>, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            content_type: content_type.map(ToString::to_string),
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
