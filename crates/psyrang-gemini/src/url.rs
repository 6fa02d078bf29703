//! URL construction for the `generateContent` call.

use psyrang_core::ApiKey;
use url::Url;

/// Query parameter carrying the credential.
const KEY_PARAM: &str = "key";

/// Append the credential to the endpoint as a query parameter.
pub fn build_generate_url(endpoint: &Url, api_key: &ApiKey) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().append_pair(KEY_PARAM, api_key.expose());
    url
}

/// Endpoint without query or fragment, safe to log.
pub fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean.to_string()
}
