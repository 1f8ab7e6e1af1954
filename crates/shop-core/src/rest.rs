//! REST Plumbing
//!
//! URL building and response mapping shared by the native and browser
//! clients. Each client owns its `reqwest::Client` and request futures.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{Result, ShopError};

/// `{base_url}/api/{segments...}` with each segment percent-encoded
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ShopError::Config(format!("invalid API URL {base_url}: {e}")))?;

    url.path_segments_mut()
        .map_err(|()| ShopError::Config(format!("API URL cannot be a base: {base_url}")))?
        .pop_if_empty()
        .push("api")
        .extend(segments);

    Ok(url)
}

/// Token for an authenticated endpoint; calls without one never leave the client
pub fn require_token(token: Option<&str>) -> Result<&str> {
    token.ok_or_else(|| ShopError::Unauthorized("not logged in".into()))
}

/// Decode the outcome of `RequestBuilder::send`.
///
/// Transport failures map to [`ShopError::Http`], non-success statuses go
/// through [`ShopError::from_status`], unreadable bodies become
/// [`ShopError::Decode`].
pub async fn read_json<T: DeserializeOwned>(sent: reqwest::Result<Response>) -> Result<T> {
    let response = sent.map_err(|e| ShopError::Http(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ShopError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let err = ShopError::from_status(status.as_u16(), &body);
    tracing::warn!(status = status.as_u16(), error = %err, "Storefront request rejected");
    Err(err)
}
