//! Checkout Redirects
//!
//! The payment provider sends the customer back to
//! `{origin}/payment/success?session_id=...`. These helpers recover the
//! session reference from that URL.

use reqwest::Url;
use shop_core::session::{SESSION_QUERY_PARAM, SessionRef};

/// Session reference carried by a success redirect URL
pub fn session_from_url(url: &Url) -> Option<SessionRef> {
    let value = url
        .query_pairs()
        .find(|(key, _)| key == SESSION_QUERY_PARAM)
        .map(|(_, value)| value.into_owned());
    SessionRef::from_query(value)
}

/// Accept either a full redirect URL or a bare session reference
pub fn session_from_input(input: &str) -> Option<SessionRef> {
    match Url::parse(input.trim()) {
        Ok(url) if url.has_host() => session_from_url(&url),
        _ => SessionRef::new(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_redirect() {
        let session =
            session_from_input("https://shop.example.com/payment/success?session_id=cs_test_a1%2Fb2")
                .unwrap();
        assert_eq!(session.as_str(), "cs_test_a1/b2");
    }

    #[test]
    fn test_redirect_without_session() {
        assert!(session_from_input("https://shop.example.com/payment/success").is_none());
        assert!(session_from_input("https://shop.example.com/payment/success?session_id=").is_none());
    }

    #[test]
    fn test_bare_session_reference() {
        assert_eq!(session_from_input("cs_live_42").unwrap().as_str(), "cs_live_42");
        assert!(session_from_input("  ").is_none());
    }
}
