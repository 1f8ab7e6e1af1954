//! # shop-client
//!
//! Native HTTP client for the storefront REST API.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shop_client::{redirect, HttpStorefront};
//!
//! let client = Arc::new(HttpStorefront::from_env());
//!
//! // After the hosted checkout redirects back
//! let session = redirect::session_from_input(&success_url);
//! let outcome = client.poller().spawn(session).join().await;
//! ```

pub mod config;
pub mod http;
pub mod redirect;

pub use config::StorefrontConfig;
pub use http::HttpStorefront;

// Re-export core types for convenience
pub use shop_core::{
    PaymentPoller, PaymentStatusSource, PollFailure, PollHandle, Result, SessionRef, ShopError,
    Storefront, UiStatus,
};
