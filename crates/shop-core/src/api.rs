//! Storefront API Traits
//!
//! The storefront backend is an external service. Everything in this
//! workspace talks to it through these traits, so the HTTP client can be
//! swapped for a scripted one in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    ApiMessage, AuthSession, Cart, CartItem, CheckoutRequest, CheckoutSession, Credentials,
    PaymentStatusReport, PaymentTransaction, Product, ProductQuery, Registration, User,
};
use crate::session::SessionRef;

/// Source of payment status reports for the confirmation poller
#[async_trait]
pub trait PaymentStatusSource: Send + Sync {
    /// Query the current status of a checkout session
    async fn payment_status(&self, session: &SessionRef) -> Result<PaymentStatusReport>;
}

/// One-shot request/response calls against the storefront API.
///
/// No retries and no ordering contract: callers show the latest response.
#[async_trait]
pub trait Storefront: PaymentStatusSource {
    async fn register(&self, registration: &Registration) -> Result<AuthSession>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// Profile of the token owner
    async fn current_user(&self) -> Result<User>;

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    async fn product(&self, id: &str) -> Result<Product>;

    async fn categories(&self) -> Result<Vec<String>>;

    async fn cart(&self) -> Result<Cart>;

    async fn add_to_cart(&self, item: &CartItem) -> Result<ApiMessage>;

    async fn remove_from_cart(&self, product_id: &str) -> Result<ApiMessage>;

    async fn clear_cart(&self) -> Result<ApiMessage>;

    /// Create a hosted checkout session for the given items
    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Payment history of the token owner, newest first
    async fn transactions(&self) -> Result<Vec<PaymentTransaction>>;
}
