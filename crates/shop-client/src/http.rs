//! HTTP Storefront Client
//!
//! Implementation of `Storefront` against the storefront REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use shop_core::rest;
use shop_core::{
    ApiMessage, AuthSession, Cart, CartItem, CategoryList, CheckoutRequest, CheckoutSession,
    Credentials, PaymentPoller, PaymentStatusReport, PaymentStatusSource, PaymentTransaction,
    Product, ProductQuery, Registration, Result, SessionRef, ShopError, Storefront, User,
};

use crate::config::StorefrontConfig;

/// reqwest-backed storefront client
#[derive(Clone, Debug)]
pub struct HttpStorefront {
    client: Client,
    config: StorefrontConfig,
}

impl HttpStorefront {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(StorefrontConfig::default().with_base_url(base_url))
    }

    /// Create from configuration
    pub fn from_config(config: StorefrontConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(StorefrontConfig::from_env())
    }

    /// Same client, authenticated with `token`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone().with_token(token),
        }
    }

    /// Payment confirmation poller backed by this client
    pub fn poller(self: &Arc<Self>) -> PaymentPoller {
        PaymentPoller::new(self.clone())
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = rest::endpoint(&self.config.base_url, segments)?;
        tracing::debug!(method = %method, url = %url, "Storefront request");
        Ok(self.client.request(method, url))
    }

    fn authed(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = rest::require_token(self.config.token.as_deref())?;
        Ok(self.request(method, segments)?.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        rest::read_json(request.send().await).await
    }
}

#[async_trait]
impl PaymentStatusSource for HttpStorefront {
    async fn payment_status(&self, session: &SessionRef) -> Result<PaymentStatusReport> {
        let request = self.authed(Method::GET, &["payments", "status", session.as_str()])?;
        Self::send(request).await
    }
}

#[async_trait]
impl Storefront for HttpStorefront {
    async fn register(&self, registration: &Registration) -> Result<AuthSession> {
        let request = self.request(Method::POST, &["auth", "register"])?.json(registration);
        let session: AuthSession = Self::send(request).await?;
        tracing::info!(user = %session.user.email, "Registered");
        Ok(session)
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let request = self.request(Method::POST, &["auth", "login"])?.json(credentials);
        let session: AuthSession = Self::send(request).await?;
        tracing::info!(user = %session.user.email, "Logged in");
        Ok(session)
    }

    async fn current_user(&self) -> Result<User> {
        Self::send(self.authed(Method::GET, &["auth", "me"])?).await
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let request = self.request(Method::GET, &["products"])?.query(query);
        Self::send(request).await
    }

    async fn product(&self, id: &str) -> Result<Product> {
        Self::send(self.request(Method::GET, &["products", id])?).await
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let list: CategoryList = Self::send(self.request(Method::GET, &["categories"])?).await?;
        Ok(list.categories)
    }

    async fn cart(&self) -> Result<Cart> {
        Self::send(self.authed(Method::GET, &["cart"])?).await
    }

    async fn add_to_cart(&self, item: &CartItem) -> Result<ApiMessage> {
        if item.quantity == 0 {
            return Err(ShopError::InvalidRequest("Quantity must be at least 1".into()));
        }
        let request = self.authed(Method::POST, &["cart", "add"])?.json(item);
        Self::send(request).await
    }

    async fn remove_from_cart(&self, product_id: &str) -> Result<ApiMessage> {
        Self::send(self.authed(Method::DELETE, &["cart", "remove", product_id])?).await
    }

    async fn clear_cart(&self) -> Result<ApiMessage> {
        Self::send(self.authed(Method::PUT, &["cart", "clear"])?).await
    }

    async fn create_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        if request.items.is_empty() {
            return Err(ShopError::InvalidRequest("Your cart is empty".into()));
        }
        let builder = self.authed(Method::POST, &["payments", "checkout"])?.json(request);
        let session: CheckoutSession = Self::send(builder).await?;
        tracing::info!(session = %session.session_id, "Checkout session created");
        Ok(session)
    }

    async fn transactions(&self) -> Result<Vec<PaymentTransaction>> {
        Self::send(self.authed(Method::GET, &["payments", "transactions"])?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::{PollFailure, UiStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response and hand back the raw request
    async fn canned(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}"), server)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_authenticated_call_without_token() {
        let client = HttpStorefront::new("http://127.0.0.1:9");
        let session = SessionRef::new("cs_1").unwrap();

        let err = client.payment_status(&session).await.unwrap_err();
        assert!(matches!(err, ShopError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_payment_status_request() {
        let (base, server) = canned(
            "200 OK",
            r#"{"status": "complete", "payment_status": "paid", "amount_total": 49.5, "currency": "usd", "transaction_id": "tx-1", "message": "Payment is paid"}"#,
        )
        .await;
        let client = HttpStorefront::new(base).with_token("tok-123");
        let session = SessionRef::new("cs_test_9").unwrap();

        let report = client.payment_status(&session).await.unwrap();
        assert_eq!(report.payment_status, "paid");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/payments/status/cs_test_9 HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tok-123"));
    }

    #[tokio::test]
    async fn test_products_query_string() {
        let (base, server) = canned("200 OK", "[]").await;
        let client = HttpStorefront::new(base);

        let products = client
            .products(&ProductQuery::default().category("Shoes"))
            .await
            .unwrap();
        assert!(products.is_empty());

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/products?category=Shoes HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_add_to_cart_body() {
        let (base, server) = canned("200 OK", r#"{"message": "Item added to cart"}"#).await;
        let client = HttpStorefront::new(base).with_token("tok");

        let ack = client.add_to_cart(&CartItem::new("p-1", 2)).await.unwrap();
        assert_eq!(ack.message, "Item added to cart");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/cart/add HTTP/1.1"));
        assert!(request.ends_with(r#"{"product_id":"p-1","quantity":2}"#));
    }

    #[tokio::test]
    async fn test_not_found_detail() {
        let (base, _server) = canned("404 Not Found", r#"{"detail": "Product not found"}"#).await;
        let client = HttpStorefront::new(base);

        let err = client.product("missing").await.unwrap_err();
        assert_eq!(err.user_message(), "Product not found");
    }

    #[tokio::test]
    async fn test_empty_checkout_rejected_locally() {
        let client = HttpStorefront::new("http://127.0.0.1:9").with_token("tok");
        let request = CheckoutRequest {
            items: Vec::new(),
            origin_url: "https://shop.example.com".into(),
        };
        let err = client.create_checkout(&request).await.unwrap_err();
        assert!(matches!(err, ShopError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_poller_over_http_paid() {
        let (base, _server) = canned("200 OK", r#"{"status": "complete", "payment_status": "paid"}"#).await;
        let client = Arc::new(HttpStorefront::new(base).with_token("tok"));

        let outcome = client.poller().spawn(SessionRef::new("cs_1")).join().await;
        assert_eq!(outcome, Some(UiStatus::paid()));
    }

    #[tokio::test]
    async fn test_poller_over_http_malformed_body() {
        let (base, _server) = canned("200 OK", "<html>gateway</html>").await;
        let client = Arc::new(HttpStorefront::new(base).with_token("tok"));

        let outcome = client.poller().spawn(SessionRef::new("cs_1")).join().await;
        assert!(matches!(
            outcome,
            Some(UiStatus::Failed(PollFailure::Transport(_)))
        ));
    }
}
