//! API Client
//!
//! Browser-side calls to the storefront REST API. Every call is one-shot;
//! views keep whatever response arrived last.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use shop_core::rest;
use shop_core::{
    ApiMessage, AuthSession, Cart, CartItem, CategoryList, CheckoutRequest, CheckoutSession,
    Credentials, PaymentStatusReport, Product, ProductQuery, Registration, Result, SessionRef,
    ShopError, User,
};

const FALLBACK_API_URL: &str = "http://localhost:8001";

/// API origin: build-time `STOREFRONT_API_URL`, else the page origin
pub fn api_base() -> String {
    option_env!("STOREFRONT_API_URL")
        .map(str::to_string)
        .or_else(origin)
        .unwrap_or_else(|| FALLBACK_API_URL.into())
}

/// Origin of the current page
pub fn origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

fn request(method: Method, segments: &[&str]) -> Result<RequestBuilder> {
    Ok(Client::new().request(method, rest::endpoint(&api_base(), segments)?))
}

fn authed(token: Option<&str>, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
    let token = rest::require_token(token)?;
    Ok(request(method, segments)?.bearer_auth(token))
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    rest::read_json(request.send().await).await
}

pub async fn login(credentials: &Credentials) -> Result<AuthSession> {
    send(request(Method::POST, &["auth", "login"])?.json(credentials)).await
}

pub async fn register(registration: &Registration) -> Result<AuthSession> {
    send(request(Method::POST, &["auth", "register"])?.json(registration)).await
}

pub async fn current_user(token: Option<&str>) -> Result<User> {
    send(authed(token, Method::GET, &["auth", "me"])?).await
}

pub async fn products(query: &ProductQuery) -> Result<Vec<Product>> {
    send(request(Method::GET, &["products"])?.query(query)).await
}

pub async fn product(id: &str) -> Result<Product> {
    send(request(Method::GET, &["products", id])?).await
}

pub async fn categories() -> Result<Vec<String>> {
    let list: CategoryList = send(request(Method::GET, &["categories"])?).await?;
    Ok(list.categories)
}

pub async fn cart(token: Option<&str>) -> Result<Cart> {
    send(authed(token, Method::GET, &["cart"])?).await
}

pub async fn add_to_cart(token: Option<&str>, item: &CartItem) -> Result<ApiMessage> {
    send(authed(token, Method::POST, &["cart", "add"])?.json(item)).await
}

pub async fn remove_from_cart(token: Option<&str>, product_id: &str) -> Result<ApiMessage> {
    send(authed(token, Method::DELETE, &["cart", "remove", product_id])?).await
}

pub async fn create_checkout(token: Option<&str>, checkout: &CheckoutRequest) -> Result<CheckoutSession> {
    if checkout.items.is_empty() {
        return Err(ShopError::InvalidRequest("Your cart is empty".into()));
    }
    send(authed(token, Method::POST, &["payments", "checkout"])?.json(checkout)).await
}

pub async fn payment_status(token: Option<&str>, session: &SessionRef) -> Result<PaymentStatusReport> {
    send(authed(token, Method::GET, &["payments", "status", session.as_str()])?).await
}
