//! Storefront Models
//!
//! Wire types exchanged with the storefront REST API.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Registered customer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Login form
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Token issued by login or registration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// Catalog entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,

    /// Unit price in the store currency
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub category: String,
    pub image_url: String,

    #[serde(default)]
    pub stock: u32,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Product {
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Optional filters for catalog listing
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into()).filter(|c: &String| !c.trim().is_empty());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }
}

/// `GET /categories` body
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// A product reference held in a cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Server-side cart of the logged-in user
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Acknowledgement body returned by cart mutations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// Body of `POST /payments/checkout`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,

    /// Origin the payment provider redirects back to
    pub origin_url: String,
}

/// Hosted checkout created by the API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Hosted checkout page to redirect the customer to
    pub url: String,
    pub session_id: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Body of `GET /payments/status/{session_id}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusReport {
    /// Checkout session status (`open`, `complete`, `expired`)
    pub status: String,

    /// Payment status (`unpaid`, `paid`, `no_payment_required`)
    pub payment_status: String,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount_total: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub transaction_id: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentStatusReport {
    /// Minimal report with only the two state fields set
    pub fn new(status: impl Into<String>, payment_status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            payment_status: payment_status.into(),
            amount_total: None,
            currency: None,
            transaction_id: None,
            message: None,
        }
    }
}

/// Payment attempt recorded for the current user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub id: String,
    pub session_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{
            "id": "p-1",
            "name": "Wireless Headphones",
            "description": "Premium wireless headphones with noise cancellation",
            "price": 199.99,
            "category": "Electronics",
            "image_url": "https://images.example.com/headphones.jpg",
            "stock": 100,
            "created_at": "2025-03-01T10:15:30.123456"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, dec!(199.99));
        assert!(product.in_stock());
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_status_report_minimal() {
        let report: PaymentStatusReport =
            serde_json::from_str(r#"{"status": "open", "payment_status": "unpaid"}"#).unwrap();
        assert_eq!(report, PaymentStatusReport::new("open", "unpaid"));
    }

    #[test]
    fn test_status_report_full() {
        let json = r#"{
            "status": "complete",
            "payment_status": "paid",
            "amount_total": 249.98,
            "currency": "usd",
            "transaction_id": "tx-9",
            "message": "Payment is paid"
        }"#;
        let report: PaymentStatusReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.amount_total, Some(dec!(249.98)));
        assert_eq!(report.transaction_id.as_deref(), Some("tx-9"));
    }

    #[test]
    fn test_product_query_drops_blank_filters() {
        let query = ProductQuery::default().category("  ").search("shoe");
        assert_eq!(query.category, None);
        assert_eq!(query.search.as_deref(), Some("shoe"));
        assert!(!query.is_empty());
    }

    #[test]
    fn test_empty_cart_from_api() {
        let cart: Cart = serde_json::from_str(r#"{"id": "c", "user_id": "u", "items": []}"#).unwrap();
        assert!(cart.is_empty());
    }
}
