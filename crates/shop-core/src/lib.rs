//! # shop-core
//!
//! Storefront domain model, API abstraction and the payment confirmation
//! poller.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         shop-core                            │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │    Models    │  │  Storefront  │  │  PaymentPoller     │  │
//! │  │ Product/Cart │──│    (trait)   │──│  PollState + watch │  │
//! │  └──────────────┘  └──────────────┘  └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!         ▲                    ▲                    ▲
//!     shop-web            shop-client           shop-cli
//! ```
//!
//! The backend is an external HTTP service; `shop-client` implements the
//! traits with `reqwest`, and tests use [`mock::ScriptedStatusSource`].

pub mod api;
pub mod cart;
pub mod error;
pub mod mock;
pub mod model;
pub mod poller;
pub mod rest;
pub mod session;
pub mod status;

pub use api::{PaymentStatusSource, Storefront};
pub use cart::{CartLine, CartSummary};
pub use error::{Result, ShopError};
pub use model::{
    ApiMessage, AuthSession, Cart, CartItem, CategoryList, CheckoutRequest, CheckoutSession,
    Credentials, PaymentStatusReport, PaymentTransaction, Product, ProductQuery, Registration,
    User,
};
pub use poller::{PaymentPoller, PollHandle, PollPolicy, PollState, PollStep};
pub use session::SessionRef;
pub use status::{PollFailure, UiStatus};
