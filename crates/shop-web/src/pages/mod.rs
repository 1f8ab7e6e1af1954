//! Page Components

mod auth;
mod cart;
mod home;
mod payment;
mod product;

pub use auth::{LoginPage, RegisterPage};
pub use cart::CartPage;
pub use home::HomePage;
pub use payment::{PaymentCancelPage, PaymentSuccessPage};
pub use product::ProductPage;
