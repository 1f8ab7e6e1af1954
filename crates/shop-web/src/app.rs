//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use shop_core::ShopError;

use crate::api;
use crate::auth::provide_auth;
use crate::components::NavBar;
use crate::pages::{
    CartPage, HomePage, LoginPage, PaymentCancelPage, PaymentSuccessPage, ProductPage,
    RegisterPage,
};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let auth = provide_auth();

    // Resolve the profile behind a restored token; drop the token if stale
    if auth.token().is_some() {
        leptos::task::spawn_local(async move {
            match api::current_user(auth.token().as_deref()).await {
                Ok(user) => auth.set_user(user),
                Err(ShopError::Unauthorized(_)) => auth.sign_out(),
                Err(e) => leptos::logging::warn!("Could not load profile: {e}"),
            }
        });
    }

    view! {
        <Router>
            <NavBar />
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/product/:id") view=ProductPage />
                    <Route path=path!("/cart") view=CartPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/register") view=RegisterPage />
                    <Route path=path!("/payment/success") view=PaymentSuccessPage />
                    <Route path=path!("/payment/cancel") view=PaymentCancelPage />
                </Routes>
            </main>
        </Router>
    }
}
