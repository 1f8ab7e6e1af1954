//! Cart Page

use leptos::prelude::*;
use leptos_router::components::A;

use shop_core::{CartSummary, ProductQuery, ShopError};

use crate::api;
use crate::auth::use_auth;

async fn load_summary(token: Option<String>) -> Result<CartSummary, ShopError> {
    let cart = api::cart(token.as_deref()).await?;
    if cart.is_empty() {
        return Ok(CartSummary::default());
    }
    let products = api::products(&ProductQuery::default()).await?;
    Ok(CartSummary::resolve(&cart, &products))
}

#[component]
pub fn CartPage() -> impl IntoView {
    let auth = use_auth();
    let (summary, set_summary) = signal(CartSummary::default());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let reload = move || {
        let token = auth.token();
        leptos::task::spawn_local(async move {
            match load_summary(token).await {
                Ok(s) => {
                    set_summary.set(s);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
        });
    };
    reload();

    let remove = move |product_id: String| {
        let token = auth.token();
        leptos::task::spawn_local(async move {
            match api::remove_from_cart(token.as_deref(), &product_id).await {
                Ok(_) => reload(),
                Err(e) => set_error.set(Some(e.user_message())),
            }
        });
    };

    let checkout = move |_| {
        let Some(origin) = api::origin() else {
            set_error.set(Some("Unable to determine page origin".into()));
            return;
        };
        let request = summary.with_untracked(|s| s.checkout_request(origin));
        let token = auth.token();
        set_busy.set(true);
        leptos::task::spawn_local(async move {
            match api::create_checkout(token.as_deref(), &request).await {
                Ok(session) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(&session.url);
                    }
                }
                Err(e) => {
                    set_error.set(Some(e.user_message()));
                    set_busy.set(false);
                }
            }
        });
    };

    view! {
        <div class="cart">
            <h1>"Your cart"</h1>
            {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

            <Show
                when=move || !summary.with(CartSummary::is_empty)
                fallback=|| view! {
                    <p class="empty">"Your cart is empty."</p>
                    <A href="/" attr:class="btn">"Browse products"</A>
                }
            >
                <table class="cart-lines">
                    <thead>
                        <tr>
                            <th>"Item"</th>
                            <th>"Qty"</th>
                            <th>"Price"</th>
                            <th>"Total"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || summary.get().lines
                            key=|line| (line.product.id.clone(), line.quantity)
                            children=move |line| {
                                let id = line.product.id.clone();
                                view! {
                                    <tr>
                                        <td>{line.product.name.clone()}</td>
                                        <td>{line.quantity}</td>
                                        <td>{format!("${:.2}", line.product.price)}</td>
                                        <td>{format!("${:.2}", line.line_total())}</td>
                                        <td>
                                            <button class="btn btn-link" on:click=move |_| remove(id.clone())>
                                                "Remove"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <div class="cart-total">
                    <span>{move || format!("{} item(s)", summary.with(CartSummary::item_count))}</span>
                    <strong>{move || format!("Subtotal ${:.2}", summary.with(CartSummary::subtotal))}</strong>
                </div>
                <button class="btn btn-primary" on:click=checkout disabled=move || busy.get()>
                    {move || if busy.get() { "Redirecting..." } else { "Checkout" }}
                </button>
            </Show>
        </div>
    }
}
