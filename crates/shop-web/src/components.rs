//! UI Components

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use shop_core::{CartItem, Product, UiStatus};

use crate::api;
use crate::auth::use_auth;

/// Top navigation with auth links
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let sign_out = move |_| {
        auth.sign_out();
        navigate("/", Default::default());
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="brand">"Storefront"</A>
            <div class="nav-links">
                <A href="/cart">"Cart"</A>
                <Show
                    when=move || auth.is_signed_in()
                    fallback=|| view! {
                        <A href="/login">"Log in"</A>
                        <A href="/register">"Sign up"</A>
                    }
                >
                    <span class="user">{move || auth.user().map(|u| u.name).unwrap_or_default()}</span>
                    <button class="btn btn-link" on:click=sign_out.clone()>"Log out"</button>
                </Show>
            </div>
        </nav>
    }
}

/// Catalog tile with an add-to-cart button
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let (note, set_note) = signal(None::<String>);

    let id = product.id.clone();
    let add = move |_| {
        let Some(token) = auth.token() else {
            navigate("/login", Default::default());
            return;
        };
        let item = CartItem::new(id.clone(), 1);
        leptos::task::spawn_local(async move {
            let text = match api::add_to_cart(Some(&token), &item).await {
                Ok(ack) => ack.message,
                Err(e) => e.user_message(),
            };
            set_note.set(Some(text));
        });
    };

    let href = format!("/product/{}", product.id);
    let price = format!("${:.2}", product.price);
    let in_stock = product.in_stock();
    let image_url = product.image_url.clone();
    let alt = product.name.clone();
    let name = product.name.clone();

    view! {
        <div class="product-card">
            <A href=href.clone()>
                <img src=image_url.clone() alt=alt.clone() />
            </A>
            <div class="product-info">
                <A href=href>
                    <h3>{name.clone()}</h3>
                </A>
                <span class="category">{product.category.clone()}</span>
                <div class="price">{price}</div>
                <button class="btn btn-primary" on:click=add disabled=!in_stock>
                    {if in_stock { "Add to cart" } else { "Sold out" }}
                </button>
                {move || note.get().map(|n| view! { <p class="note">{n}</p> })}
            </div>
        </div>
    }
}

/// Payment confirmation banner
#[component]
pub fn StatusPanel(#[prop(into)] status: Signal<UiStatus>) -> impl IntoView {
    view! {
        <div class=move || format!("status status-{}", status.get().label())>
            <Show when=move || status.get().is_loading()>
                <div class="spinner"></div>
            </Show>
            <p class="status-message">{move || status.get().message()}</p>
            <Show when=move || status.get().is_terminal()>
                <A href="/" attr:class="btn btn-primary">"Continue shopping"</A>
            </Show>
        </div>
    }
}
