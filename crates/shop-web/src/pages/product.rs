//! Product Detail Page

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use shop_core::{CartItem, Product};

use crate::api;
use crate::auth::use_auth;

#[component]
pub fn ProductPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let params = use_params_map();

    let (product, set_product) = signal(None::<Product>);
    let (quantity, set_quantity) = signal(1_u32);
    let (note, set_note) = signal(None::<String>);

    Effect::new(move |_| {
        let Some(id) = params.with(|p| p.get("id")) else {
            set_note.set(Some("Product not found".into()));
            return;
        };
        leptos::task::spawn_local(async move {
            match api::product(&id).await {
                Ok(p) => set_product.set(Some(p)),
                Err(e) => set_note.set(Some(e.user_message())),
            }
        });
    });

    let add = move |_| {
        let Some(p) = product.get_untracked() else {
            return;
        };
        let Some(token) = auth.token() else {
            navigate("/login", Default::default());
            return;
        };
        let item = CartItem::new(p.id, quantity.get_untracked());
        leptos::task::spawn_local(async move {
            let text = match api::add_to_cart(Some(&token), &item).await {
                Ok(ack) => ack.message,
                Err(e) => e.user_message(),
            };
            set_note.set(Some(text));
        });
    };

    view! {
        <div class="product-detail">
            {move || product.get().map(|p| {
                let max = p.stock.max(1);
                view! {
                    <img src=p.image_url.clone() alt=p.name.clone() />
                    <div class="product-info">
                        <span class="category">{p.category.clone()}</span>
                        <h1>{p.name.clone()}</h1>
                        <div class="price">{format!("${:.2}", p.price)}</div>
                        <p>{p.description.clone()}</p>
                        <p class="stock">
                            {if p.in_stock() { format!("{} in stock", p.stock) } else { "Sold out".into() }}
                        </p>
                        <div class="field">
                            <label>"Quantity"</label>
                            <input
                                type="number"
                                min="1"
                                max=max.to_string()
                                prop:value=move || quantity.get().to_string()
                                on:input=move |ev| {
                                    let qty = event_target_value(&ev).parse::<u32>().unwrap_or(1);
                                    set_quantity.set(qty.clamp(1, max));
                                }
                            />
                        </div>
                        <button class="btn btn-primary" on:click=add.clone() disabled=!p.in_stock()>
                            "Add to cart"
                        </button>
                    </div>
                }
            })}
            {move || note.get().map(|n| view! { <p class="note">{n}</p> })}
        </div>
    }
}
