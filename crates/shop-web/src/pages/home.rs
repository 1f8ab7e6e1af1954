//! Home Page

use leptos::prelude::*;

use shop_core::{Product, ProductQuery};

use crate::api;
use crate::components::ProductCard;

#[component]
pub fn HomePage() -> impl IntoView {
    let (category, set_category) = signal(String::new());
    let (search, set_search) = signal(String::new());
    let (categories, set_categories) = signal(Vec::<String>::new());
    let (products, set_products) = signal(Vec::<Product>::new());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(true);

    leptos::task::spawn_local(async move {
        match api::categories().await {
            Ok(list) => set_categories.set(list),
            Err(e) => leptos::logging::warn!("failed to load categories: {e}"),
        }
    });

    Effect::new(move |_| {
        let query = ProductQuery::default()
            .category(category.get())
            .search(search.get());
        set_loading.set(true);
        leptos::task::spawn_local(async move {
            match api::products(&query).await {
                Ok(list) => {
                    set_products.set(list);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="home">
            <header class="hero">
                <h1>"Shop the collection"</h1>
                <div class="filters">
                    <input
                        type="search"
                        placeholder="Search products..."
                        prop:value=move || search.get()
                        on:change=move |ev| set_search.set(event_target_value(&ev))
                    />
                    <select on:change=move |ev| set_category.set(event_target_value(&ev))>
                        <option value="">"All categories"</option>
                        <For
                            each=move || categories.get()
                            key=Clone::clone
                            children=move |c| view! { <option value=c.clone()>{c.clone()}</option> }
                        />
                    </select>
                </div>
            </header>

            {move || error.get().map(|e| view! { <p class="error">{e}</p> })}

            <Show when=move || loading.get() && products.with(Vec::is_empty)>
                <p class="loading">"Loading products..."</p>
            </Show>
            <Show when=move || !loading.get() && products.with(Vec::is_empty) && error.with(Option::is_none)>
                <p class="empty">"No products found."</p>
            </Show>

            <section class="product-grid">
                <For
                    each=move || products.get()
                    key=|p| p.id.clone()
                    children=move |product| view! { <ProductCard product /> }
                />
            </section>
        </div>
    }
}
