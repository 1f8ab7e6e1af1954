//! Command Handlers

use std::process::ExitCode;
use std::sync::Arc;

use shop_client::{HttpStorefront, redirect};
use shop_core::{CartItem, CartSummary, Credentials, ProductQuery, Registration, Storefront};

use crate::render::{self, Output};

/// Exit code after Ctrl-C, as shells report SIGINT
const INTERRUPTED: u8 = 130;

pub async fn products(
    client: &HttpStorefront,
    out: &Output,
    category: Option<String>,
    search: Option<String>,
) -> anyhow::Result<()> {
    let mut query = ProductQuery::default();
    if let Some(category) = category {
        query = query.category(category);
    }
    if let Some(search) = search {
        query = query.search(search);
    }

    let products = client.products(&query).await?;
    out.emit(products.as_slice(), render::products)
}

pub async fn product(client: &HttpStorefront, out: &Output, id: &str) -> anyhow::Result<()> {
    let product = client.product(id).await?;
    out.emit(&product, render::product)
}

pub async fn categories(client: &HttpStorefront, out: &Output) -> anyhow::Result<()> {
    let categories = client.categories().await?;
    out.emit(categories.as_slice(), |list| {
        for category in list {
            println!("{category}");
        }
    })
}

pub async fn login(
    client: &HttpStorefront,
    out: &Output,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let session = client.login(&Credentials { email, password }).await?;
    out.emit(&session, |s| {
        println!("Logged in as {} <{}>", s.user.name, s.user.email);
        println!("export STOREFRONT_TOKEN={}", s.access_token);
    })
}

pub async fn register(
    client: &HttpStorefront,
    out: &Output,
    email: String,
    name: String,
    password: String,
) -> anyhow::Result<()> {
    let session = client.register(&Registration { email, name, password }).await?;
    out.emit(&session, |s| {
        println!("Welcome, {}!", s.user.name);
        println!("export STOREFRONT_TOKEN={}", s.access_token);
    })
}

pub async fn whoami(client: &HttpStorefront, out: &Output) -> anyhow::Result<()> {
    let user = client.current_user().await?;
    out.emit(&user, render::user)
}

/// Cart resolved against the full catalog
async fn cart_summary(client: &HttpStorefront) -> anyhow::Result<CartSummary> {
    let cart = client.cart().await?;
    if cart.is_empty() {
        return Ok(CartSummary::default());
    }
    let products = client.products(&ProductQuery::default()).await?;
    Ok(CartSummary::resolve(&cart, &products))
}

pub async fn cart(client: &HttpStorefront, out: &Output) -> anyhow::Result<()> {
    let summary = cart_summary(client).await?;
    out.emit(&summary, render::cart)
}

pub async fn add(
    client: &HttpStorefront,
    out: &Output,
    product_id: String,
    quantity: u32,
) -> anyhow::Result<()> {
    let ack = client.add_to_cart(&CartItem::new(product_id, quantity)).await?;
    out.note(&ack.message);
    Ok(())
}

pub async fn remove(client: &HttpStorefront, out: &Output, product_id: &str) -> anyhow::Result<()> {
    let ack = client.remove_from_cart(product_id).await?;
    out.note(&ack.message);
    Ok(())
}

pub async fn clear(client: &HttpStorefront, out: &Output) -> anyhow::Result<()> {
    let ack = client.clear_cart().await?;
    out.note(&ack.message);
    Ok(())
}

pub async fn checkout(client: &HttpStorefront, out: &Output, origin: &str) -> anyhow::Result<()> {
    let summary = cart_summary(client).await?;
    let session = client.create_checkout(&summary.checkout_request(origin)).await?;
    out.emit(&session, |s| {
        println!("Complete your payment at:");
        println!("  {}", s.url);
        println!();
        println!("Then run: shop poll {}", s.session_id);
    })
}

pub async fn transactions(client: &HttpStorefront, out: &Output) -> anyhow::Result<()> {
    let transactions = client.transactions().await?;
    out.emit(transactions.as_slice(), render::transactions)
}

/// Poll a checkout session until it reaches a terminal status.
///
/// Every status change is printed. Ctrl-C cancels the poller, dropping any
/// pending retry, and waits for it to stop.
pub async fn poll(
    client: &Arc<HttpStorefront>,
    out: &Output,
    input: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let session = input.and_then(redirect::session_from_input);
    let handle = client.poller().spawn(session);
    let mut status = handle.subscribe();

    let mut current = status.borrow_and_update().clone();
    out.status(&current);

    while !current.is_terminal() {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                current = status.borrow_and_update().clone();
                out.status(&current);
            }
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                break;
            }
        }
    }

    Ok(match handle.join().await {
        Some(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Some(_) => ExitCode::FAILURE,
        None => {
            eprintln!("Cancelled.");
            ExitCode::from(INTERRUPTED)
        }
    })
}
