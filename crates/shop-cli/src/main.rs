//! Storefront CLI
//!
//! Terminal client for the storefront API: browse the catalog, manage the
//! cart, start a hosted checkout and wait for its payment confirmation.

mod commands;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_client::{HttpStorefront, ShopError, StorefrontConfig};

#[derive(Parser)]
#[command(name = "shop", author, version, about, long_about = None)]
struct Cli {
    /// API origin (overrides STOREFRONT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides STOREFRONT_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List products, optionally filtered
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product
    Product { id: String },
    /// List product categories
    Categories,
    /// Log in and print a token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and print a token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Show the logged-in user
    Whoami,
    /// Show the cart with totals
    Cart,
    /// Add a product to the cart
    Add {
        product_id: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from the cart
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Check out the whole cart and print the payment page URL
    Checkout {
        /// Origin the payment provider redirects back to
        #[arg(long)]
        origin: String,
    },
    /// List past payments
    Transactions,
    /// Wait for a checkout session to be confirmed
    Poll {
        /// Session reference or the full success redirect URL
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, stdout carries command output)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = StorefrontConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    tracing::debug!(api = %config.base_url, authenticated = config.token.is_some(), "Configured");

    let client = Arc::new(HttpStorefront::from_config(config));

    match run(client, cli.command, cli.json).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<ShopError>() {
                Some(shop) => {
                    tracing::debug!(error = %shop, "Command failed");
                    eprintln!("error: {}", shop.user_message());
                }
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: Arc<HttpStorefront>, command: Command, json: bool) -> anyhow::Result<ExitCode> {
    let out = render::Output::new(json);

    match command {
        Command::Products { category, search } => {
            commands::products(&client, &out, category, search).await?;
        }
        Command::Product { id } => commands::product(&client, &out, &id).await?,
        Command::Categories => commands::categories(&client, &out).await?,
        Command::Login { email, password } => commands::login(&client, &out, email, password).await?,
        Command::Register { email, name, password } => {
            commands::register(&client, &out, email, name, password).await?;
        }
        Command::Whoami => commands::whoami(&client, &out).await?,
        Command::Cart => commands::cart(&client, &out).await?,
        Command::Add { product_id, quantity } => {
            commands::add(&client, &out, product_id, quantity).await?;
        }
        Command::Remove { product_id } => commands::remove(&client, &out, &product_id).await?,
        Command::Clear => commands::clear(&client, &out).await?,
        Command::Checkout { origin } => commands::checkout(&client, &out, &origin).await?,
        Command::Transactions => commands::transactions(&client, &out).await?,
        Command::Poll { session } => return commands::poll(&client, &out, session.as_deref()).await,
    }

    Ok(ExitCode::SUCCESS)
}
