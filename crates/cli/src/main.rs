//! Velora CLI - Base seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Populate the base with the demo catalog
//! velora seed
//!
//! # Verify the base has the expected tables and fields
//! velora check
//!
//! # List all orders
//! velora orders list
//!
//! # Work a local cart file against the live catalog
//! velora cart add velvet-matte-lipstick-ruby-red --quantity 2
//! velora cart show
//! ```
//!
//! # Commands
//!
//! - `seed` - Populate the base with demo categories and products
//! - `check` - Validate the base schema against what the storefront expects
//! - `orders list` - List orders with their statuses
//! - `cart` - Manage a file-backed cart (add, remove, set, show, clear)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "velora")]
#[command(author, version, about = "Velora Beauty CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Populate the base with demo categories and products
    Seed,
    /// Validate the base schema against what the storefront expects
    Check,
    /// Order management
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage a file-backed cart against the live catalog
    Cart {
        /// Path of the cart file
        #[arg(long, default_value = commands::cart::DEFAULT_CART_FILE)]
        file: String,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List all orders
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart by slug
    Add {
        /// Product slug
        slug: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product record id
        product_id: String,
    },
    /// Set a line's quantity (zero removes the line)
    Set {
        /// Product record id
        product_id: String,

        /// New quantity
        quantity: i64,
    },
    /// Print the cart contents and totals
    Show,
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Check => commands::check::run().await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list().await?,
        },
        Commands::Cart { file, action } => match action {
            CartAction::Add { slug, quantity } => {
                commands::cart::add(&file, &slug, quantity).await?;
            }
            CartAction::Remove { product_id } => commands::cart::remove(&file, &product_id)?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&file, &product_id, quantity)?,
            CartAction::Show => commands::cart::show(&file)?,
            CartAction::Clear => commands::cart::clear(&file)?,
        },
    }
    Ok(())
}
