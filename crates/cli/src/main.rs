//! Marketplace CLI - cart inspection and order submission.
//!
//! # Usage
//!
//! ```bash
//! # Show line totals and the order total for a saved cart
//! mp-cli cart summary --cart cart.json
//!
//! # Place an order against a running storefront
//! mp-cli checkout --server http://127.0.0.1:3000 --cart cart.json \
//!     --name "Ada Lovelace" --email ada@example.com --phone 555-0100 \
//!     --address "1 Loop Rd" --city Springfield --state IL --zip 62701 \
//!     --country US
//! ```
//!
//! # Commands
//!
//! - `cart summary` - Print a saved cart
//! - `checkout` - Submit a cart and buyer details once

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::checkout::BuyerArgs;

#[derive(Parser)]
#[command(name = "mp-cli")]
#[command(author, version, about = "Marketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit an order to the storefront
    Checkout {
        /// Storefront base URL
        #[arg(long, env = "STOREFRONT_URL", default_value = "http://127.0.0.1:3000")]
        server: String,

        /// Path to a cart JSON file (array of cart items)
        #[arg(long)]
        cart: PathBuf,

        #[command(flatten)]
        buyer: BuyerArgs,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print each line total and the cart total
    Summary {
        /// Path to a cart JSON file (array of cart items)
        #[arg(long)]
        cart: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Summary { cart } => commands::cart::summary(&cart)?,
        },
        Commands::Checkout {
            server,
            cart,
            buyer,
        } => commands::checkout::run(&server, &cart, &buyer).await?,
    }
    Ok(())
}
