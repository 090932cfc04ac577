//! Threadline CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List featured products
//! threadline products featured
//!
//! # Search the catalog
//! threadline products search "denim jacket" --category 2
//!
//! # Add a product to the cart and show it
//! threadline cart add 12 --quantity 2 --size M
//!
//! # Interactive session (keeps the login cookie between commands)
//! threadline shell
//! ```
//!
//! # Environment Variables
//!
//! - `THREADLINE_API_BASE` and the other `THREADLINE_*` client settings
//! - `THREADLINE_PASSWORD` - Password for `login` when `--password` is omitted
//! - `THREADLINE_LOG_JSON` - Set to `1` for JSON log output
//! - `RUST_LOG` - Log filter (default: `threadline_storefront=info,threadline_cli=info`)
//!
//! The server session lives in an in-memory cookie jar, so one-shot commands
//! always start anonymous. Use `shell` to log in and keep working as that
//! shopper.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threadline_storefront::{Storefront, StorefrontConfig};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "threadline")]
#[command(author, version, about = "Threadline storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "THREADLINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "THREADLINE_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        phone: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show who the current session belongs to
    Whoami,
    /// Check that the cart can proceed to checkout
    Checkout,
    /// Start an interactive session
    Shell,
}

#[derive(Debug, Subcommand)]
enum ProductsAction {
    /// Featured products
    Featured,
    /// New arrivals
    New,
    /// Full catalog, one page at a time
    All {
        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// A single product
    Show {
        /// Product ID
        id: i32,
    },
    /// Keyword search
    Search {
        /// Search keyword
        keyword: String,

        /// Restrict to a category ID
        #[arg(short, long)]
        category: Option<i32>,
    },
}

#[derive(Debug, Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        /// Product ID
        product_id: i32,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        #[arg(short, long, default_value = "")]
        size: String,

        #[arg(short, long, default_value = "")]
        color: String,
    },
    /// Set a line's quantity (0 lets the server decide)
    Update {
        /// Cart line ID
        cart_id: i32,

        /// New quantity
        quantity: u32,
    },
    /// Add one unit to a line
    Inc {
        /// Cart line ID
        cart_id: i32,
    },
    /// Take one unit off a line
    Dec {
        /// Cart line ID
        cart_id: i32,
    },
    /// Remove a line
    Remove {
        /// Cart line ID
        cart_id: i32,
    },
    /// Empty the cart
    Clear,
    /// Show the server's unit count
    Count,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Install the subscriber. `RUST_LOG` overrides the default filter and
/// `THREADLINE_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "threadline_storefront=info,threadline_cli=info".into());

    let json = std::env::var("THREADLINE_LOG_JSON").is_ok_and(|v| v == "1");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(api_base = %config.api_base, "Loaded configuration");
    let store = Storefront::connect(config)?;

    match cli.command {
        Commands::Shell => commands::shell::run(&store).await?,
        command => {
            let result = commands::execute(&store, command).await;
            commands::output::print_notices(&store.notices().active());
            result?;
        }
    }
    Ok(())
}
