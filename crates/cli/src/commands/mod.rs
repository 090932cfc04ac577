//! Command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod output;
pub mod shell;

use thiserror::Error;

use threadline_core::EmailError;
use threadline_storefront::api::ApiError;
use threadline_storefront::{CheckoutRefusal, Storefront};

use crate::Commands;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The storefront API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Checkout was refused locally.
    #[error("{0}")]
    Checkout(#[from] CheckoutRefusal),

    /// The email address was rejected before sending.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The command is not available here.
    #[error("{0}")]
    Unsupported(&'static str),
}

/// Run one command against `store`.
pub async fn execute(store: &Storefront, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Products { action } => catalog::run(store, action).await,
        Commands::Cart { action } => cart::run(store, action).await,
        Commands::Login { email, password } => account::login(store, &email, password).await,
        Commands::Register {
            first_name,
            last_name,
            username,
            email,
            password,
            phone,
        } => {
            account::register(
                store,
                account::RegisterArgs {
                    first_name,
                    last_name,
                    username,
                    email,
                    password,
                    phone,
                },
            )
            .await
        }
        Commands::Logout => account::logout(store).await,
        Commands::Whoami => account::whoami(store).await,
        Commands::Checkout => cart::checkout(store).await,
        Commands::Shell => Err(CliError::Unsupported("Already in a shell")),
    }
}
