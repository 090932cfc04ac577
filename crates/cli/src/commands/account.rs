//! `login`, `register`, `logout` and `whoami` subcommands.

#![allow(clippy::print_stdout)]

use secrecy::SecretString;

use threadline_core::Email;
use threadline_storefront::views::SessionView;
use threadline_storefront::{Credentials, Registration, Storefront};

use super::CliError;

/// Fields collected by `register`.
#[derive(Debug)]
pub struct RegisterArgs {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

pub async fn login(store: &Storefront, email: &str, password: String) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    store
        .session()
        .login(Credentials {
            email: email.into_inner(),
            password: SecretString::from(password),
        })
        .await?;
    println!("{}", store.session_view());
    Ok(())
}

pub async fn register(store: &Storefront, args: RegisterArgs) -> Result<(), CliError> {
    let email = Email::parse(&args.email)?;
    store
        .session()
        .register(Registration {
            first_name: args.first_name,
            last_name: args.last_name,
            username: args.username,
            email: email.into_inner(),
            password: SecretString::from(args.password),
            phone: args.phone.filter(|p| !p.trim().is_empty()),
        })
        .await?;
    Ok(())
}

pub async fn logout(store: &Storefront) -> Result<(), CliError> {
    store.session().bootstrap().await;
    store.session().logout().await?;
    Ok(())
}

pub async fn whoami(store: &Storefront) -> Result<(), CliError> {
    let state = store.session().bootstrap().await;
    match state.identity() {
        Some(identity) => println!(
            "{} <{}> (user {})",
            identity.display_name(),
            identity.email,
            identity.id
        ),
        None => println!("{}", SessionView::from_state(&state)),
    }
    Ok(())
}
