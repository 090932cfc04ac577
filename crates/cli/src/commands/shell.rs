//! Interactive shell.
//!
//! Keeps one storefront (and so one cookie jar) alive across commands, which
//! is what lets a login carry over to later cart commands. State changes and
//! notices are printed by a [`TerminalRenderer`] as they happen.

#![allow(clippy::print_stdout)]

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use threadline_storefront::Storefront;

use super::output::{self, TerminalRenderer};
use super::{CliError, execute};
use crate::{CartAction, Cli, Commands};

const PROMPT: &str = "threadline> ";

/// One parsed line of input.
#[derive(Debug)]
pub enum ShellInput {
    Empty,
    Quit,
    Command(Commands),
}

/// Parse a shell line with the same grammar as the command line.
///
/// # Errors
///
/// Returns the clap error (including `--help` output) for lines that do not
/// parse.
pub fn parse_line(line: &str) -> Result<ShellInput, clap::Error> {
    let words = split_words(line);
    match words.first().map(String::as_str) {
        None => Ok(ShellInput::Empty),
        Some("quit" | "exit") => Ok(ShellInput::Quit),
        Some(_) => Cli::try_parse_from(std::iter::once("threadline".to_string()).chain(words))
            .map(|cli| ShellInput::Command(cli.command)),
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}

/// Whether a failed command has already been reported as a notice.
fn surfaces_notice(command: &Commands) -> bool {
    match command {
        Commands::Cart { action } => !matches!(action, CartAction::Show | CartAction::Count),
        Commands::Login { .. }
        | Commands::Register { .. }
        | Commands::Logout
        | Commands::Checkout => true,
        Commands::Products { .. } | Commands::Whoami | Commands::Shell => false,
    }
}

/// Run the shell until end of input or `quit`.
///
/// # Errors
///
/// Returns an error if standard input or output fails.
pub async fn run(store: &Storefront) -> std::io::Result<()> {
    store.start().await;
    println!("{}", store.session_view());
    output::print_cart(&store.cart_view());
    for card in store.featured_cards() {
        println!("{card}");
    }

    let renderer = store.spawn_renderer(TerminalRenderer::default());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(ShellInput::Empty) => continue,
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::Command(command)) => command,
            Err(e) => {
                println!("{}", e.render());
                continue;
            }
        };

        let notified = surfaces_notice(&command);
        if let Err(e) = execute(store, command).await
            && !(notified && matches!(e, CliError::Api(_) | CliError::Checkout(_)))
        {
            println!("error: {e}");
        }

        // Let the renderer print before the next prompt.
        tokio::task::yield_now().await;
    }

    renderer.abort();
    Ok(())
}
