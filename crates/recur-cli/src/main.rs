//! Recur CLI - Recurring payment detector
//!
//! Usage:
//!   recur detect --file tx.csv         Find recurring payments
//!   recur confirm --file tx.csv --all  Start tracking them
//!   recur subscriptions                List tracked subscriptions
//!   recur normalize "KORTKÖP 240115 NETFLIX COM"

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_app_config(cli.config.as_deref())?;
    let store = commands::open_store(cli.store.as_deref(), &config)?;

    match cli.command {
        Commands::Detect {
            file,
            min_confidence,
            json,
        } => commands::cmd_detect(&config, &store, &file, min_confidence, json),
        Commands::Confirm {
            file,
            ids,
            all,
            recurring_type,
            min_confidence,
        } => commands::cmd_confirm(
            &config,
            &store,
            &file,
            &ids,
            all,
            recurring_type.as_deref(),
            min_confidence,
        ),
        Commands::Subscriptions { action } => match action {
            None => commands::cmd_subscriptions_list(&store, false),
            Some(SubscriptionsAction::List { all }) => {
                commands::cmd_subscriptions_list(&store, all)
            }
            Some(SubscriptionsAction::Rename {
                name_or_id,
                new_name,
            }) => commands::cmd_subscriptions_rename(&store, &name_or_id, &new_name),
            Some(SubscriptionsAction::Recategorize {
                name_or_id,
                category,
                subcategory,
            }) => commands::cmd_subscriptions_recategorize(
                &store,
                &name_or_id,
                category,
                subcategory,
            ),
            Some(SubscriptionsAction::Deactivate { name_or_id }) => {
                commands::cmd_subscriptions_deactivate(&store, &name_or_id)
            }
            Some(SubscriptionsAction::Delete { name_or_id }) => {
                commands::cmd_subscriptions_delete(&store, &name_or_id)
            }
        },
        Commands::Normalize { descriptions } => commands::cmd_normalize(&descriptions),
    }
}
