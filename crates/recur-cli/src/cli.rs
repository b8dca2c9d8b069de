//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Recur - Find the recurring payments hiding in your bank statements
#[derive(Parser)]
#[command(name = "recur")]
#[command(about = "Recurring payment and subscription detector", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.local/share/recur/config/detection.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subscription store file (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect recurring payments in a transaction file
    Detect {
        /// Transaction file (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Minimum confidence (0-100), overrides the config file
        #[arg(long)]
        min_confidence: Option<u32>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect and start tracking recurring payments
    Confirm {
        /// Transaction file (.csv or .json)
        #[arg(short, long)]
        file: PathBuf,

        /// Detected id to confirm (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Confirm every detected payment
        #[arg(long)]
        all: bool,

        /// Recurring type: subscription, bill, loan, other
        #[arg(long = "type")]
        recurring_type: Option<String>,

        /// Minimum confidence (0-100), overrides the config file
        #[arg(long)]
        min_confidence: Option<u32>,
    },

    /// Manage tracked subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: Option<SubscriptionsAction>,
    },

    /// Show how descriptions normalize into merchant names
    Normalize {
        /// Raw transaction descriptions
        #[arg(required = true)]
        descriptions: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// List tracked subscriptions
    List {
        /// Include deactivated subscriptions
        #[arg(long)]
        all: bool,
    },

    /// Rename a subscription
    Rename {
        /// Subscription name or ID
        name_or_id: String,
        /// New display name
        new_name: String,
    },

    /// Set or clear a subscription's category
    Recategorize {
        /// Subscription name or ID
        name_or_id: String,
        /// Category id (omit to clear)
        #[arg(long)]
        category: Option<String>,
        /// Subcategory id (omit to clear)
        #[arg(long)]
        subcategory: Option<String>,
    },

    /// Stop tracking a subscription but keep its history
    Deactivate {
        /// Subscription name or ID
        name_or_id: String,
    },

    /// Delete a subscription
    Delete {
        /// Subscription name or ID
        name_or_id: String,
    },
}
