//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, store, transaction loading)
//! - `detect` - Detection and confirmation commands
//! - `normalize` - Merchant name normalization preview
//! - `subscriptions` - Tracked subscription management commands

use chrono::NaiveDate;

pub mod core;
pub mod detect;
pub mod normalize;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use core::*;
pub use detect::*;
pub use normalize::*;
pub use subscriptions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Human label for the next expected charge relative to `today`
pub fn due_label(next: NaiveDate, today: NaiveDate) -> String {
    match (next - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d > 1 => format!("in {} days", d),
        -1 => "1 day overdue".to_string(),
        d => format!("{} days overdue", -d),
    }
}
