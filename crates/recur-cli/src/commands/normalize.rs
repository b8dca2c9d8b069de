//! Normalization preview command

use anyhow::Result;
use recur_core::normalize_with_trace;

pub fn cmd_normalize(descriptions: &[String]) -> Result<()> {
    for description in descriptions {
        let normalized = normalize_with_trace(description);
        let rules = if normalized.applied_rules.is_empty() {
            "no rules".to_string()
        } else {
            normalized.applied_rules.join(", ")
        };
        println!("{:?} → {}   ({})", description, normalized.name, rules);
    }
    Ok(())
}
