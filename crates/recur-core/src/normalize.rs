//! Recipient name normalization
//!
//! Bank exports decorate the same merchant with card-rail markers, booking
//! dates, masked card numbers and reference codes that change on every
//! charge. Normalization peels those off so that "KORTKÖP 240115 NETFLIX COM"
//! and "NETFLIX COM /24-02-15" both become "Netflix Com".
//!
//! The stripping steps are an ordered table of [`NormalizationRule`]s run by
//! [`apply_rules`]. Each rule fires at most once, in table order; leading
//! rules run before trailing ones.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

/// Which end of the description a rule strips from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePosition {
    Leading,
    Trailing,
}

/// A single strip rule: a case-insensitive pattern anchored at one end
#[derive(Debug, Clone)]
pub struct NormalizationRule {
    pub name: &'static str,
    pub position: RulePosition,
    pattern: Regex,
}

impl NormalizationRule {
    /// Compile a rule. The pattern is anchored to the start or end of the
    /// text depending on `position` and matched case-insensitively.
    pub fn new(name: &'static str, position: RulePosition, pattern: &str) -> Result<Self> {
        let anchored = match position {
            RulePosition::Leading => format!("(?i)^(?:{})", pattern),
            RulePosition::Trailing => format!("(?i)(?:{})$", pattern),
        };
        Ok(Self {
            name,
            position,
            pattern: Regex::new(&anchored)?,
        })
    }

    /// Strip the matched part, returning the remainder if the rule fired
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let m = self.pattern.find(text)?;
        if m.is_empty() {
            return None;
        }
        match self.position {
            RulePosition::Leading => Some(&text[m.end()..]),
            RulePosition::Trailing => Some(&text[..m.start()]),
        }
    }
}

const LEADING_PATTERNS: &[(&str, &str)] = &[
    (
        "card_purchase",
        r"(?:kortköp|kortkop|debit card purchase|card purchase|pos purchase|pos|visa|purchase)[\s:]+",
    ),
    (
        "direct_debit",
        r"(?:autogiro|direct debit|ach debit|ach|e-?faktura)[\s:]+",
    ),
    (
        "wire_transfer",
        r"(?:överföring|overforing|bankgiro|plusgiro|bg|pg|wire transfer|wire|transfer|swish)[\s:]+",
    ),
    ("date_prefix", r"\d{2,4}[-/.]?\d{2}[-/.]?\d{2}\s+"),
    ("masked_card", r"(?:[*x]{4,}\d{0,4}|\d{4}[*x]{4,}\d{0,4})\s+"),
    (
        "reference_prefix",
        r"(?:ref(?:erence)?|nr)(?:\.|[\s:#])+[a-z0-9-]*\d[a-z0-9-]*\s+",
    ),
];

// 1-2 digit trailing numbers are left alone so names like "Studio 54" survive.
const TRAILING_PATTERNS: &[(&str, &str)] = &[
    (
        "reference_suffix",
        r"\s+(?:ref(?:erence)?|nr)(?:\.|[\s:#])+[a-z0-9-]*\d[a-z0-9-]*|\s*#\s*[a-z0-9-]*\d[a-z0-9-]*|[\s*]+\d{5,}",
    ),
    (
        "date_suffix",
        r"(?:\s*/\s*|\s+)\d{2,4}[-/.]\d{2}(?:[-/.]\d{2,4})?",
    ),
    ("asterisk_suffix", r"\s*\*+"),
    ("numeric_code_suffix", r"\s+\d{3,4}"),
];

static DEFAULT_RULES: LazyLock<Vec<NormalizationRule>> = LazyLock::new(|| {
    let leading = LEADING_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, RulePosition::Leading, *pattern));
    let trailing = TRAILING_PATTERNS
        .iter()
        .map(|(name, pattern)| (*name, RulePosition::Trailing, *pattern));

    leading
        .chain(trailing)
        .map(|(name, position, pattern)| {
            NormalizationRule::new(name, position, pattern).expect("valid regex")
        })
        .collect()
});

/// The built-in rule table, leading rules first
pub fn default_rules() -> &'static [NormalizationRule] {
    &DEFAULT_RULES
}

/// Run each rule once, in order, over the trimmed text.
///
/// Returns the remaining text and the names of the rules that fired.
pub fn apply_rules<'a>(
    rules: &[NormalizationRule],
    text: &'a str,
) -> (&'a str, Vec<&'static str>) {
    let mut working = text.trim();
    let mut applied = Vec::new();

    for rule in rules {
        if let Some(rest) = rule.strip(working) {
            working = rest.trim();
            applied.push(rule.name);
        }
    }

    (working, applied)
}

/// Result of normalizing a description, with the rules that fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub name: String,
    pub applied_rules: Vec<&'static str>,
}

/// Normalize a transaction description into a merchant key
pub fn normalize(description: &str) -> String {
    normalize_with_trace(description).name
}

/// Like [`normalize`], also reporting which rules fired
pub fn normalize_with_trace(description: &str) -> NormalizedName {
    let (stripped, applied_rules) = apply_rules(default_rules(), description);
    let collapsed = collapse_whitespace(stripped);

    let name = if collapsed.is_empty() {
        description.trim().to_string()
    } else {
        title_case(&collapsed)
    };

    NormalizedName {
        name,
        applied_rules,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title-case text, treating space, hyphen and slash as word boundaries.
///
/// Case mapping goes through `char::to_uppercase`/`to_lowercase`, so letters
/// outside ASCII (Å, É, Ø, ...) are handled.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if matches!(ch, ' ' | '-' | '/') {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}
