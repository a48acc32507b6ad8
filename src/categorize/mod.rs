use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::models::{CategoryRule, Transaction};

/// Assigns categories from description text for exports that carry none.
pub(crate) struct Categorizer {
    rules: Vec<CompiledRule>,
}

struct CompiledRule {
    pattern: String,
    regex: Option<Regex>,
    category: String,
    is_regex: bool,
}

impl Categorizer {
    /// Compile `rules` in order. Returns the categorizer and the patterns of
    /// any regex rules that failed to compile (those rules never match).
    pub(crate) fn new(rules: &[CategoryRule]) -> (Self, Vec<String>) {
        let mut bad_patterns = Vec::new();
        let compiled = rules
            .iter()
            .map(|r| {
                let regex = if r.is_regex {
                    match RegexBuilder::new(&r.pattern).case_insensitive(true).build() {
                        Ok(re) => Some(re),
                        Err(_) => {
                            bad_patterns.push(r.pattern.clone());
                            None
                        }
                    }
                } else {
                    None
                };
                CompiledRule {
                    pattern: r.pattern.to_lowercase(),
                    regex,
                    category: r.category.clone(),
                    is_regex: r.is_regex,
                }
            })
            .collect();

        (Self { rules: compiled }, bad_patterns)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule wins.
    pub(crate) fn categorize(&self, description: &str) -> Option<&str> {
        let desc_lower = description.to_lowercase();

        for rule in &self.rules {
            let matched = if rule.is_regex {
                rule.regex
                    .as_ref()
                    .is_some_and(|re| re.is_match(description))
            } else {
                desc_lower.contains(&rule.pattern)
            };

            if matched {
                return Some(&rule.category);
            }
        }

        None
    }

    /// Fill in categories for uncategorized transactions; returns how many were set.
    pub(crate) fn categorize_batch(&self, transactions: &mut [Transaction]) -> usize {
        if self.is_empty() {
            return 0;
        }
        let mut count = 0;
        for txn in transactions.iter_mut() {
            if txn.is_uncategorized() {
                if let Some(category) = self.categorize(&txn.description) {
                    txn.category = category.to_string();
                    count += 1;
                }
            }
        }
        count
    }
}

/// Read categorization rules from a JSON array. Missing file means no rules.
pub(crate) fn load_rules(path: &Path) -> Vec<CategoryRule> {
    if !path.exists() {
        return Vec::new();
    }
    let loaded: Result<Vec<CategoryRule>> = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))
        .and_then(|raw| {
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))
        });
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Error loading categorization rules: {e:#}");
        Vec::new()
    })
}

pub(crate) fn save_rules(path: &Path, rules: &[CategoryRule]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(rules)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write rules to {}", path.display()))
}

/// Suggest a contains-pattern for a merchant description.
pub(crate) fn suggest_rule(description: &str) -> String {
    // Extract the most likely merchant/vendor name
    let cleaned = description
        .to_uppercase()
        .replace(|c: char| c.is_ascii_digit(), "")
        .replace('#', "")
        .replace('*', " ")
        .trim()
        .to_string();

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let pattern = if words.len() >= 2 {
        format!("{} {}", words[0], words[1])
    } else if !words.is_empty() {
        words[0].to_string()
    } else {
        description.to_string()
    };

    pattern.to_lowercase()
}
