//! Weekly budget targets per category, persisted as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BudgetLine;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct BudgetSet {
    weekly: BTreeMap<String, Decimal>,
}

impl BudgetSet {
    pub(crate) fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))
            });
        match loaded {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!("Error loading budgets: {e:#}");
                Self::default()
            }
        }
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write budgets to {}", path.display()))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.weekly.is_empty()
    }

    pub(crate) fn get(&self, category: &str) -> Option<Decimal> {
        self.weekly.get(category).copied()
    }

    /// Set a weekly budget; a zero or negative amount removes it.
    pub(crate) fn set(&mut self, category: String, weekly: Decimal) {
        if weekly <= Decimal::ZERO {
            self.weekly.remove(&category);
        } else {
            self.weekly.insert(category, weekly);
        }
    }

    /// One line per budgeted category against weekly per-category averages.
    pub(crate) fn compare(&self, averages: &BTreeMap<String, Decimal>) -> Vec<BudgetLine> {
        self.weekly
            .iter()
            .map(|(category, budget)| BudgetLine {
                category: category.clone(),
                weekly_budget: *budget,
                actual_average: averages.get(category).copied(),
            })
            .collect()
    }
}
