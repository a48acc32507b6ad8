//! User-defined merging of raw category labels into named groups.
//!
//! Grouping never touches the aggregator. It relabels a store before
//! aggregation, or folds report outputs afterwards, so rules can change
//! without recomputing the raw aggregates.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct CategoryGroups {
    groups: BTreeMap<String, Vec<String>>,
}

impl CategoryGroups {
    /// Load groups from `path`. A missing file means no groups; an unreadable
    /// or malformed one is logged and also treated as no groups.
    pub(crate) fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match read_json(path) {
            Ok(groups) => groups,
            Err(e) => {
                tracing::warn!("Error loading category groups: {e:#}");
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
            .with_context(|| format!("Failed to write category groups to {}", path.display()))
    }

    pub(crate) fn groups(&self) -> &BTreeMap<String, Vec<String>> {
        &self.groups
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn set_group(&mut self, name: String, categories: Vec<String>) {
        self.groups.insert(name, categories);
    }

    pub(crate) fn remove_group(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    /// Original category → group name, for every grouped category.
    pub(crate) fn mapping(&self) -> HashMap<&str, &str> {
        let mut mapping = HashMap::new();
        for (group, categories) in &self.groups {
            for category in categories {
                mapping.insert(category.as_str(), group.as_str());
            }
        }
        mapping
    }

    /// Fold totals keyed by original category into totals keyed by group.
    /// Ungrouped categories keep their own label.
    pub(crate) fn apply_to_totals(
        &self,
        data: &BTreeMap<String, Decimal>,
    ) -> BTreeMap<String, Decimal> {
        let mapping = self.mapping();
        let mut grouped = BTreeMap::new();
        for (category, amount) in data {
            let label = mapping.get(category.as_str()).copied().unwrap_or(category.as_str());
            *grouped.entry(label.to_string()).or_insert(Decimal::ZERO) += amount;
        }
        grouped
    }

    /// Fold a per-category weekly series the same way as [`Self::apply_to_totals`].
    pub(crate) fn apply_to_series(
        &self,
        series: &BTreeMap<String, BTreeMap<NaiveDate, Decimal>>,
    ) -> BTreeMap<String, BTreeMap<NaiveDate, Decimal>> {
        let mapping = self.mapping();
        let mut grouped: BTreeMap<String, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
        for (category, weeks) in series {
            let label = mapping.get(category.as_str()).copied().unwrap_or(category.as_str());
            let target = grouped.entry(label.to_string()).or_default();
            for (week, amount) in weeks {
                *target.entry(*week).or_insert(Decimal::ZERO) += amount;
            }
        }
        grouped
    }

    pub(crate) fn grouped_categories(&self, originals: &BTreeSet<String>) -> BTreeSet<String> {
        let mapping = self.mapping();
        originals
            .iter()
            .map(|c| mapping.get(c.as_str()).copied().unwrap_or(c.as_str()).to_string())
            .collect()
    }

    /// Members of `group_name`; a name that is not a group stands for itself.
    pub(crate) fn originals_for_group(&self, group_name: &str) -> Vec<String> {
        self.groups
            .get(group_name)
            .cloned()
            .unwrap_or_else(|| vec![group_name.to_string()])
    }

    /// Copy of `store` with grouped categories renamed, for aggregating by group.
    pub(crate) fn relabel_store(&self, store: &TransactionStore) -> TransactionStore {
        let mapping = self.mapping();
        store.relabel(|c| mapping.get(c).copied().unwrap_or(c).to_string())
    }
}

fn read_json(path: &Path) -> Result<CategoryGroups> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

#[cfg(test)]
mod tests;
