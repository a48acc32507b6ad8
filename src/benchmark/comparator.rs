use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// User category → reference categories, primary reference first.
pub(crate) type CategoryMapping = BTreeMap<String, Vec<String>>;

/// Reference category → annual amount.
pub(crate) type ReferenceData = BTreeMap<String, Decimal>;

const WEEKS_PER_YEAR: u32 = 52;

pub(crate) fn annual_to_weekly(annual: Decimal) -> Decimal {
    annual / Decimal::from(WEEKS_PER_YEAR)
}

/// Read a JSON object of reference category → annual amount.
///
/// A missing or unreadable file is logged and yields an empty table, which
/// makes every lookup come back unavailable.
pub(crate) fn load_reference_data(path: &Path) -> ReferenceData {
    match read_reference_data(path) {
        Ok(data) => {
            tracing::info!(
                path = %path.display(),
                categories = data.len(),
                "loaded benchmark reference data"
            );
            data
        }
        Err(e) => {
            tracing::warn!("benchmark reference data unavailable: {e:#}");
            ReferenceData::new()
        }
    }
}

fn read_reference_data(path: &Path) -> Result<ReferenceData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid reference data in {}", path.display()))
}

/// Observed spending for one reference category next to its reference figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comparison {
    pub(crate) reference_category: String,
    pub(crate) user_categories: Vec<String>,
    pub(crate) user_total: Decimal,
    /// `None` when the reference table has no figure for this category.
    pub(crate) reference: Option<Decimal>,
}

impl Comparison {
    pub(crate) fn difference(&self) -> Option<Decimal> {
        self.reference.map(|r| self.user_total - r)
    }

    pub(crate) fn difference_pct(&self) -> Option<Decimal> {
        let reference = self.reference.filter(|r| *r > Decimal::ZERO)?;
        Some((self.user_total - reference) / reference * Decimal::ONE_HUNDRED)
    }
}

pub(crate) struct BenchmarkComparator {
    mapping: CategoryMapping,
    reference: ReferenceData,
}

impl BenchmarkComparator {
    pub(crate) fn new(mapping: CategoryMapping, reference: ReferenceData) -> Self {
        Self { mapping, reference }
    }

    pub(crate) fn with_default_mapping(reference: ReferenceData) -> Self {
        Self::new(super::default_category_mapping(), reference)
    }

    pub(crate) fn has_reference_data(&self) -> bool {
        !self.reference.is_empty()
    }

    pub(crate) fn reference_categories(&self, user_category: &str) -> &[String] {
        self.mapping
            .get(user_category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mean annual reference amount across every reference category mapped
    /// from `user_category`. Categories without data are left out of the mean.
    pub(crate) fn average_for_category(&self, user_category: &str) -> Option<Decimal> {
        let refs = self.reference_categories(user_category);
        if refs.is_empty() {
            tracing::debug!(user_category, "no reference mapping");
            return None;
        }
        let values: Vec<Decimal> = refs
            .iter()
            .filter_map(|r| self.reference.get(r).copied())
            .collect();
        if values.is_empty() {
            tracing::debug!(user_category, ?refs, "no reference data for mapped categories");
            return None;
        }
        let sum: Decimal = values.iter().sum();
        Some(sum / Decimal::from(values.len()))
    }

    /// Accumulate user totals under each category's primary reference and
    /// set them against the reference figure. Unmapped categories are skipped.
    pub(crate) fn compare(&self, user_totals: &BTreeMap<String, Decimal>) -> Vec<Comparison> {
        let mut rows: BTreeMap<&str, Comparison> = BTreeMap::new();
        for (user_category, amount) in user_totals {
            let Some(primary) = self.reference_categories(user_category).first() else {
                continue;
            };
            let row = rows.entry(primary.as_str()).or_insert_with(|| Comparison {
                reference_category: primary.clone(),
                user_categories: Vec::new(),
                user_total: Decimal::ZERO,
                reference: self.reference.get(primary).copied(),
            });
            row.user_categories.push(user_category.clone());
            row.user_total += amount;
        }
        rows.into_values().collect()
    }

    /// Weekly reference figure for everything touched by `observed` categories:
    /// the annual amounts of all distinct mapped reference categories, summed, over 52.
    pub(crate) fn weekly_benchmark<'a, I>(&self, observed: I) -> Decimal
    where
        I: IntoIterator<Item = &'a str>,
    {
        let touched: BTreeSet<&str> = observed
            .into_iter()
            .flat_map(|c| self.reference_categories(c))
            .map(String::as_str)
            .collect();
        let annual: Decimal = touched
            .iter()
            .map(|r| self.reference.get(*r).copied().unwrap_or(Decimal::ZERO))
            .sum();
        annual_to_weekly(annual)
    }
}
