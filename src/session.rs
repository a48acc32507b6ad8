use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::{analyze, WeeklyReport};
use crate::benchmark::{annual_to_weekly, load_reference_data, BenchmarkComparator, Comparison};
use crate::budget::BudgetSet;
use crate::categorize::{load_rules, save_rules};
use crate::config::Config;
use crate::grouping::CategoryGroups;
use crate::import::{load_all, CsvSource, ImportReport};
use crate::models::{BudgetLine, CategoryRule, TransactionStore};

/// Loaded spending plus the user's saved settings, shared by the CLI and the TUI.
pub(crate) struct Session {
    config: Config,
    paths: Vec<PathBuf>,
    store: TransactionStore,
    reports: Vec<(String, ImportReport)>,
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
    pub(crate) grouped: bool,
    groups: CategoryGroups,
    budgets: BudgetSet,
    rules: Vec<CategoryRule>,
    comparator: BenchmarkComparator,
}

impl Session {
    pub(crate) fn new(config: Config) -> Self {
        let groups = CategoryGroups::load(&config.groups_path());
        let budgets = BudgetSet::load(&config.budgets_path());
        let rules = load_rules(&config.rules_path());
        let comparator =
            BenchmarkComparator::with_default_mapping(load_reference_data(&config.reference_path()));
        Self {
            config,
            paths: Vec::new(),
            store: TransactionStore::new(),
            reports: Vec::new(),
            start: None,
            end: None,
            grouped: false,
            groups,
            budgets,
            rules,
            comparator,
        }
    }

    /// Add CSV exports and reload everything.
    pub(crate) fn open(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.paths.extend(paths);
        self.reload();
    }

    /// Re-read every opened file with the current categorization rules.
    pub(crate) fn reload(&mut self) {
        let sources: Vec<CsvSource> = self
            .paths
            .iter()
            .map(|p| CsvSource::new(p.clone()).with_rules(self.rules.clone()))
            .collect();
        let (store, reports) = load_all(&sources);
        self.store = store;
        self.reports = reports;
    }

    pub(crate) fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub(crate) fn reports(&self) -> &[(String, ImportReport)] {
        &self.reports
    }

    pub(crate) fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub(crate) fn set_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
    }

    /// Aggregate the loaded data over the current window, by group when enabled.
    pub(crate) fn report(&self) -> Option<WeeklyReport> {
        if self.grouped && !self.groups.is_empty() {
            analyze(&self.groups.relabel_store(&self.store), self.start, self.end)
        } else {
            self.ungrouped_report()
        }
    }

    pub(crate) fn ungrouped_report(&self) -> Option<WeeklyReport> {
        analyze(&self.store, self.start, self.end)
    }

    /// Weekly series for a category in the current report, or for a group
    /// folded from the raw series when aggregating by category.
    pub(crate) fn trend(&self, label: &str) -> Option<Vec<(NaiveDate, Decimal)>> {
        let report = self.report()?;
        if report.category_series.contains_key(label) {
            return Some(report.series_for(label));
        }
        if !self.groups.groups().contains_key(label) {
            return None;
        }
        let folded = self.groups.apply_to_series(&report.category_series);
        let series = folded.get(label)?;
        Some(
            report
                .weeks
                .iter()
                .map(|w| (w.start, series.get(&w.start).copied().unwrap_or(Decimal::ZERO)))
                .collect(),
        )
    }

    // ── Groups ───────────────────────────────────────────────

    pub(crate) fn groups(&self) -> &CategoryGroups {
        &self.groups
    }

    pub(crate) fn set_group(&mut self, name: String, categories: Vec<String>) -> Result<()> {
        self.groups.set_group(name, categories);
        self.groups.save(&self.config.groups_path())
    }

    /// Range totals folded by group; ungrouped categories keep their label.
    pub(crate) fn group_totals(&self) -> BTreeMap<String, Decimal> {
        self.ungrouped_report()
            .map(|r| self.groups.apply_to_totals(&r.total_spending_by_category()))
            .unwrap_or_default()
    }

    /// Returns `false` if there was no such group.
    pub(crate) fn remove_group(&mut self, name: &str) -> Result<bool> {
        if !self.groups.remove_group(name) {
            return Ok(false);
        }
        self.groups.save(&self.config.groups_path())?;
        Ok(true)
    }

    // ── Budgets ──────────────────────────────────────────────

    pub(crate) fn budgets(&self) -> &BudgetSet {
        &self.budgets
    }

    pub(crate) fn set_budget(&mut self, category: String, weekly: Decimal) -> Result<()> {
        self.budgets.set(category, weekly);
        self.budgets.save(&self.config.budgets_path())
    }

    /// Budget lines against the report's per-category weekly averages.
    pub(crate) fn budget_lines(&self, report: Option<&WeeklyReport>) -> Vec<BudgetLine> {
        let empty = BTreeMap::new();
        let averages = report
            .map(|r| &r.average_spending_by_category)
            .unwrap_or(&empty);
        self.budgets.compare(averages)
    }

    // ── Rules ────────────────────────────────────────────────

    pub(crate) fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Save a new rule and re-read the opened files so it takes effect.
    pub(crate) fn add_rule(&mut self, rule: CategoryRule) -> Result<()> {
        self.rules.push(rule);
        save_rules(&self.config.rules_path(), &self.rules)?;
        self.reload();
        Ok(())
    }

    // ── Benchmark ────────────────────────────────────────────

    pub(crate) fn comparator(&self) -> &BenchmarkComparator {
        &self.comparator
    }

    /// Annualized weekly averages per raw category, set against the
    /// reference figures. Groups are ignored since the mapping is keyed by
    /// raw category labels.
    pub(crate) fn comparisons(&self) -> Vec<Comparison> {
        let Some(report) = self.ungrouped_report() else {
            return Vec::new();
        };
        let weeks_per_year = Decimal::from(52);
        let annual: BTreeMap<String, Decimal> = report
            .average_spending_by_category
            .iter()
            .map(|(c, avg)| (c.clone(), avg * weeks_per_year))
            .collect();
        self.comparator.compare(&annual)
    }

    /// Weekly reference figure for each raw category seen in the window,
    /// averaged over all of its mapped reference categories.
    pub(crate) fn category_references(&self) -> BTreeMap<String, Decimal> {
        let Some(report) = self.ungrouped_report() else {
            return BTreeMap::new();
        };
        report
            .categories()
            .filter_map(|c| {
                let annual = self.comparator.average_for_category(c)?;
                Some((c.to_string(), annual_to_weekly(annual)))
            })
            .collect()
    }

    /// Weekly reference spending for the categories seen in the window.
    pub(crate) fn weekly_benchmark(&self) -> Option<Decimal> {
        if !self.comparator.has_reference_data() {
            return None;
        }
        let report = self.ungrouped_report()?;
        Some(self.comparator.weekly_benchmark(report.categories()))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
