use std::path::PathBuf;

use crate::categorize::Categorizer;
use crate::models::{CategoryRule, TransactionStore};

use super::{detect_bank_format, CsvImporter, CsvProfile, ImportReport};

/// Anything that can hand the aggregator a date-keyed store.
pub(crate) trait TransactionSource {
    /// Short name for logs and the status bar.
    fn label(&self) -> String;

    /// Never fails: problems are logged and described in the report.
    fn load(&self) -> (TransactionStore, ImportReport);
}

/// A bank or card CSV export on disk.
#[derive(Debug, Clone)]
pub(crate) struct CsvSource {
    path: PathBuf,
    rules: Vec<CategoryRule>,
}

impl CsvSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rules: Vec::new(),
        }
    }

    pub(crate) fn with_rules(mut self, rules: Vec<CategoryRule>) -> Self {
        self.rules = rules;
        self
    }
}

impl TransactionSource for CsvSource {
    fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self) -> (TransactionStore, ImportReport) {
        let preview = match CsvImporter::preview(&self.path) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error loading data: {e:#}");
                return (
                    TransactionStore::new(),
                    ImportReport::failed("Unreadable", format!("{e:#}")),
                );
            }
        };

        let profile = detect_bank_format(&preview.headers, preview.first_row()).unwrap_or_else(|| {
            tracing::info!(
                path = %self.path.display(),
                columns = ?preview.column_names(),
                "Unrecognised export, assuming date, description, amount"
            );
            CsvProfile::default()
        });

        let (categorizer, bad_patterns) = Categorizer::new(&self.rules);
        for pattern in bad_patterns {
            tracing::warn!("Ignoring invalid regex rule '{pattern}'");
        }

        let (store, report) = CsvImporter::load(&preview.rows, &profile, &categorizer);
        tracing::info!(
            path = %self.path.display(),
            format = %report.format,
            transactions = report.imported,
            days = store.day_count(),
            "Loaded spending data"
        );
        (store, report)
    }
}

/// An already-built store, used when data comes from somewhere other than a file.
impl TransactionSource for TransactionStore {
    fn label(&self) -> String {
        "in-memory".into()
    }

    fn load(&self) -> (TransactionStore, ImportReport) {
        let report = ImportReport {
            format: "In-memory".into(),
            rows_read: self.len(),
            imported: self.len(),
            skipped_refunds: self.skipped_refunds(),
            ..ImportReport::default()
        };
        (self.clone(), report)
    }
}

/// Load every source and merge them into one store, in order.
pub(crate) fn load_all<S: TransactionSource>(
    sources: &[S],
) -> (TransactionStore, Vec<(String, ImportReport)>) {
    let mut merged = TransactionStore::new();
    let mut reports = Vec::with_capacity(sources.len());
    for source in sources {
        let (store, report) = source.load();
        merged.merge(&store);
        reports.push((source.label(), report));
    }
    (merged, reports)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
