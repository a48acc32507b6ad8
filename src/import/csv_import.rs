use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::categorize::Categorizer;
use crate::models::{Transaction, TransactionStore, UNCATEGORIZED};

/// Column layout and sign convention of one bank's CSV export.
#[derive(Debug, Clone)]
pub(crate) struct CsvProfile {
    pub(crate) name: String,
    pub(crate) date_column: usize,
    pub(crate) description_column: usize,
    pub(crate) amount_column: Option<usize>,
    pub(crate) debit_column: Option<usize>,
    pub(crate) credit_column: Option<usize>,
    pub(crate) category_column: Option<usize>,
    /// Column holding "Debit"/"Credit" when the amount itself is unsigned.
    pub(crate) kind_column: Option<usize>,
    pub(crate) date_format: String,
    pub(crate) skip_rows: usize,
    /// Set when the export writes charges as negative numbers.
    pub(crate) negate_amounts: bool,
}

impl Default for CsvProfile {
    fn default() -> Self {
        Self {
            name: "Custom".into(),
            date_column: 0,
            description_column: 1,
            amount_column: Some(2),
            debit_column: None,
            credit_column: None,
            category_column: None,
            kind_column: None,
            date_format: "%m/%d/%Y".into(),
            skip_rows: 0,
            negate_amounts: false,
        }
    }
}

/// Raw contents of a CSV file, split into header and data rows.
#[derive(Debug, Clone)]
pub(crate) struct CsvPreview {
    /// Empty when the first line already looked like data.
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl CsvPreview {
    pub(crate) fn has_header(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Header names, or "Column N" placeholders for headerless files.
    pub(crate) fn column_names(&self) -> Vec<String> {
        if self.has_header() {
            return self.headers.clone();
        }
        let width = self.rows.first().map(Vec::len).unwrap_or(0);
        (0..width).map(|i| format!("Column {}", i + 1)).collect()
    }

    pub(crate) fn first_row(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Outcome of turning CSV rows into a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ImportReport {
    pub(crate) format: String,
    pub(crate) rows_read: usize,
    pub(crate) imported: usize,
    pub(crate) skipped_refunds: usize,
    pub(crate) categorized_by_rule: usize,
    pub(crate) uncategorized: usize,
    /// One message per row that could not be parsed.
    pub(crate) malformed: Vec<String>,
    pub(crate) earliest_year: Option<i32>,
    pub(crate) latest_year: Option<i32>,
}

impl ImportReport {
    pub(crate) fn failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            malformed: vec![message.into()],
            ..Self::default()
        }
    }

    fn track_year(&mut self, year: i32) {
        self.earliest_year = Some(self.earliest_year.map_or(year, |y| y.min(year)));
        self.latest_year = Some(self.latest_year.map_or(year, |y| y.max(year)));
    }

    /// "2023" or "2022-2024"; `None` when no row carried a usable date.
    pub(crate) fn year_span(&self) -> Option<String> {
        match (self.earliest_year, self.latest_year) {
            (Some(a), Some(b)) if a == b => Some(a.to_string()),
            (Some(a), Some(b)) => Some(format!("{a}-{b}")),
            _ => None,
        }
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read the CSV and return its header (if any) and all rows as strings.
    pub(crate) fn preview(path: &Path) -> Result<CsvPreview> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if all_rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        // Headers typically don't parse as dates or numbers
        let looks_like_header = all_rows[0].iter().all(|field| {
            let trimmed = field.trim();
            Decimal::from_str(trimmed.replace(['$', ','], "").trim()).is_err()
                && NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").is_err()
                && NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err()
        });

        let headers = if looks_like_header {
            all_rows.remove(0)
        } else {
            Vec::new()
        };
        Ok(CsvPreview {
            headers,
            rows: all_rows,
        })
    }

    /// Parse data rows into a store using the given profile.
    ///
    /// Bad rows are logged and reported, never fatal. Negative amounts are
    /// refunds or payments and only counted. When the export has no category
    /// for a row the categorizer gets a chance before `Uncategorized` sticks.
    pub(crate) fn load(
        rows: &[Vec<String>],
        profile: &CsvProfile,
        categorizer: &Categorizer,
    ) -> (TransactionStore, ImportReport) {
        let mut report = ImportReport {
            format: profile.name.clone(),
            ..ImportReport::default()
        };
        let mut transactions = Vec::new();

        for (i, row) in rows.iter().enumerate().skip(profile.skip_rows) {
            let date_str = cell(row, Some(profile.date_column));
            if date_str.is_empty() {
                continue;
            }
            report.rows_read += 1;

            let date = match parse_date(date_str, &profile.date_format) {
                Ok(d) => d,
                Err(e) => {
                    let message = format!("Row {}: {e}", i + 1);
                    tracing::warn!(profile = %profile.name, "{message}");
                    report.malformed.push(message);
                    continue;
                }
            };
            report.track_year(date.year());

            let amount = match parse_amount(row, profile) {
                Ok(a) => a,
                Err(e) => {
                    let message = format!("Row {}: {e:#}", i + 1);
                    tracing::warn!(profile = %profile.name, "{message}");
                    report.malformed.push(message);
                    continue;
                }
            };

            let category = match cell(row, profile.category_column) {
                "" => UNCATEGORIZED,
                c => c,
            };
            transactions.push(
                Transaction::new(date, category, amount)
                    .with_description(cell(row, Some(profile.description_column))),
            );
        }

        // Refunds are never stored, so rules only run over spending
        let (mut spending, refunds): (Vec<_>, Vec<_>) =
            transactions.into_iter().partition(Transaction::is_spending);
        report.categorized_by_rule = categorizer.categorize_batch(&mut spending);

        let mut store = TransactionStore::new();
        for txn in refunds.into_iter().chain(spending) {
            let uncategorized = txn.is_uncategorized();
            if store.insert(txn) {
                report.imported += 1;
                if uncategorized {
                    report.uncategorized += 1;
                }
            }
        }
        report.skipped_refunds = store.skipped_refunds();

        tracing::debug!(
            profile = %profile.name,
            imported = report.imported,
            refunds = report.skipped_refunds,
            malformed = report.malformed.len(),
            "Parsed CSV rows"
        );
        (store, report)
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|c| row.get(c))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn parse_date(s: &str, fmt: &str) -> Result<NaiveDate> {
    // Try the specified format first
    if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
        return Ok(d);
    }
    for fallback in &["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fallback) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date '{}'", s)
}

/// Amount with spending positive.
fn parse_amount(row: &[String], profile: &CsvProfile) -> Result<Decimal> {
    if profile.amount_column.is_some() {
        let amount = parse_decimal(cell(row, profile.amount_column))?;
        let amount = if profile.negate_amounts { -amount } else { amount };
        let is_credit = cell(row, profile.kind_column).eq_ignore_ascii_case("credit");
        return Ok(if is_credit { -amount.abs() } else { amount });
    }

    // Separate debit/credit columns
    let debit = cell(row, profile.debit_column);
    let credit = cell(row, profile.credit_column);
    if !debit.is_empty() {
        Ok(parse_decimal(debit)?.abs())
    } else if !credit.is_empty() {
        Ok(-parse_decimal(credit)?.abs())
    } else {
        anyhow::bail!("Missing amount")
    }
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        anyhow::bail!("Missing amount");
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_str(&cleaned.replace('"', "")))
        .with_context(|| format!("Failed to parse '{}' as an amount", s))
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
