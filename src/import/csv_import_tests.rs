#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::CategoryRule;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

fn no_rules() -> Categorizer {
    Categorizer::new(&[]).0
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("100.50").unwrap(), dec!(100.50));
    assert_eq!(parse_decimal("-42.99").unwrap(), dec!(-42.99));
}

#[test]
fn test_parse_decimal_with_currency() {
    assert_eq!(parse_decimal("$1,234.56").unwrap(), dec!(1234.56));
    assert_eq!(parse_decimal("-$99.99").unwrap(), dec!(-99.99));
}

#[test]
fn test_parse_decimal_parentheses_negative() {
    assert_eq!(parse_decimal("(500.00)").unwrap(), dec!(-500.00));
}

#[test]
fn test_parse_decimal_empty_is_missing() {
    assert!(parse_decimal("").is_err());
    assert!(parse_decimal("  ").is_err());
    assert!(parse_decimal("$").is_err());
}

#[test]
fn test_parse_decimal_quoted() {
    assert_eq!(parse_decimal("\"100.00\"").unwrap(), dec!(100.00));
}

#[test]
fn test_parse_decimal_invalid() {
    assert!(parse_decimal("not_a_number").is_err());
}

// ── parse_date ────────────────────────────────────────────────

#[test]
fn test_parse_date_us_format() {
    assert_eq!(parse_date("01/15/2024", "%m/%d/%Y").unwrap(), d(2024, 1, 15));
}

#[test]
fn test_parse_date_fallback() {
    // Wrong primary format falls back to the common ones
    assert_eq!(parse_date("2024-01-15", "%m/%d/%Y").unwrap(), d(2024, 1, 15));
}

#[test]
fn test_parse_date_two_digit_year() {
    assert_eq!(parse_date("01/15/24", "%m/%d/%y").unwrap(), d(2024, 1, 15));
}

#[test]
fn test_parse_date_invalid() {
    assert!(parse_date("not-a-date", "%m/%d/%Y").is_err());
    assert!(parse_date("", "%m/%d/%Y").is_err());
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_single_column() {
    let profile = CsvProfile::default();
    let r = row(&["01/15/2024", "Coffee", "4.50"]);
    assert_eq!(parse_amount(&r, &profile).unwrap(), dec!(4.50));
}

#[test]
fn test_parse_amount_negate() {
    let profile = CsvProfile {
        negate_amounts: true,
        ..CsvProfile::default()
    };
    let charge = row(&["01/15/2024", "Coffee", "-4.50"]);
    assert_eq!(parse_amount(&charge, &profile).unwrap(), dec!(4.50));
    let payment = row(&["01/16/2024", "Payment", "200.00"]);
    assert_eq!(parse_amount(&payment, &profile).unwrap(), dec!(-200.00));
}

#[test]
fn test_parse_amount_debit_credit_columns() {
    let profile = CsvProfile {
        amount_column: None,
        debit_column: Some(2),
        credit_column: Some(3),
        ..CsvProfile::default()
    };
    let debit_row = row(&["01/15/2024", "Coffee", "4.50", ""]);
    assert_eq!(parse_amount(&debit_row, &profile).unwrap(), dec!(4.50));

    let credit_row = row(&["01/15/2024", "Refund", "", "1000.00"]);
    assert_eq!(parse_amount(&credit_row, &profile).unwrap(), dec!(-1000.00));

    let empty_row = row(&["01/15/2024", "Something", "", ""]);
    assert!(parse_amount(&empty_row, &profile).is_err());
}

#[test]
fn test_parse_amount_kind_column() {
    let profile = CsvProfile {
        kind_column: Some(3),
        ..CsvProfile::default()
    };
    let debit = row(&["01/15/2024", "Coffee", "4.50", "Debit"]);
    assert_eq!(parse_amount(&debit, &profile).unwrap(), dec!(4.50));
    let credit = row(&["01/15/2024", "Paycheck", "900.00", "Credit"]);
    assert_eq!(parse_amount(&credit, &profile).unwrap(), dec!(-900.00));
}

// ── CsvImporter::preview ──────────────────────────────────────

#[test]
fn test_preview_with_headers() {
    let csv = "Date,Description,Amount\n01/15/2024,Coffee,4.50\n01/16/2024,Lunch,12.00\n";
    let file = make_csv_file(csv);
    let preview = CsvImporter::preview(file.path()).unwrap();
    assert!(preview.has_header());
    assert_eq!(preview.headers, vec!["Date", "Description", "Amount"]);
    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.rows[0][1], "Coffee");
}

#[test]
fn test_preview_without_headers() {
    // Wells Fargo-style: no headers, starts with data
    let csv = "01/15/2024,-4.50,*,123,COFFEE SHOP\n01/16/2024,-12.00,*,456,RESTAURANT\n";
    let file = make_csv_file(csv);
    let preview = CsvImporter::preview(file.path()).unwrap();
    assert!(!preview.has_header());
    assert_eq!(preview.column_names()[0], "Column 1");
    assert_eq!(preview.column_names().len(), 5);
    assert_eq!(preview.rows.len(), 2);
}

#[test]
fn test_preview_empty_file() {
    let file = make_csv_file("");
    assert!(CsvImporter::preview(file.path()).is_err());
}

#[test]
fn test_preview_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CsvImporter::preview(&dir.path().join("nope.csv")).is_err());
}

#[test]
fn test_preview_quoted_fields() {
    let csv = "Date,Description,Amount\n01/15/2024,\"Coffee, Shop\",4.50\n";
    let file = make_csv_file(csv);
    let preview = CsvImporter::preview(file.path()).unwrap();
    assert_eq!(preview.rows[0][1], "Coffee, Shop");
}

// ── CsvImporter::load ─────────────────────────────────────────

#[test]
fn test_load_basic_rows() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50"]),
        row(&["01/16/2024", "Lunch", "12.00"]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 2);
    assert_eq!(report.imported, 2);
    assert_eq!(report.rows_read, 2);
    let coffee = &store.on(d(2024, 1, 15))[0];
    assert_eq!(coffee.description, "Coffee");
    assert_eq!(coffee.amount, dec!(4.50));
    assert_eq!(coffee.category, UNCATEGORIZED);
}

#[test]
fn test_load_skips_refunds() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50"]),
        row(&["01/15/2024", "Return", "-20.00"]),
        row(&["01/16/2024", "Payment", "-300.00"]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 1);
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped_refunds, 2);
    assert!(report.malformed.is_empty());
}

#[test]
fn test_load_reports_malformed_rows_and_continues() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50"]),
        row(&["garbage", "Lunch", "12.00"]),
        row(&["01/17/2024", "Dinner", "abc"]),
        row(&["01/18/2024", "Snack", "2.00"]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 2);
    assert_eq!(report.malformed.len(), 2);
    assert!(report.malformed[0].starts_with("Row 2"));
    assert!(report.malformed[1].starts_with("Row 3"));
}

#[test]
fn test_load_blank_amount_is_malformed_not_zero() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["01/01/2024", "Coffee", "10.00"]),
        row(&["01/08/2024", "Coffee", ""]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 1);
    assert_eq!(report.imported, 1);
    assert_eq!(report.malformed.len(), 1);
    assert!(report.malformed[0].starts_with("Row 2"));
    assert!(store.on(d(2024, 1, 8)).is_empty());

    let weekly = crate::analysis::analyze(&store, None, None).unwrap();
    assert_eq!(weekly.average_spending_by_category[UNCATEGORIZED], dec!(10.00));
}

#[test]
fn test_load_blank_debit_and_credit_is_malformed() {
    let profile = CsvProfile {
        amount_column: None,
        debit_column: Some(2),
        credit_column: Some(3),
        ..CsvProfile::default()
    };
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50", ""]),
        row(&["01/16/2024", "Pending", "", ""]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 1);
    assert_eq!(report.malformed.len(), 1);
    assert!(report.malformed[0].contains("Missing amount"));
}

#[test]
fn test_load_skips_empty_dates() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50"]),
        row(&["", "", ""]),
        row(&["01/16/2024", "Lunch", "12.00"]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 2);
    assert_eq!(report.rows_read, 2);
    assert!(report.malformed.is_empty());
}

#[test]
fn test_load_skip_rows() {
    let profile = CsvProfile {
        skip_rows: 1,
        ..CsvProfile::default()
    };
    let rows = vec![
        row(&["SKIP THIS ROW", "ignore", "0"]),
        row(&["01/15/2024", "Coffee", "4.50"]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.len(), 1);
    assert!(report.malformed.is_empty());
}

#[test]
fn test_load_uses_category_column() {
    let profile = CsvProfile {
        category_column: Some(3),
        ..CsvProfile::default()
    };
    let rows = vec![
        row(&["01/15/2024", "Coffee", "4.50", "Restaurants"]),
        row(&["01/16/2024", "Mystery", "9.00", ""]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(store.on(d(2024, 1, 15))[0].category, "Restaurants");
    assert_eq!(store.on(d(2024, 1, 16))[0].category, UNCATEGORIZED);
    assert_eq!(report.uncategorized, 1);
}

#[test]
fn test_load_applies_rules_only_where_export_has_no_category() {
    let profile = CsvProfile {
        category_column: Some(3),
        ..CsvProfile::default()
    };
    let rules = vec![
        CategoryRule::new_contains("coffee".into(), "Cafes".into()),
        CategoryRule::new_contains("shell".into(), "Gasoline".into()),
    ];
    let (categorizer, _) = Categorizer::new(&rules);
    let rows = vec![
        row(&["01/15/2024", "COFFEE BAR", "4.50", "Restaurants"]),
        row(&["01/16/2024", "SHELL OIL 123", "40.00", ""]),
    ];
    let (store, report) = CsvImporter::load(&rows, &profile, &categorizer);
    assert_eq!(store.on(d(2024, 1, 15))[0].category, "Restaurants");
    assert_eq!(store.on(d(2024, 1, 16))[0].category, "Gasoline");
    assert_eq!(report.categorized_by_rule, 1);
    assert_eq!(report.uncategorized, 0);
}

#[test]
fn test_load_tracks_years() {
    let profile = CsvProfile::default();
    let rows = vec![
        row(&["12/30/2022", "Coffee", "4.50"]),
        row(&["01/02/2024", "Refund", "-4.50"]),
        row(&["06/01/2023", "Lunch", "12.00"]),
    ];
    let (_, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert_eq!(report.earliest_year, Some(2022));
    assert_eq!(report.latest_year, Some(2024));
    assert_eq!(report.year_span().as_deref(), Some("2022-2024"));
}

#[test]
fn test_load_empty_rows() {
    let profile = CsvProfile::default();
    let rows: Vec<Vec<String>> = vec![];
    let (store, report) = CsvImporter::load(&rows, &profile, &no_rules());
    assert!(store.is_empty());
    assert_eq!(report.year_span(), None);
    assert_eq!(report.format, "Custom");
}
