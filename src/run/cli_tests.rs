#![allow(clippy::unwrap_used)]

use super::*;

fn a(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── parse_args ────────────────────────────────────────────────

#[test]
fn test_parse_args_files_only() {
    let parsed = parse_args(&a(&["one.csv", "two.csv"])).unwrap();
    assert_eq!(parsed.positional, vec!["one.csv", "two.csv"]);
    assert_eq!(parsed.from, None);
    assert!(!parsed.grouped);
}

#[test]
fn test_parse_args_window_and_flags() {
    let parsed = parse_args(&a(&[
        "--from",
        "2024-01-01",
        "card.csv",
        "--to",
        "2024-03-31",
        "--grouped",
    ]))
    .unwrap();
    assert_eq!(parsed.positional, vec!["card.csv"]);
    assert_eq!(parsed.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(parsed.to, NaiveDate::from_ymd_opt(2024, 3, 31));
    assert!(parsed.grouped);
}

#[test]
fn test_parse_args_reference() {
    let parsed = parse_args(&a(&["card.csv", "--reference", "/tmp/ces.json"])).unwrap();
    assert_eq!(parsed.reference, Some(PathBuf::from("/tmp/ces.json")));
}

#[test]
fn test_parse_args_bad_date() {
    assert!(parse_args(&a(&["--from", "01/01/2024"])).is_err());
}

#[test]
fn test_parse_args_missing_value() {
    assert!(parse_args(&a(&["card.csv", "--to"])).is_err());
}

#[test]
fn test_parse_args_unknown_option() {
    assert!(parse_args(&a(&["--weekly"])).is_err());
}

// ── split_categories ──────────────────────────────────────────

#[test]
fn test_split_categories() {
    assert_eq!(
        split_categories("Gasoline, Auto Parts,,Tolls "),
        vec!["Gasoline", "Auto Parts", "Tolls"]
    );
    assert!(split_categories(" , ").is_empty());
}

// ── shellexpand ───────────────────────────────────────────────

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/a.csv"), "/tmp/a.csv");
    assert_eq!(shellexpand("a.csv"), "a.csv");
}

#[test]
fn test_shellexpand_home() {
    let expanded = shellexpand("~/a.csv");
    assert!(expanded.ends_with("/a.csv"));
    assert!(!expanded.starts_with('~'));
}
