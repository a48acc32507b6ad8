#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::Transaction;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn food_groups() -> CategoryGroups {
    let mut groups = CategoryGroups::default();
    groups.set_group(
        "Food".into(),
        vec!["Restaurants".into(), "Supermarkets".into(), "Fast Food".into()],
    );
    groups.set_group("Transport".into(), vec!["Gasoline".into(), "Uber".into()]);
    groups
}

// ── mapping ───────────────────────────────────────────────────

#[test]
fn test_mapping_points_originals_at_groups() {
    let groups = food_groups();
    let mapping = groups.mapping();
    assert_eq!(mapping.get("Restaurants"), Some(&"Food"));
    assert_eq!(mapping.get("Uber"), Some(&"Transport"));
    assert_eq!(mapping.get("Rent"), None);
    assert_eq!(mapping.len(), 5);
}

#[test]
fn test_empty_groups_map_nothing() {
    let groups = CategoryGroups::default();
    assert!(groups.is_empty());
    assert!(groups.mapping().is_empty());
}

// ── apply_to_totals ───────────────────────────────────────────

#[test]
fn test_apply_to_totals_merges_and_keeps_ungrouped() {
    let groups = food_groups();
    let data: BTreeMap<String, Decimal> = [
        ("Restaurants".to_string(), dec!(40)),
        ("Supermarkets".to_string(), dec!(60)),
        ("Gasoline".to_string(), dec!(25)),
        ("Rent".to_string(), dec!(1200)),
    ]
    .into_iter()
    .collect();
    let grouped = groups.apply_to_totals(&data);
    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped["Food"], dec!(100));
    assert_eq!(grouped["Transport"], dec!(25));
    assert_eq!(grouped["Rent"], dec!(1200));
}

#[test]
fn test_apply_to_totals_preserves_sum() {
    let groups = food_groups();
    let data: BTreeMap<String, Decimal> = [
        ("Restaurants".to_string(), dec!(1.10)),
        ("Fast Food".to_string(), dec!(2.20)),
        ("Books".to_string(), dec!(3.30)),
    ]
    .into_iter()
    .collect();
    let before: Decimal = data.values().sum();
    let after: Decimal = groups.apply_to_totals(&data).values().sum();
    assert_eq!(before, after);
}

// ── apply_to_series ───────────────────────────────────────────

#[test]
fn test_apply_to_series_sums_same_week() {
    let groups = food_groups();
    let mut series: BTreeMap<String, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
    series
        .entry("Restaurants".into())
        .or_default()
        .insert(day(2024, 1, 1), dec!(10));
    series
        .entry("Fast Food".into())
        .or_default()
        .insert(day(2024, 1, 1), dec!(5));
    series
        .entry("Fast Food".into())
        .or_default()
        .insert(day(2024, 1, 8), dec!(7));
    let grouped = groups.apply_to_series(&series);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped["Food"][&day(2024, 1, 1)], dec!(15));
    assert_eq!(grouped["Food"][&day(2024, 1, 8)], dec!(7));
}

// ── grouped_categories / originals_for_group ──────────────────

#[test]
fn test_grouped_categories() {
    let groups = food_groups();
    let originals: BTreeSet<String> = ["Restaurants", "Uber", "Gasoline", "Rent"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let grouped = groups.grouped_categories(&originals);
    let expected: BTreeSet<String> = ["Rent", "Food", "Transport"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(grouped, expected);
}

#[test]
fn test_originals_for_group() {
    let groups = food_groups();
    assert_eq!(groups.originals_for_group("Transport"), vec!["Gasoline", "Uber"]);
    assert_eq!(groups.originals_for_group("Rent"), vec!["Rent"]);
}

#[test]
fn test_remove_group() {
    let mut groups = food_groups();
    assert!(groups.remove_group("Food"));
    assert!(!groups.remove_group("Food"));
    assert_eq!(groups.groups().len(), 1);
}

// ── relabel_store ─────────────────────────────────────────────

#[test]
fn test_relabel_store_before_aggregation() {
    let groups = food_groups();
    let store: TransactionStore = vec![
        Transaction::new(day(2024, 1, 2), "Restaurants", dec!(12)),
        Transaction::new(day(2024, 1, 2), "Fast Food", dec!(8)),
        Transaction::new(day(2024, 1, 3), "Rent", dec!(900)),
    ]
    .into_iter()
    .collect();
    let relabeled = groups.relabel_store(&store);
    let report = crate::analysis::analyze(&relabeled, None, None).unwrap();
    let week = &report.weekly_spending_by_category[&day(2024, 1, 2)];
    assert_eq!(week["Food"], dec!(20));
    assert_eq!(week["Rent"], dec!(900));
    assert!(!week.contains_key("Restaurants"));
}

#[test]
fn test_grouping_before_or_after_aggregation_agrees() {
    let groups = food_groups();
    let store: TransactionStore = vec![
        Transaction::new(day(2024, 1, 2), "Restaurants", dec!(12)),
        Transaction::new(day(2024, 1, 9), "Supermarkets", dec!(30)),
        Transaction::new(day(2024, 1, 10), "Uber", dec!(18)),
    ]
    .into_iter()
    .collect();
    let raw = crate::analysis::analyze(&store, None, None).unwrap();
    let pre = crate::analysis::analyze(&groups.relabel_store(&store), None, None).unwrap();
    assert_eq!(
        groups.apply_to_totals(&raw.total_spending_by_category()),
        pre.total_spending_by_category()
    );
    assert_eq!(groups.apply_to_series(&raw.category_series), pre.category_series);
}

// ── load / save ───────────────────────────────────────────────

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("category_groups.json");
    let groups = food_groups();
    groups.save(&path).unwrap();
    let loaded = CategoryGroups::load(&path);
    assert_eq!(loaded, groups);
}

#[test]
fn test_load_reads_plain_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");
    std::fs::write(&path, r#"{"Health": ["Doctor", "Pharmacy"]}"#).unwrap();
    let loaded = CategoryGroups::load(&path);
    assert_eq!(loaded.originals_for_group("Health"), vec!["Doctor", "Pharmacy"]);
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CategoryGroups::load(&dir.path().join("missing.json")).is_empty());
}

#[test]
fn test_load_malformed_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groups.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(CategoryGroups::load(&path).is_empty());
}

#[test]
fn test_save_to_unwritable_path_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be
    let path = dir.path().join("groups.json");
    std::fs::create_dir(&path).unwrap();
    assert!(food_groups().save(&path).is_err());
}
