#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::categorize::Categorizer;
use crate::import::{CsvImporter, ImportReport};
use crate::models::{Transaction, TransactionStore, UNCATEGORIZED};

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Detect the export from its header and first row, then load every row.
fn import(headers: &[&str], rows: &[&[&str]]) -> (CsvProfile, TransactionStore, ImportReport) {
    let headers = cells(headers);
    let rows: Vec<Vec<String>> = rows.iter().map(|r| cells(r)).collect();
    let profile = detect_bank_format(&headers, &rows[0]).unwrap();
    let (store, report) = CsvImporter::load(&rows, &profile, &Categorizer::new(&[]).0);
    (profile, store, report)
}

/// The single spending row that survived import.
fn spent(store: &TransactionStore) -> &Transaction {
    assert_eq!(store.len(), 1, "expected exactly one spending row");
    store.transactions().next().unwrap()
}

fn on(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn assert_spent(store: &TransactionStore, date: NaiveDate, category: &str, amount: Decimal) {
    let txn = spent(store);
    assert_eq!(txn.date, date);
    assert_eq!(txn.category, category);
    assert_eq!(txn.amount, amount);
}

// ── Headerless exports ────────────────────────────────────────

#[test]
fn test_wells_fargo_charge_and_deposit() {
    let (profile, store, report) = import(
        &[],
        &[
            &["03/02/2023", "-61.17", "*", "", "SAFEWAY #1711 OAKLAND CA"],
            &["03/03/2023", "1250.00", "*", "", "PAYROLL DEPOSIT"],
        ],
    );
    assert_eq!(profile.name, "Wells Fargo");
    assert_spent(&store, on(2023, 3, 2), UNCATEGORIZED, dec!(61.17));
    assert_eq!(spent(&store).description, "SAFEWAY #1711 OAKLAND CA");
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_headerless_needs_five_columns_and_star() {
    let short = cells(&["03/02/2023", "-61.17", "*"]);
    assert!(detect_bank_format(&[], &short).is_none());

    let unstarred = cells(&["03/02/2023", "-61.17", "X", "", "SAFEWAY"]);
    assert!(detect_bank_format(&[], &unstarred).is_none());

    assert!(detect_bank_format(&[], &[]).is_none());
}

// ── Card exports with a category column ───────────────────────

#[test]
fn test_amex_keeps_charges_positive() {
    let (profile, store, report) = import(
        &["Date", "Description", "Card Member", "Amount", "Category"],
        &[
            &["07/14/2023", "DELTA AIR LINES", "J SMITH", "412.80", "Travel-Airline"],
            &["07/20/2023", "ONLINE PAYMENT - THANK YOU", "J SMITH", "-900.00", ""],
        ],
    );
    assert_eq!(profile.name, "American Express");
    assert_spent(&store, on(2023, 7, 14), "Travel-Airline", dec!(412.80));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_usaa_category_and_credit() {
    let (profile, store, report) = import(
        &["Date", "Description", "Original Description", "Category", "Amount", "Status"],
        &[
            &["2023-11-05", "Shell", "SHELL OIL 5744", "Gasoline", "-48.02", "Posted"],
            &["2023-11-06", "Shell", "SHELL OIL REFUND", "Gasoline", "10.00", "Posted"],
        ],
    );
    assert_eq!(profile.name, "USAA");
    assert_spent(&store, on(2023, 11, 5), "Gasoline", dec!(48.02));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_capital_one_card_iso_dates_and_credit_column() {
    let (profile, store, report) = import(
        &[
            "Transaction Date",
            "Posted Date",
            "Card No.",
            "Description",
            "Category",
            "Debit",
            "Credit",
        ],
        &[
            &["2024-02-09", "2024-02-10", "0451", "TRADER JOE'S #552", "Grocery", "73.19", ""],
            &["2024-02-12", "2024-02-12", "0451", "TRADER JOE'S #552", "Grocery", "", "5.99"],
        ],
    );
    assert_eq!(profile.name, "Capital One Credit Card");
    assert_eq!(profile.date_format, "%Y-%m-%d");
    assert_spent(&store, on(2024, 2, 9), "Grocery", dec!(73.19));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_discover_charges_positive_credits_negative() {
    let (profile, store, report) = import(
        &["Trans. Date", "Post Date", "Description", "Amount", "Category"],
        &[
            &["09/01/2023", "09/02/2023", "COSTCO WHSE #0112", "186.44", "Supermarkets"],
            &["09/04/2023", "09/04/2023", "COSTCO RETURN", "-32.00", "Supermarkets"],
        ],
    );
    assert_eq!(profile.name, "Discover");
    assert_eq!(profile.date_column, 0);
    assert_spent(&store, on(2023, 9, 1), "Supermarkets", dec!(186.44));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_chase_card_sale_and_return() {
    let (profile, store, report) = import(
        &["Transaction Date", "Post Date", "Description", "Category", "Type", "Amount", "Memo"],
        &[
            &["05/18/2024", "05/19/2024", "CHIPOTLE 2214", "Food & Drink", "Sale", "-14.35", ""],
            &["05/21/2024", "05/22/2024", "REI #77", "Shopping", "Return", "59.00", ""],
        ],
    );
    assert_eq!(profile.name, "Chase Credit Card");
    assert_spent(&store, on(2024, 5, 18), "Food & Drink", dec!(14.35));
    assert_eq!(report.skipped_refunds, 1);
}

// ── Bank exports without categories ───────────────────────────

#[test]
fn test_boa_card_uses_payee_and_posted_date() {
    let (profile, store, report) = import(
        &["Posted Date", "Reference Number", "Payee", "Address", "Amount"],
        &[
            &["12/03/2023", "2449", "NETFLIX.COM", "LOS GATOS CA", "-15.49"],
            &["12/08/2023", "2450", "PAYMENT - THANK YOU", "", "300.00"],
        ],
    );
    assert_eq!(profile.name, "Bank of America Credit Card");
    assert_spent(&store, on(2023, 12, 3), UNCATEGORIZED, dec!(15.49));
    assert_eq!(spent(&store).description, "NETFLIX.COM");
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_boa_checking_running_balance() {
    let (profile, store, report) = import(
        &["Date", "Description", "Amount", "Running Bal."],
        &[
            &["01/29/2024", "PG&E WEB ONLINE", "-132.70", "2410.18"],
            &["01/31/2024", "INTEREST EARNED", "0.42", "2410.60"],
        ],
    );
    assert_eq!(profile.name, "Bank of America Checking");
    assert_eq!(profile.category_column, None);
    assert_spent(&store, on(2024, 1, 29), UNCATEGORIZED, dec!(132.70));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_citi_debit_and_credit_columns() {
    let (profile, store, report) = import(
        &["Status", "Date", "Description", "Debit", "Credit"],
        &[
            &["Cleared", "06/11/2023", "UBER TRIP", "23.10", ""],
            &["Cleared", "06/12/2023", "UBER TRIP ADJUSTMENT", "", "-4.00"],
        ],
    );
    assert_eq!(profile.name, "Citi");
    assert!(profile.amount_column.is_none());
    assert_spent(&store, on(2023, 6, 11), UNCATEGORIZED, dec!(23.10));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_capital_one_checking_type_column() {
    let (profile, store, report) = import(
        &[
            "Account Number",
            "Transaction Date",
            "Transaction Amount",
            "Transaction Type",
            "Transaction Description",
            "Balance",
        ],
        &[
            &["3391", "08/07/2023", "1800.00", "Debit", "RENT AUG", "640.12"],
            &["3391", "08/15/2023", "2100.00", "Credit", "DIRECT DEP", "2740.12"],
        ],
    );
    assert_eq!(profile.name, "Capital One Checking");
    assert_eq!(profile.kind_column, Some(3));
    assert_spent(&store, on(2023, 8, 7), UNCATEGORIZED, dec!(1800.00));
    assert_eq!(report.skipped_refunds, 1);
}

#[test]
fn test_chase_checking_posting_date() {
    let (profile, store, report) = import(
        &["Details", "Posting Date", "Description", "Amount", "Type", "Balance", "Check or Slip #"],
        &[
            &["DEBIT", "10/02/2023", "COMCAST CABLE", "-89.99", "ACH_DEBIT", "1530.44", ""],
            &["CREDIT", "10/06/2023", "ZELLE FROM A LEE", "45.00", "QUICKPAY_CREDIT", "1575.44", ""],
        ],
    );
    assert_eq!(profile.name, "Chase Checking");
    assert_eq!(profile.date_column, 1);
    assert_spent(&store, on(2023, 10, 2), UNCATEGORIZED, dec!(89.99));
    assert_eq!(report.skipped_refunds, 1);
}

// ── Matching ──────────────────────────────────────────────────

#[test]
fn test_header_case_and_padding_ignored() {
    let headers = cells(&[" DATE ", "DESCRIPTION", "CARD MEMBER", "AMOUNT"]);
    let first = cells(&["07/14/2023", "DELTA", "J SMITH", "412.80"]);
    let profile = detect_bank_format(&headers, &first).unwrap();
    assert_eq!(profile.name, "American Express");
    assert_eq!(profile.date_column, 0);
}

#[test]
fn test_unknown_headers() {
    let headers = cells(&["When", "What", "How Much"]);
    let first = cells(&["07/14/2023", "Lunch", "9.00"]);
    assert!(detect_bank_format(&headers, &first).is_none());
}
