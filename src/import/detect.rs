use super::CsvProfile;

/// Lowercased header names with lookups by exact name or fragment.
struct Columns(Vec<String>);

impl Columns {
    fn new(headers: &[String]) -> Self {
        Self(headers.iter().map(|s| s.trim().to_lowercase()).collect())
    }

    fn has(&self, name: &str) -> bool {
        self.0.iter().any(|h| h == name)
    }

    fn mentions(&self, fragment: &str) -> bool {
        self.0.iter().any(|h| h.contains(fragment))
    }

    fn starts_with(&self, name: &str) -> bool {
        self.0.first().is_some_and(|h| h == name)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|h| h == name)
    }

    fn find_or(&self, name: &str, fallback: usize) -> usize {
        self.find(name).unwrap_or(fallback)
    }
}

/// Recognise a known bank or card export from its header row, or from the
/// first data row for headerless files (`headers` empty).
///
/// Every returned profile yields positive amounts for spending once its sign
/// convention is applied.
pub(crate) fn detect_bank_format(headers: &[String], first_row: &[String]) -> Option<CsvProfile> {
    let cols = Columns::new(headers);

    // Wells Fargo ships five unnamed columns with a literal "*" in the middle
    if headers.is_empty() {
        let starred = first_row.get(2).map(|s| s.trim()) == Some("*");
        return (first_row.len() == 5 && starred).then(|| CsvProfile {
            name: "Wells Fargo".into(),
            description_column: 4,
            amount_column: Some(1),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    if cols.has("card member") {
        // Charges positive, payments negative
        return Some(CsvProfile {
            name: "American Express".into(),
            date_column: cols.find_or("date", 0),
            description_column: cols.find_or("description", 1),
            amount_column: cols.find("amount"),
            category_column: cols.find("category"),
            ..CsvProfile::default()
        });
    }

    if cols.has("reference number") && cols.has("address") {
        return Some(CsvProfile {
            name: "Bank of America Credit Card".into(),
            date_column: cols.find_or("posted date", 0),
            description_column: cols.find_or("payee", 2),
            amount_column: cols.find("amount"),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    if cols.mentions("running bal") {
        return Some(CsvProfile {
            name: "Bank of America Checking".into(),
            date_column: cols.find_or("date", 0),
            description_column: cols.find_or("description", 1),
            amount_column: cols.find("amount"),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    if cols.has("original description") {
        return Some(CsvProfile {
            name: "USAA".into(),
            date_column: cols.find_or("date", 0),
            description_column: cols.find_or("description", 1),
            amount_column: cols.find("amount"),
            category_column: cols.find("category"),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    if cols.starts_with("status") && cols.has("debit") && cols.has("credit") {
        return Some(CsvProfile {
            name: "Citi".into(),
            date_column: cols.find_or("date", 1),
            description_column: cols.find_or("description", 2),
            amount_column: None,
            debit_column: cols.find("debit"),
            credit_column: cols.find("credit"),
            ..CsvProfile::default()
        });
    }

    if cols.has("card no.") {
        return Some(CsvProfile {
            name: "Capital One Credit Card".into(),
            date_column: cols.find_or("transaction date", 0),
            description_column: cols.find_or("description", 3),
            amount_column: None,
            debit_column: cols.find("debit"),
            credit_column: cols.find("credit"),
            category_column: cols.find("category"),
            date_format: "%Y-%m-%d".into(),
            ..CsvProfile::default()
        });
    }

    if cols.starts_with("account number") && cols.has("transaction amount") {
        // Unsigned amounts; the type column says which way the money went
        return Some(CsvProfile {
            name: "Capital One Checking".into(),
            date_column: cols.find_or("transaction date", 1),
            description_column: cols.find_or("transaction description", 4),
            amount_column: cols.find("transaction amount"),
            kind_column: cols.find("transaction type"),
            ..CsvProfile::default()
        });
    }

    if cols.mentions("trans. date") || cols.mentions("trans.date") {
        return Some(CsvProfile {
            name: "Discover".into(),
            description_column: cols.find_or("description", 2),
            amount_column: cols.find("amount"),
            category_column: cols.find("category"),
            ..CsvProfile::default()
        });
    }

    if cols.has("details") && cols.mentions("check or slip") {
        return Some(CsvProfile {
            name: "Chase Checking".into(),
            date_column: cols.find_or("posting date", 1),
            description_column: cols.find_or("description", 2),
            amount_column: cols.find("amount"),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    if cols.has("transaction date") && cols.has("post date") && cols.has("type") {
        // Sales negative, returns positive
        return Some(CsvProfile {
            name: "Chase Credit Card".into(),
            date_column: cols.find_or("transaction date", 0),
            description_column: cols.find_or("description", 2),
            amount_column: cols.find("amount"),
            category_column: cols.find("category"),
            negate_amounts: true,
            ..CsvProfile::default()
        });
    }

    None
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
