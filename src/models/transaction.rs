use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Label given to spending that neither the export nor a rule could categorize.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    /// Spending is positive; refunds and credits are negative.
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            description: String::new(),
            category: category.into(),
            amount,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_spending(&self) -> bool {
        self.amount >= Decimal::ZERO
    }

    pub fn is_refund(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty() || self.category == UNCATEGORIZED
    }
}
