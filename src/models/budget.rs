use rust_decimal::Decimal;

/// One budgeted category set against what was actually spent per week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetLine {
    pub category: String,
    pub weekly_budget: Decimal,
    /// `None` when the category has no spending in the analysed range.
    pub actual_average: Option<Decimal>,
}

impl BudgetLine {
    /// Positive when spending ran over budget, negative when under.
    pub fn over_under(&self) -> Decimal {
        self.actual_average.unwrap_or(Decimal::ZERO) - self.weekly_budget
    }

    pub fn is_over(&self) -> bool {
        self.over_under() > Decimal::ZERO
    }

    /// Share of the budget consumed, capped at 1.0 for progress bars.
    pub fn ratio(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        if self.weekly_budget <= Decimal::ZERO {
            return 0.0;
        }
        let spent = self.actual_average.unwrap_or(Decimal::ZERO);
        (spent / self.weekly_budget).to_f64().unwrap_or(0.0).min(1.0)
    }
}
