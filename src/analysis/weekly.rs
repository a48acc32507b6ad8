use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::models::TransactionStore;

/// One contiguous span of days ending on a Sunday or on the analysis end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeekBucket {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
    pub(crate) total: Decimal,
}

impl WeekBucket {
    /// Only weeks that reach a Sunday are eligible for the minimum-spending week.
    pub(crate) fn is_full(&self) -> bool {
        self.end.weekday() == Weekday::Sun
    }

    pub(crate) fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Everything derived from one aggregation run.
///
/// All maps are keyed by week-start date. Recomputed from the store on every
/// call to [`analyze`]; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WeeklyReport {
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) weeks: Vec<WeekBucket>,
    pub(crate) weekly_spending: BTreeMap<NaiveDate, Decimal>,
    pub(crate) weekly_spending_by_category: BTreeMap<NaiveDate, BTreeMap<String, Decimal>>,
    pub(crate) category_series: BTreeMap<String, BTreeMap<NaiveDate, Decimal>>,
    pub(crate) max_spending_week: Option<(NaiveDate, Decimal)>,
    pub(crate) min_spending_week: Option<(NaiveDate, Decimal)>,
    pub(crate) total_spent: Decimal,
    pub(crate) average_spending: Decimal,
    pub(crate) average_spending_by_category: BTreeMap<String, Decimal>,
}

impl WeeklyReport {
    pub(crate) fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    /// Category totals over the whole range.
    pub(crate) fn total_spending_by_category(&self) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for week in self.weekly_spending_by_category.values() {
            for (category, amount) in week {
                *totals.entry(category.clone()).or_insert(Decimal::ZERO) += amount;
            }
        }
        totals
    }

    /// Weekly amounts for one category, with zero for weeks it did not appear in.
    pub(crate) fn series_for(&self, category: &str) -> Vec<(NaiveDate, Decimal)> {
        let series = self.category_series.get(category);
        self.weeks
            .iter()
            .map(|w| {
                let amount = series
                    .and_then(|s| s.get(&w.start))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                (w.start, amount)
            })
            .collect()
    }

    pub(crate) fn categories(&self) -> impl Iterator<Item = &str> {
        self.category_series.keys().map(String::as_str)
    }
}

/// Sunday of the week containing `date`, or `date` itself when it is a Sunday.
fn next_sunday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday() as u64;
    let days_to_add = (6 - weekday + 7) % 7;
    date.checked_add_days(Days::new(days_to_add)).unwrap_or(NaiveDate::MAX)
}

/// Partition `[start, end]` into Sunday-terminated weeks and aggregate spending.
///
/// `start` and `end` default to the earliest and latest dates in the store.
/// Returns `None` when there is nothing to aggregate: an empty store, or an
/// explicit window whose start lies after its end.
pub(crate) fn analyze(
    store: &TransactionStore,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<WeeklyReport> {
    let (Some(first), Some(last)) = (store.first_date(), store.last_date()) else {
        tracing::info!("no transactions available for analysis");
        return None;
    };

    let start_date = start.unwrap_or(first);
    let end_date = end.unwrap_or(last);
    if start_date > end_date {
        tracing::info!(%start_date, %end_date, "analysis window is empty");
        return None;
    }

    let mut weeks = Vec::new();
    let mut weekly_spending = BTreeMap::new();
    let mut weekly_spending_by_category = BTreeMap::new();
    let mut category_series: BTreeMap<String, BTreeMap<NaiveDate, Decimal>> = BTreeMap::new();
    let mut category_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut category_weeks: BTreeMap<String, u32> = BTreeMap::new();
    let mut max_spending_week: Option<(NaiveDate, Decimal)> = None;
    let mut min_spending_week: Option<(NaiveDate, Decimal)> = None;
    let mut total_spent = Decimal::ZERO;

    let mut week_start = start_date;
    while week_start <= end_date {
        let week_end = next_sunday(week_start).min(end_date);

        let mut week_total = Decimal::ZERO;
        let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        for day in week_start.iter_days().take_while(|d| *d <= week_end) {
            for txn in store.on(day) {
                week_total += txn.amount;
                *by_category.entry(txn.category.clone()).or_insert(Decimal::ZERO) += txn.amount;
            }
        }

        for (category, amount) in &by_category {
            category_series
                .entry(category.clone())
                .or_default()
                .insert(week_start, *amount);
            *category_totals.entry(category.clone()).or_insert(Decimal::ZERO) += amount;
            *category_weeks.entry(category.clone()).or_insert(0) += 1;
        }

        if max_spending_week.map_or(true, |(_, max)| week_total > max) {
            max_spending_week = Some((week_start, week_total));
        }
        let bucket = WeekBucket {
            start: week_start,
            end: week_end,
            total: week_total,
        };
        if bucket.is_full() && min_spending_week.map_or(true, |(_, min)| week_total < min) {
            min_spending_week = Some((week_start, week_total));
        }

        weekly_spending.insert(week_start, week_total);
        weekly_spending_by_category.insert(week_start, by_category);
        weeks.push(bucket);
        total_spent += week_total;

        match week_end.succ_opt() {
            Some(next) => week_start = next,
            None => break,
        }
    }

    let average_spending = total_spent / Decimal::from(weeks.len());
    let average_spending_by_category = category_totals
        .into_iter()
        .map(|(category, total)| {
            let seen = category_weeks.get(&category).copied().unwrap_or(1);
            (category, total / Decimal::from(seen))
        })
        .collect();

    tracing::debug!(
        weeks = weeks.len(),
        %total_spent,
        %start_date,
        %end_date,
        "weekly aggregation complete"
    );

    Some(WeeklyReport {
        start_date,
        end_date,
        weeks,
        weekly_spending,
        weekly_spending_by_category,
        category_series,
        max_spending_week,
        min_spending_week,
        total_spent,
        average_spending,
        average_spending_by_category,
    })
}

#[cfg(test)]
#[path = "weekly_tests.rs"]
mod tests;
