use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analysis::WeeklyReport;
use crate::benchmark::Comparison;
use crate::models::BudgetLine;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Weekly,
    Categories,
    Trends,
    Benchmark,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Weekly,
            Self::Categories,
            Self::Trends,
            Self::Benchmark,
            Self::Budgets,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Categories => write!(f, "Categories"),
            Self::Trends => write!(f, "Trends"),
            Self::Benchmark => write!(f, "Benchmark"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// One line of the category table: weekly average, range total, weeks seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryRow {
    pub(crate) name: String,
    pub(crate) average: Decimal,
    pub(crate) total: Decimal,
    pub(crate) weeks: usize,
    /// Weekly reference figure, when the category maps to one.
    pub(crate) reference: Option<Decimal>,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Analysis results, rebuilt by `refresh`
    pub(crate) report: Option<WeeklyReport>,
    pub(crate) category_rows: Vec<CategoryRow>,
    pub(crate) comparisons: Vec<Comparison>,
    pub(crate) weekly_benchmark: Option<Decimal>,
    pub(crate) has_reference_data: bool,
    pub(crate) budget_lines: Vec<BudgetLine>,
    pub(crate) grouped: bool,
    pub(crate) source_count: usize,
    pub(crate) transaction_count: usize,
    pub(crate) window_label: String,

    // Cursors
    pub(crate) week_index: usize,
    pub(crate) week_scroll: usize,
    pub(crate) category_index: usize,
    pub(crate) category_scroll: usize,
    pub(crate) trend_index: usize,
    pub(crate) trend_scroll: usize,
    pub(crate) benchmark_index: usize,
    pub(crate) benchmark_scroll: usize,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Weekly,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            report: None,
            category_rows: Vec::new(),
            comparisons: Vec::new(),
            weekly_benchmark: None,
            has_reference_data: false,
            budget_lines: Vec::new(),
            grouped: false,
            source_count: 0,
            transaction_count: 0,
            window_label: "All dates".into(),

            week_index: 0,
            week_scroll: 0,
            category_index: 0,
            category_scroll: 0,
            trend_index: 0,
            trend_scroll: 0,
            benchmark_index: 0,
            benchmark_scroll: 0,
            budget_index: 0,
            budget_scroll: 0,

            visible_rows: 20,
        }
    }

    /// Recompute every view from the session's current data and settings.
    pub(crate) fn refresh(&mut self, session: &Session) {
        self.report = session.report();
        let references = session.category_references();
        self.category_rows = self
            .report
            .as_ref()
            .map(|r| category_rows(r, &references))
            .unwrap_or_default();
        self.comparisons = session.comparisons();
        self.weekly_benchmark = session.weekly_benchmark();
        self.has_reference_data = session.comparator().has_reference_data();
        self.budget_lines = session.budget_lines(self.report.as_ref());
        self.grouped = session.grouped;
        self.source_count = session.paths().len();
        self.transaction_count = session.store().len();
        self.window_label = window_label(session.start, session.end);

        let weeks = self.report.as_ref().map_or(0, |r| r.num_weeks());
        clamp_cursor(&mut self.week_index, &mut self.week_scroll, weeks);
        let categories = self.category_rows.len();
        clamp_cursor(&mut self.category_index, &mut self.category_scroll, categories);
        clamp_cursor(&mut self.trend_index, &mut self.trend_scroll, categories);
        let comparisons = self.comparisons.len();
        clamp_cursor(&mut self.benchmark_index, &mut self.benchmark_scroll, comparisons);
        let budgets = self.budget_lines.len();
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, budgets);
    }

    /// Cursor, scroll offset and list length of the list on the current screen.
    pub(crate) fn cursor_mut(&mut self) -> (&mut usize, &mut usize, usize) {
        match self.screen {
            Screen::Weekly => {
                let len = self.report.as_ref().map_or(0, |r| r.num_weeks());
                (&mut self.week_index, &mut self.week_scroll, len)
            }
            Screen::Categories => (
                &mut self.category_index,
                &mut self.category_scroll,
                self.category_rows.len(),
            ),
            Screen::Trends => (
                &mut self.trend_index,
                &mut self.trend_scroll,
                self.category_rows.len(),
            ),
            Screen::Benchmark => (
                &mut self.benchmark_index,
                &mut self.benchmark_scroll,
                self.comparisons.len(),
            ),
            Screen::Budgets => (
                &mut self.budget_index,
                &mut self.budget_scroll,
                self.budget_lines.len(),
            ),
        }
    }

    /// Category shown on the Trends screen.
    pub(crate) fn trend_category(&self) -> Option<&str> {
        self.category_rows
            .get(self.trend_index)
            .map(|r| r.name.as_str())
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

/// Categories by descending weekly average.
pub(crate) fn category_rows(
    report: &WeeklyReport,
    references: &BTreeMap<String, Decimal>,
) -> Vec<CategoryRow> {
    let totals = report.total_spending_by_category();
    let mut rows: Vec<CategoryRow> = report
        .average_spending_by_category
        .iter()
        .map(|(name, average)| CategoryRow {
            name: name.clone(),
            average: *average,
            total: totals.get(name).copied().unwrap_or(Decimal::ZERO),
            weeks: report.category_series.get(name).map_or(0, |s| s.len()),
            reference: references.get(name).copied(),
        })
        .collect();
    rows.sort_by(|a, b| b.average.cmp(&a.average).then_with(|| a.name.cmp(&b.name)));
    rows
}

pub(crate) fn window_label(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    match (start, end) {
        (None, None) => "All dates".into(),
        (Some(s), None) => format!("From {s}"),
        (None, Some(e)) => format!("Until {e}"),
        (Some(s), Some(e)) => format!("{s} to {e}"),
    }
}

fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
