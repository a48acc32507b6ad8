use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::{empty_state, panel};
use crate::benchmark::Comparison;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if !app.has_reference_data {
        f.render_widget(
            empty_state(
                "Benchmark",
                &[
                    "No reference spending data loaded",
                    "Place benchmarks.json in the data directory, or start with --reference <file>",
                ],
            ),
            area,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(5)])
        .split(area);

    render_headline(f, chunks[0], app);

    if app.comparisons.is_empty() {
        f.render_widget(
            empty_state(
                "Annual Spending vs Reference",
                &["None of the loaded categories map to a reference category"],
            ),
            chunks[1],
        );
        return;
    }
    render_comparisons(f, chunks[1], app);
}

fn render_headline(f: &mut Frame, area: Rect, app: &App) {
    let average = app.report.as_ref().map(|r| r.average_spending);
    let line = match (average, app.weekly_benchmark) {
        (Some(avg), Some(bench)) => {
            let style = if avg > bench {
                theme::over_style()
            } else {
                theme::under_style()
            };
            Line::from(vec![
                Span::styled("You spend ", theme::dim_style()),
                Span::styled(format_amount(avg), style.add_modifier(Modifier::BOLD)),
                Span::styled(" per week. Reference households spend ", theme::dim_style()),
                Span::styled(
                    format_amount(bench),
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" on the same categories.", theme::dim_style()),
            ])
        }
        _ => Line::from(Span::styled("No spending in this window", theme::dim_style())),
    };

    f.render_widget(Paragraph::new(vec![Line::from(""), line]).centered().block(panel("Weekly")), area);
}

fn render_comparisons(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ["Reference Category", "Your Categories", "You / Year", "Reference", "Difference"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .comparisons
        .iter()
        .enumerate()
        .skip(app.benchmark_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, c)| {
            Row::new(vec![
                Cell::from(truncate(&c.reference_category, 34)),
                Cell::from(truncate(&c.user_categories.join(", "), 30)),
                Cell::from(format_amount(c.user_total)),
                Cell::from(c.reference.map(format_amount).unwrap_or_else(|| "n/a".into())),
                difference_cell(c),
            ])
            .style(theme::row_style(i, app.benchmark_index))
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Min(18),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(format!("Annual Spending vs Reference ({})", app.comparisons.len())));
    f.render_widget(table, area);
}

fn difference_cell(c: &Comparison) -> Cell<'static> {
    let Some(diff) = c.difference() else {
        return Cell::from(Span::styled("n/a", theme::dim_style()));
    };
    let style = if diff > Decimal::ZERO {
        theme::over_style()
    } else {
        theme::under_style()
    };
    let sign = if diff > Decimal::ZERO { "+" } else { "" };
    let pct = match c.difference_pct() {
        Some(p) => format!(" ({sign}{:.0}%)", p.round()),
        None => String::new(),
    };
    Cell::from(Span::styled(format!("{sign}{}{pct}", format_amount(diff)), style))
}
