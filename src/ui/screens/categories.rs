use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{empty_state, panel};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(report) = app.report.as_ref() else {
        f.render_widget(
            empty_state(
                "Categories",
                &["No spending to show", "Load a bank export with :open <file.csv>"],
            ),
            area,
        );
        return;
    };

    let header_cells = ["Category", "Avg / Week", "Ref / Week", "Total", "Weeks", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .category_rows
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let share = if report.total_spent > Decimal::ZERO {
                (row.total / report.total_spent).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };
            let reference = match row.reference {
                Some(r) if row.average > r => Span::styled(format_amount(r), theme::over_style()),
                Some(r) => Span::styled(format_amount(r), theme::under_style()),
                None => Span::styled("n/a", theme::dim_style()),
            };
            Row::new(vec![
                Cell::from(truncate(&row.name, 28)),
                Cell::from(format_amount(row.average)),
                Cell::from(reference),
                Cell::from(format_amount(row.total)),
                Cell::from(format!("{}/{}", row.weeks, report.num_weeks())),
                Cell::from(Span::styled(
                    format!("{} {:>3.0}%", progress_bar(share, 10), share * 100.0),
                    theme::dim_style(),
                )),
            ])
            .style(theme::row_style(i, app.category_index))
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Length(7),
        Constraint::Length(18),
    ];

    let mode = if app.grouped { "by group" } else { "by category" };
    let table = Table::new(rows, widths).header(header).block(panel(format!(
        "Categories ({}) {mode} | :grouped to toggle",
        app.category_rows.len()
    )));
    f.render_widget(table, area);
}
