use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use super::{empty_state, panel};
use crate::analysis::WeeklyReport;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar_value, compact_amount, format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let (Some(report), Some(category)) = (app.report.as_ref(), app.trend_category()) else {
        f.render_widget(
            empty_state(
                "Trends",
                &["No categories to chart", "Load a bank export with :open <file.csv>"],
            ),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    render_category_list(f, chunks[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(chunks[1]);

    let series = report.series_for(category);
    render_stats(f, right[0], report, category, &series);
    render_series_chart(f, right[1], category, &series);
}

fn render_category_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .category_rows
        .iter()
        .enumerate()
        .skip(app.trend_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, row)| {
            ListItem::new(Line::from(Span::styled(
                truncate(&row.name, area.width.saturating_sub(3) as usize),
                theme::row_style(i, app.trend_index),
            )))
        })
        .collect();

    let list = List::new(items).block(panel(format!("Categories ({})", app.category_rows.len())));
    f.render_widget(list, area);
}

fn render_stats(
    f: &mut Frame,
    area: Rect,
    report: &WeeklyReport,
    category: &str,
    series: &[(chrono::NaiveDate, Decimal)],
) {
    let average = report
        .average_spending_by_category
        .get(category)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let peak = series
        .iter()
        .max_by_key(|(_, amount)| *amount)
        .filter(|(_, amount)| *amount > Decimal::ZERO);
    let active = series.iter().filter(|(_, a)| *a > Decimal::ZERO).count();

    let peak_text = match peak {
        Some((start, amount)) => format!("{} (week of {start})", format_amount(*amount)),
        None => "n/a".into(),
    };

    let text = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Average ", theme::dim_style()),
            Span::styled(
                format_amount(average),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Peak ", theme::dim_style()),
            Span::styled(peak_text, Style::default().fg(theme::PEACH)),
        ]),
        Line::from(Span::styled(
            format!("Spent in {active} of {} weeks", series.len()),
            theme::dim_style(),
        )),
    ])
    .block(panel(category.to_string()));
    f.render_widget(text, area);
}

fn render_series_chart(f: &mut Frame, area: Rect, category: &str, series: &[(chrono::NaiveDate, Decimal)]) {
    const BAR_WIDTH: u16 = 6;
    // Most recent weeks that fit
    let capacity = (area.width.saturating_sub(2) / (BAR_WIDTH + 1)).max(1) as usize;
    let skip = series.len().saturating_sub(capacity);

    let bars: Vec<Bar> = series
        .iter()
        .skip(skip)
        .map(|(start, amount)| {
            Bar::default()
                .value(bar_value(*amount))
                .text_value(compact_amount(*amount))
                .label(Line::from(start.format("%m/%d").to_string()))
                .style(Style::default().fg(theme::PEACH))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::PEACH))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(format!("{category} per Week")))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1);
    f.render_widget(chart, area);
}
