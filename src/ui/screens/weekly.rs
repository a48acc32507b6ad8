use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::{empty_state, panel};
use crate::analysis::WeeklyReport;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar_value, compact_amount, format_amount};

const BAR_WIDTH: u16 = 7;
const BAR_GAP: u16 = 1;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(report) = app.report.as_ref() else {
        let hint = if app.transaction_count == 0 {
            "Load a bank export with :open <file.csv>"
        } else {
            "Nothing spent in this window. Clear it with :range"
        };
        f.render_widget(
            empty_state("Weekly Spending", &["No spending to show", hint]),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(8),    // Chart and week list
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app, report);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_week_chart(f, body[0], app, report);
    render_week_list(f, body[1], app, report);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App, report: &WeeklyReport) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Total Spent",
        format_amount(report.total_spent),
        theme::TEXT,
        format!("{} to {}", report.start_date, report.end_date),
    );

    let (avg_color, avg_sub) = match app.weekly_benchmark {
        Some(bench) if report.average_spending > bench => {
            (theme::RED, format!("benchmark {}", format_amount(bench)))
        }
        Some(bench) => (theme::GREEN, format!("benchmark {}", format_amount(bench))),
        None => (theme::ACCENT, format!("over {} weeks", report.num_weeks())),
    };
    render_card(
        f,
        cards[1],
        "Weekly Average",
        format_amount(report.average_spending),
        avg_color,
        avg_sub,
    );

    let (max_value, max_sub) = week_card(report.max_spending_week);
    render_card(f, cards[2], "Highest Week", max_value, theme::RED, max_sub);
    let (min_value, min_sub) = week_card(report.min_spending_week);
    render_card(f, cards[3], "Lowest Full Week", min_value, theme::GREEN, min_sub);
}

fn week_card(week: Option<(chrono::NaiveDate, Decimal)>) -> (String, String) {
    match week {
        Some((start, amount)) => (format_amount(amount), format!("week of {start}")),
        None => ("n/a".into(), "no full weeks".into()),
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(panel(title));

    f.render_widget(text, area);
}

fn render_week_chart(f: &mut Frame, area: Rect, app: &App, report: &WeeklyReport) {
    // Slide the visible window so the selected week is always on screen
    let capacity = (area.width.saturating_sub(2) / (BAR_WIDTH + BAR_GAP)).max(1) as usize;
    let first = (app.week_index + 1).saturating_sub(capacity);

    let bars: Vec<Bar> = report
        .weeks
        .iter()
        .enumerate()
        .skip(first)
        .take(capacity)
        .map(|(i, week)| {
            let color = if i == app.week_index {
                theme::YELLOW
            } else if week.is_full() {
                theme::ACCENT
            } else {
                theme::OVERLAY
            };
            Bar::default()
                .value(bar_value(week.total))
                .text_value(compact_amount(week.total))
                .label(Line::from(week.start.format("%m/%d").to_string()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Spending per Week"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP);

    f.render_widget(chart, area);
}

fn render_week_list(f: &mut Frame, area: Rect, app: &App, report: &WeeklyReport) {
    let header_cells = ["Week", "Days", "Spent"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = report
        .weeks
        .iter()
        .enumerate()
        .skip(app.week_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, week)| {
            let days = if week.is_full() {
                format!("{}", week.days())
            } else {
                format!("{} *", week.days())
            };
            Row::new(vec![
                Cell::from(format!("{} - {}", week.start.format("%m/%d"), week.end.format("%m/%d"))),
                Cell::from(days),
                Cell::from(format_amount(week.total)),
            ])
            .style(theme::row_style(i, app.week_index))
        })
        .collect();

    let widths = [
        Constraint::Min(13),
        Constraint::Length(5),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(format!("Weeks ({}) | * partial", report.num_weeks())));
    f.render_widget(table, area);
}
