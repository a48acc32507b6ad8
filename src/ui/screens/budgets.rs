use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use super::{empty_state, panel};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budget_lines.is_empty() {
        f.render_widget(
            empty_state(
                "Budgets",
                &[
                    "No weekly budgets set",
                    "Use :budget <category> <amount> to set a weekly limit",
                ],
            ),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .budget_lines
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, line)| {
            let ratio = line.ratio();
            let color = if line.is_over() {
                theme::RED
            } else if ratio > 0.8 {
                theme::YELLOW
            } else {
                theme::GREEN
            };

            let spent = line
                .actual_average
                .map(format_amount)
                .unwrap_or_else(|| "no spending".into());
            let over_under = line.over_under();
            let verdict = if line.is_over() {
                format!(" {} over", format_amount(over_under))
            } else {
                format!(" {} left", format_amount(over_under.abs()))
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", truncate(&line.category, 21)),
                    theme::row_style(i, app.budget_index),
                ),
                Span::styled(
                    format!(
                        "{:>12} / {:<10} ",
                        spent,
                        format_amount(line.weekly_budget)
                    ),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(color)),
                Span::styled(
                    verdict,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(panel(format!(
        "Weekly Budgets | {}",
        app.window_label
    )));
    f.render_widget(list, area);
}
