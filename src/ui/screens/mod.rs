pub(crate) mod benchmark;
pub(crate) mod budgets;
pub(crate) mod categories;
pub(crate) mod trends;
pub(crate) mod weekly;

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;

/// Bordered panel with a dim bold title.
pub(crate) fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {} ", title.into()),
            theme::title_style(),
        ))
}

/// Centered placeholder text inside a titled panel.
pub(crate) fn empty_state(title: &str, lines: &[&str]) -> Paragraph<'static> {
    let mut text = vec![Line::from("")];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            text.push(Line::from(""));
        }
        text.push(Line::from(Span::styled(line.to_string(), theme::dim_style())));
    }
    Paragraph::new(text).centered().block(panel(title))
}
