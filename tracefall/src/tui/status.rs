//! Status panel - timeline description and build warnings.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{FG_DIM, FG_TEXT, WARNING};

pub struct StatusBar;

impl StatusBar {
    pub fn render(f: &mut Frame, area: Rect, description: Option<&str>, warning_count: usize) {
        let mut spans = vec![Span::styled(
            description.unwrap_or("No dataset loaded.").to_string(),
            Style::default().fg(FG_TEXT),
        )];
        if warning_count > 0 {
            spans.push(Span::styled(
                format!("  ({warning_count} dataset warnings, see log)"),
                Style::default().fg(WARNING),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Timeline")
                .title_bottom("↑/↓ select  PgUp/PgDn jump  J/K scroll syscalls  q quit")
                .border_style(Style::default().fg(FG_DIM)),
        );
        f.render_widget(paragraph, area);
    }
}
