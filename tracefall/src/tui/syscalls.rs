//! Syscall panel - shows the selected process's description and command log.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{ACCENT, FG_DIM, FG_TEXT};
use crate::selection::ProcessView;

#[derive(Debug, Default)]
pub struct SyscallPane {
    scroll: u16,
}

impl SyscallPane {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Jump back to the top, used whenever the selection changes.
    pub fn reset(&mut self) {
        self.scroll = 0;
    }

    pub fn render(&self, f: &mut Frame, area: Rect, view: Option<&ProcessView>) {
        let lines = match view {
            Some(view) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        view.description(),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                ];
                for (i, cmd) in view.commands.iter().enumerate() {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:>4}  ", i + 1), Style::default().fg(FG_DIM)),
                        Span::styled(cmd.clone(), Style::default().fg(FG_TEXT)),
                    ]));
                }
                lines
            }
            None => vec![Line::from(Span::styled(
                "No process selected.",
                Style::default().fg(FG_DIM),
            ))],
        };

        let paragraph = Paragraph::new(lines)
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Process")
                    .border_style(Style::default().fg(FG_DIM)),
            );
        f.render_widget(paragraph, area);
    }
}
