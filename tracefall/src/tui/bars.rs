//! Waterfall panel - renders the bar tree as one row per visible process.
//!
//! The bar tree stores child offsets relative to the parent's box; rendering
//! flattens it into rows carrying absolute pixel offsets, then maps pixels
//! to terminal columns with a uniform divisor so horizontal proportions
//! survive the projection.

// Pixel-to-column projection truncates on purpose
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme::{category_color, ACCENT, FG_DIM};
use crate::domain::Pid;
use crate::waterfall::BarNode;

/// One row of the waterfall: a bar with its absolute offset restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRow {
    pub pid: Pid,
    pub class: String,
    pub depth: usize,
    pub abs_left: i64,
    pub width: u64,
}

/// Flatten a bar tree into display rows, depth-first, parent before
/// children, restoring absolute offsets by accumulating parent origins.
#[must_use]
pub fn flatten_rows(bars: &[BarNode]) -> Vec<BarRow> {
    fn visit(node: &BarNode, origin: i64, depth: usize, rows: &mut Vec<BarRow>) {
        let abs_left = origin + node.left;
        rows.push(BarRow {
            pid: node.id.clone(),
            class: node.class.clone(),
            depth,
            abs_left,
            width: node.width,
        });
        for child in &node.children {
            visit(child, abs_left, depth + 1, rows);
        }
    }

    let mut rows = Vec::new();
    for bar in bars {
        visit(bar, 0, 0, &mut rows);
    }
    rows
}

/// Columns reserved for the cursor marker and PID label.
const LABEL_WIDTH: usize = 12;

/// Waterfall view with a cursor over the visible rows.
pub struct WaterfallPane {
    rows: Vec<BarRow>,
    cursor: usize,
    scroll: usize,
}

impl WaterfallPane {
    #[must_use]
    pub fn new(bars: &[BarNode]) -> Self {
        Self { rows: flatten_rows(bars), cursor: 0, scroll: 0 }
    }

    pub fn rows(&self) -> &[BarRow] {
        &self.rows
    }

    pub fn cursor_pid(&self) -> Option<&Pid> {
        self.rows.get(self.cursor).map(|row| &row.pid)
    }

    /// Place the cursor on `pid` if it has a row.
    pub fn focus(&mut self, pid: &Pid) {
        if let Some(pos) = self.rows.iter().position(|row| &row.pid == pid) {
            self.cursor = pos;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, selected: Option<&Pid>) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;

        // Keep the cursor row in the visible window
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if inner_height > 0 && self.cursor >= self.scroll + inner_height {
            self.scroll = self.cursor + 1 - inner_height;
        }

        let bar_cols = inner_width.saturating_sub(LABEL_WIDTH).max(1);
        let extent = self
            .rows
            .iter()
            .map(|row| (row.abs_left.max(0) as u64).saturating_add(row.width))
            .max()
            .unwrap_or(1)
            .max(1);
        let px_per_col = extent.div_ceil(bar_cols as u64).max(1);

        let mut lines = Vec::new();
        for (i, row) in self.rows.iter().enumerate().skip(self.scroll).take(inner_height) {
            let marker = if i == self.cursor { ">" } else { " " };
            let label = format!("{marker}#{}", row.pid);
            let label = format!("{label:<12.12}");

            let left_col = ((row.abs_left.max(0) as u64) / px_per_col) as usize;
            let left_col = left_col.min(bar_cols.saturating_sub(1));
            let width_col = ((row.width / px_per_col) as usize).max(1);
            let width_col = width_col.min(bar_cols - left_col);

            let mut style = Style::default().fg(category_color(&row.class));
            if selected == Some(&row.pid) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            }

            lines.push(Line::from(vec![
                Span::styled(
                    label,
                    if i == self.cursor {
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(FG_DIM)
                    },
                ),
                Span::raw(" ".repeat(left_col)),
                Span::styled("█".repeat(width_col), style),
            ]));
        }

        let title = format!("Waterfall ({} bars)", self.rows.len());
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(FG_DIM)),
        );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(id: &str, left: i64, width: u64, children: Vec<BarNode>) -> BarNode {
        BarNode { id: Pid::from(id), class: "make".to_string(), left, width, children }
    }

    #[test]
    fn test_flatten_restores_absolute_offsets() {
        let tree = vec![bar("0", 40, 100, vec![bar("1", 10, 20, vec![bar("2", 5, 5, vec![])])])];
        let rows = flatten_rows(&tree);

        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].abs_left, rows[0].depth), (40, 0));
        assert_eq!((rows[1].abs_left, rows[1].depth), (50, 1));
        assert_eq!((rows[2].abs_left, rows[2].depth), (55, 2));
    }

    #[test]
    fn test_flatten_keeps_sibling_order() {
        let tree = vec![bar("0", 0, 100, vec![bar("b2", 60, 10, vec![]), bar("b1", 10, 10, vec![])])];
        let rows = flatten_rows(&tree);
        let order: Vec<&str> = rows.iter().map(|r| r.pid.as_str()).collect();
        assert_eq!(order, vec!["0", "b2", "b1"]);
    }

    #[test]
    fn test_cursor_clamps_to_rows() {
        let tree = vec![bar("0", 0, 10, vec![bar("1", 0, 5, vec![])])];
        let mut pane = WaterfallPane::new(&tree);

        pane.move_cursor(-1);
        assert_eq!(pane.cursor_pid(), Some(&Pid::from("0")));
        pane.move_cursor(10);
        assert_eq!(pane.cursor_pid(), Some(&Pid::from("1")));
    }

    #[test]
    fn test_focus_moves_cursor_to_pid() {
        let tree = vec![bar("0", 0, 10, vec![bar("1", 0, 5, vec![])])];
        let mut pane = WaterfallPane::new(&tree);
        pane.focus(&Pid::from("1"));
        assert_eq!(pane.cursor_pid(), Some(&Pid::from("1")));
        // Unknown pid leaves the cursor alone
        pane.focus(&Pid::from("nope"));
        assert_eq!(pane.cursor_pid(), Some(&Pid::from("1")));
    }

    #[test]
    fn test_empty_tree_has_no_cursor() {
        let mut pane = WaterfallPane::new(&[]);
        assert_eq!(pane.cursor_pid(), None);
        pane.move_cursor(1);
        assert_eq!(pane.cursor_pid(), None);
    }
}
