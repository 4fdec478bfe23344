//! # Terminal User Interface (TUI)
//!
//! Presentation adapter built on `ratatui`. Turns the bar tree into terminal
//! rows and wires keyboard navigation back into the selection controller;
//! it consumes `BarNode` and `ProcessView` only and holds no layout logic.
//!
//! ## Layout
//!
//! ```text
//! ┌ Timeline ──────────────────────────────────────┐
//! ├ Waterfall ──────────────┬ Process ─────────────┤
//! │ >#0  ███████████████    │ Process #1 — ...     │
//! │  #1    ████             │    1  execve(cc ...) │
//! │  #2         ██████      │                      │
//! └─────────────────────────┴──────────────────────┘
//! ```
//!
//! ## Sub-Modules
//!
//! - `bars` - waterfall rows and cursor
//! - `syscalls` - selected process detail panel
//! - `status` - timeline description bar
//! - `theme` - color scheme

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

pub mod bars; // Public for testing
mod status;
mod syscalls;
mod theme;

use bars::WaterfallPane;
use status::StatusBar;
use syscalls::SyscallPane;
use theme::{ERROR, FG_DIM};

use crate::loader::FileLoader;
use crate::viewer::{Viewer, ViewerState};

/// TUI application wrapping a loaded viewer.
pub struct App {
    viewer: Viewer<FileLoader>,
    waterfall: WaterfallPane,
    syscalls: SyscallPane,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(viewer: Viewer<FileLoader>) -> Self {
        let mut waterfall = match viewer.state() {
            ViewerState::Ready(session) => WaterfallPane::new(&session.bars),
            _ => WaterfallPane::new(&[]),
        };
        // Start the cursor on the auto-selected bar
        if let Some(pid) = viewer.session().and_then(|s| s.selected()) {
            waterfall.focus(pid);
        }
        Self { viewer, waterfall, syscalls: SyscallPane::new(), should_quit: false }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_and_select(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_and_select(1),
            KeyCode::PageUp => self.move_and_select(-10),
            KeyCode::PageDown => self.move_and_select(10),
            KeyCode::Home | KeyCode::Char('g') => {
                self.waterfall.cursor_to_start();
                self.select_cursor();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.waterfall.cursor_to_end();
                self.select_cursor();
            }
            KeyCode::Char('J') => self.syscalls.scroll_down(),
            KeyCode::Char('K') => self.syscalls.scroll_up(),
            _ => {}
        }
    }

    fn move_and_select(&mut self, delta: isize) {
        self.waterfall.move_cursor(delta);
        self.select_cursor();
    }

    fn select_cursor(&mut self) {
        let Some(pid) = self.waterfall.cursor_pid().cloned() else {
            return;
        };
        // Every rendered bar was indexed during the build, so a failure here
        // means the pane and the index disagree
        if let Err(e) = self.viewer.select(&pid) {
            warn!("selection rejected: {e}");
            return;
        }
        self.syscalls.reset();
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(f.area());

        match self.viewer.state() {
            ViewerState::Ready(_) => {
                StatusBar::render(
                    f,
                    chunks[0],
                    self.viewer.timeline_description().as_deref(),
                    self.viewer.session().map_or(0, |s| s.warnings.len()),
                );

                let panes = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(chunks[1]);

                let selected = self.viewer.session().and_then(|s| s.selected()).cloned();
                self.waterfall.render(f, panes[0], selected.as_ref());
                self.syscalls.render(f, panes[1], self.viewer.session().and_then(|s| s.view()));
            }
            state => {
                StatusBar::render(f, chunks[0], None, 0);
                let message = match state {
                    ViewerState::Empty => "No dataset loaded.".to_string(),
                    ViewerState::Loading { url } => format!("Loading \"{url}\"..."),
                    ViewerState::Failed { error } => error.to_string(),
                    ViewerState::Ready(_) => unreachable!(),
                };
                let style = match state {
                    ViewerState::Failed { .. } => Style::default().fg(ERROR),
                    _ => Style::default().fg(FG_DIM),
                };
                let paragraph = Paragraph::new(Line::styled(message, style)).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(FG_DIM)),
                );
                f.render_widget(paragraph, chunks[1]);
            }
        }
    }

    fn main_loop(mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

/// Run the interactive viewer until the user quits.
pub fn run(viewer: Viewer<FileLoader>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(viewer).main_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
