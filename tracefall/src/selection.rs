//! Selection state machine
//!
//! Tracks which process is currently inspected and produces a display
//! view-model on each selection change. At most one process is selected at a
//! time; selecting a new one implicitly deselects the old one. Each viewer
//! instance owns its own controller, never process-wide state.

use crate::domain::{Pid, SelectionError};
use crate::trace_data::Syscall;
use crate::waterfall::SyscallIndex;

/// Display view-model for one selected process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessView {
    pub pid: Pid,
    /// Cumulative duration in seconds, read from the *last* syscall entry
    /// (zero when the log is empty).
    pub duration_seconds: f64,
    /// Command strings in original order, markup-escaped for display.
    pub commands: Vec<String>,
}

impl ProcessView {
    fn new(pid: Pid, syscalls: &[Syscall]) -> Self {
        let duration_seconds = syscalls.last().map_or(0.0, |last| last.duration / 1000.0);
        let commands = syscalls.iter().map(|syscall| escape_markup(&syscall.cmd)).collect();
        Self { pid, duration_seconds, commands }
    }

    /// Headline shown above the command list. Exact wording contract.
    pub fn description(&self) -> String {
        format!("Process #{} — Process duration: {} sec.", self.pid, self.duration_seconds)
    }
}

/// Outcome of a successful selection. `previous` and `current` let the
/// presentation adapter unhighlight the old bar and highlight the new one
/// without querying global UI state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub previous: Option<Pid>,
    pub current: Pid,
    pub view: ProcessView,
}

/// Escape `&`, `<` and `>` for markup display.
///
/// `&` is replaced first so entities introduced by escaping `<`/`>` are not
/// double-escaped.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// States: unselected, or exactly one selected PID. A rejected `select`
/// leaves the prior state untouched.
#[derive(Debug)]
pub struct SelectionController {
    index: SyscallIndex,
    selected: Option<Pid>,
}

impl SelectionController {
    /// A controller only exists for a completed build, so no selection can
    /// race a partially built index.
    #[must_use]
    pub fn new(index: SyscallIndex) -> Self {
        Self { index, selected: None }
    }

    pub fn index(&self) -> &SyscallIndex {
        &self.index
    }

    pub fn selected(&self) -> Option<&Pid> {
        self.selected.as_ref()
    }

    /// Select `pid`, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// `UnknownProcess` when `pid` is not in the syscall index; the current
    /// selection is left unchanged.
    pub fn select(&mut self, pid: &Pid) -> Result<SelectionChange, SelectionError> {
        let Some(syscalls) = self.index.get(pid) else {
            return Err(SelectionError::UnknownProcess(pid.clone()));
        };
        let view = ProcessView::new(pid.clone(), syscalls);
        let previous = self.selected.replace(pid.clone());
        Ok(SelectionChange { previous, current: pid.clone(), view })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: Vec<(&str, Vec<Syscall>)>) -> SyscallIndex {
        entries.into_iter().map(|(pid, syscalls)| (Pid::from(pid), syscalls)).collect()
    }

    fn syscall(cmd: &str, duration: f64) -> Syscall {
        Syscall { cmd: cmd.to_string(), duration }
    }

    #[test]
    fn test_select_produces_view_model() {
        let mut controller = SelectionController::new(index(vec![(
            "7",
            vec![syscall("execve(make)", 120.0), syscall("execve(cc)", 450.0)],
        )]));

        let change = controller.select(&Pid::from("7")).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Pid::from("7"));
        // Last entry is cumulative, never a sum
        assert_eq!(change.view.duration_seconds, 0.45);
        assert_eq!(change.view.commands, vec!["execve(make)", "execve(cc)"]);
        assert_eq!(change.view.description(), "Process #7 — Process duration: 0.45 sec.");
    }

    #[test]
    fn test_empty_syscall_log_has_zero_duration() {
        let mut controller = SelectionController::new(index(vec![("7", vec![])]));
        let change = controller.select(&Pid::from("7")).unwrap();
        assert_eq!(change.view.duration_seconds, 0.0);
        assert!(change.view.commands.is_empty());
    }

    #[test]
    fn test_unknown_pid_keeps_prior_selection() {
        let mut controller = SelectionController::new(index(vec![("1", vec![])]));
        controller.select(&Pid::from("1")).unwrap();

        let err = controller.select(&Pid::from("99")).unwrap_err();
        assert_eq!(err, SelectionError::UnknownProcess(Pid::from("99")));
        assert_eq!(controller.selected(), Some(&Pid::from("1")));
    }

    #[test]
    fn test_select_before_any_build_state() {
        let mut controller = SelectionController::new(SyscallIndex::new());
        assert!(controller.select(&Pid::from("1")).is_err());
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn test_single_selection_replaces_previous() {
        let mut controller = SelectionController::new(index(vec![("a", vec![]), ("b", vec![])]));
        controller.select(&Pid::from("a")).unwrap();
        let change = controller.select(&Pid::from("b")).unwrap();

        // Exactly B selected, A reported as deselected
        assert_eq!(change.previous, Some(Pid::from("a")));
        assert_eq!(change.current, Pid::from("b"));
        assert_eq!(controller.selected(), Some(&Pid::from("b")));
    }

    #[test]
    fn test_escape_order_amp_first() {
        assert_eq!(escape_markup("a && b < c > d"), "a &amp;&amp; b &lt; c &gt; d");
        // Pre-existing entities are escaped too, never double-escaped output
        assert_eq!(escape_markup("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_commands_are_escaped_in_order() {
        let mut controller = SelectionController::new(index(vec![(
            "1",
            vec![syscall("cat <in >out", 10.0), syscall("true && false", 20.0)],
        )]));
        let change = controller.select(&Pid::from("1")).unwrap();
        assert_eq!(change.view.commands, vec!["cat &lt;in &gt;out", "true &amp;&amp; false"]);
    }
}
