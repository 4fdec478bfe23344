//! Viewer glue
//!
//! Orchestrates the load -> build -> select pipeline. Loading is the only
//! asynchronous step; the bar tree and syscall index are built synchronously
//! in the completion path, so no selection can ever observe a partially
//! built index. Each load bumps a generation counter and a completion whose
//! token no longer matches the latest request is discarded (last-write-wins,
//! an earlier stale response never overwrites newer state).

use log::{info, warn};

use crate::domain::{LoadFailure, Pid, SelectionError, ViewerError};
use crate::loader::DatasetLoader;
use crate::selection::{ProcessView, SelectionChange, SelectionController};
use crate::trace_data::{TraceDataset, Viewport};
use crate::waterfall::{BarNode, BuildWarning, SyscallIndex, WaterfallBuilder};

/// Proof that a load was started; handed back to [`Viewer::finish_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// Everything derived from one completed load. Replaced wholesale on the
/// next load so bars, index and selection never disagree.
#[derive(Debug)]
pub struct Session {
    pub dataset: TraceDataset,
    pub bars: Vec<BarNode>,
    pub warnings: Vec<BuildWarning>,
    controller: SelectionController,
    last_change: Option<SelectionChange>,
}

impl Session {
    pub fn index(&self) -> &SyscallIndex {
        self.controller.index()
    }

    pub fn selected(&self) -> Option<&Pid> {
        self.controller.selected()
    }

    /// Previous/current PID pair and view-model of the latest selection.
    pub fn last_change(&self) -> Option<&SelectionChange> {
        self.last_change.as_ref()
    }

    pub fn view(&self) -> Option<&ProcessView> {
        self.last_change.as_ref().map(|change| &change.view)
    }

    fn select(&mut self, pid: &Pid) -> Result<(), SelectionError> {
        let change = self.controller.select(pid)?;
        self.last_change = Some(change);
        Ok(())
    }
}

/// Viewer lifecycle: empty until the first load, then loading, failed or
/// ready. Replacing the whole state atomically removes any previous
/// loading/error indicator.
#[derive(Debug)]
pub enum ViewerState {
    Empty,
    Loading { url: String },
    Failed { error: ViewerError },
    Ready(Session),
}

/// One viewer instance: a loader, a fixed viewport and the current state.
#[derive(Debug)]
pub struct Viewer<L> {
    loader: L,
    viewport: Viewport,
    builder: WaterfallBuilder,
    auto_select_root: bool,
    threshold_override: Option<f64>,
    generation: u64,
    /// Survives rebuilds so a re-load can restore the selection when the
    /// PID still exists in the new index.
    last_selected: Option<Pid>,
    state: ViewerState,
}

impl<L: DatasetLoader> Viewer<L> {
    #[must_use]
    pub fn new(loader: L, viewport: Viewport) -> Self {
        Self {
            loader,
            viewport,
            builder: WaterfallBuilder::new(),
            auto_select_root: true,
            threshold_override: None,
            generation: 0,
            last_selected: None,
            state: ViewerState::Empty,
        }
    }

    /// Lay out bars flat at absolute offsets instead of nesting.
    #[must_use]
    pub fn flatten(mut self, flatten: bool) -> Self {
        self.builder = self.builder.flatten(flatten);
        self
    }

    /// Whether a completed load selects the root process (the default) or
    /// leaves the view unselected until the first explicit selection.
    #[must_use]
    pub fn auto_select_root(mut self, auto_select: bool) -> Self {
        self.auto_select_root = auto_select;
        self
    }

    /// Override the dataset's duration threshold (seconds) on every build.
    #[must_use]
    pub fn threshold_override(mut self, threshold: Option<f64>) -> Self {
        self.threshold_override = threshold;
        self
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            ViewerState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Load a dataset and rebuild the waterfall, replacing any prior state.
    pub async fn load(&mut self, url: &str) -> &ViewerState {
        let token = self.begin_load(url);
        let result = self.loader.load(url).await;
        self.finish_load(token, url, result);
        &self.state
    }

    /// Start a load: bump the generation and drop the previous state.
    pub fn begin_load(&mut self, url: &str) -> LoadToken {
        self.generation += 1;
        self.state = ViewerState::Loading { url: url.to_string() };
        LoadToken(self.generation)
    }

    /// Complete a load. Results from a superseded load are discarded.
    pub fn finish_load(
        &mut self,
        token: LoadToken,
        url: &str,
        result: Result<TraceDataset, LoadFailure>,
    ) {
        if token.0 != self.generation {
            info!("discarding stale load of \"{url}\" (generation {} != {})", token.0, self.generation);
            return;
        }

        let mut dataset = match result {
            Ok(dataset) => dataset,
            Err(failure) => {
                self.state = ViewerState::Failed {
                    error: ViewerError::Load { url: url.to_string(), source: failure },
                };
                return;
            }
        };

        if let Some(threshold) = self.threshold_override {
            dataset.properties.threshold = threshold;
        }

        let output = match self.builder.build(&dataset, &self.viewport) {
            Ok(output) => output,
            Err(error) => {
                self.state = ViewerState::Failed {
                    error: ViewerError::Build { url: url.to_string(), source: error },
                };
                return;
            }
        };

        let mut session = Session {
            dataset,
            bars: output.bars,
            warnings: output.warnings,
            controller: SelectionController::new(output.index),
            last_change: None,
        };

        // Keep the old selection when the PID survived the reload, otherwise
        // fall back to the documented auto-select policy.
        let carry = self
            .last_selected
            .take()
            .filter(|pid| session.index().contains_key(pid));
        let initial = carry.or_else(|| {
            self.auto_select_root.then(|| session.dataset.root.clone())
        });
        if let Some(pid) = initial {
            // The root is always indexed, so this only fails on carry-over
            // races that filter discards above already rule out.
            if let Err(e) = session.select(&pid) {
                warn!("initial selection failed: {e}");
            } else {
                self.last_selected = Some(pid);
            }
        }

        self.state = ViewerState::Ready(session);
    }

    /// Select a process for inspection.
    ///
    /// # Errors
    ///
    /// `UnknownProcess` when no build has completed yet or the PID is not in
    /// the current index; the prior selection is left unchanged.
    pub fn select(&mut self, pid: &Pid) -> Result<(), SelectionError> {
        let ViewerState::Ready(session) = &mut self.state else {
            return Err(SelectionError::UnknownProcess(pid.clone()));
        };
        session.select(pid)?;
        self.last_selected = Some(pid.clone());
        Ok(())
    }

    /// Human-readable summary of the viewport and threshold in effect.
    /// Exact wording contract; `None` until a build has completed.
    pub fn timeline_description(&self) -> Option<String> {
        let session = self.session()?;
        Some(format!(
            "Displayed timeline from {} up to {} seconds. Scale is {} ms/pixel and duration threshold is {} seconds.",
            self.viewport.start / 1000.0,
            self.viewport.end / 1000.0,
            1.0 / self.viewport.scale,
            session.dataset.properties.threshold
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_data::{Process, Properties, Syscall};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Loader returning canned responses in order.
    struct StubLoader {
        responses: Mutex<VecDeque<Result<TraceDataset, LoadFailure>>>,
    }

    impl StubLoader {
        fn new(responses: Vec<Result<TraceDataset, LoadFailure>>) -> Self {
            Self { responses: Mutex::new(responses.into_iter().collect()) }
        }
    }

    impl DatasetLoader for StubLoader {
        async fn load(&self, _url: &str) -> Result<TraceDataset, LoadFailure> {
            self.responses.lock().unwrap().pop_front().expect("no canned response left")
        }
    }

    fn process(start: f64, end: f64, children: &[&str]) -> Process {
        Process {
            start,
            end,
            kind: "make".to_string(),
            parent: None,
            children: children.iter().copied().map(Pid::from).collect(),
            syscalls: vec![Syscall { cmd: "execve(make)".to_string(), duration: end - start }],
        }
    }

    fn dataset(root: &str, entries: Vec<(&str, Process)>) -> TraceDataset {
        TraceDataset {
            processes: entries.into_iter().map(|(pid, p)| (Pid::from(pid), p)).collect(),
            root: Pid::from(root),
            properties: Properties { threshold: 0.0 },
        }
    }

    fn viewport() -> Viewport {
        Viewport { start: 0.0, end: 40000.0, scale: 0.1 }
    }

    fn two_process_dataset() -> TraceDataset {
        dataset(
            "0",
            vec![("0", process(0.0, 1000.0, &["1"])), ("1", process(100.0, 400.0, &[]))],
        )
    }

    #[tokio::test]
    async fn test_load_builds_and_auto_selects_root() {
        let loader = StubLoader::new(vec![Ok(two_process_dataset())]);
        let mut viewer = Viewer::new(loader, viewport());
        viewer.load("trace.json").await;

        let session = viewer.session().unwrap();
        assert_eq!(session.bars.len(), 1);
        assert_eq!(session.selected(), Some(&Pid::from("0")));
        assert_eq!(
            session.view().unwrap().description(),
            "Process #0 — Process duration: 1 sec."
        );
    }

    #[tokio::test]
    async fn test_timeline_description_wording() {
        let loader = StubLoader::new(vec![Ok(TraceDataset {
            properties: Properties { threshold: 0.1 },
            ..two_process_dataset()
        })]);
        let mut viewer = Viewer::new(loader, viewport());
        assert_eq!(viewer.timeline_description(), None);
        viewer.load("trace.json").await;
        assert_eq!(
            viewer.timeline_description().unwrap(),
            "Displayed timeline from 0 up to 40 seconds. Scale is 10 ms/pixel and duration threshold is 0.1 seconds."
        );
    }

    #[tokio::test]
    async fn test_no_auto_select_policy() {
        let loader = StubLoader::new(vec![Ok(two_process_dataset())]);
        let mut viewer = Viewer::new(loader, viewport()).auto_select_root(false);
        viewer.load("trace.json").await;
        assert_eq!(viewer.session().unwrap().selected(), None);
    }

    #[tokio::test]
    async fn test_select_before_first_load_is_rejected() {
        let loader = StubLoader::new(vec![]);
        let mut viewer = Viewer::new(loader, viewport());
        assert!(matches!(
            viewer.select(&Pid::from("0")),
            Err(SelectionError::UnknownProcess(_))
        ));
    }

    #[tokio::test]
    async fn test_load_failure_shows_inline_error_and_recovers() {
        let loader = StubLoader::new(vec![
            Err(LoadFailure { status: 404, message: "Not Found".to_string() }),
            Ok(two_process_dataset()),
        ]);
        let mut viewer = Viewer::new(loader, viewport());

        viewer.load("gone.json").await;
        match viewer.state() {
            ViewerState::Failed { error } => {
                assert_eq!(error.to_string(), "Loading \"gone.json\" failed. Error: 404 Not Found");
            }
            other => panic!("expected failed state, got {other:?}"),
        }

        // A later load attempt must be possible
        viewer.load("trace.json").await;
        assert!(viewer.session().is_some());
    }

    #[tokio::test]
    async fn test_build_error_surfaces_as_failed_state() {
        let loader = StubLoader::new(vec![Ok(dataset(
            "missing",
            vec![("0", process(0.0, 1000.0, &[]))],
        ))]);
        let mut viewer = Viewer::new(loader, viewport());
        viewer.load("trace.json").await;
        assert!(matches!(
            viewer.state(),
            ViewerState::Failed { error: ViewerError::Build { .. } }
        ));
    }

    #[tokio::test]
    async fn test_selection_survives_reload_when_pid_still_exists() {
        let loader =
            StubLoader::new(vec![Ok(two_process_dataset()), Ok(two_process_dataset())]);
        let mut viewer = Viewer::new(loader, viewport());
        viewer.load("trace.json").await;
        viewer.select(&Pid::from("1")).unwrap();

        viewer.load("trace.json").await;
        assert_eq!(viewer.session().unwrap().selected(), Some(&Pid::from("1")));
    }

    #[tokio::test]
    async fn test_selection_resets_when_pid_disappears() {
        let loader = StubLoader::new(vec![
            Ok(two_process_dataset()),
            Ok(dataset("0", vec![("0", process(0.0, 1000.0, &[]))])),
        ]);
        let mut viewer = Viewer::new(loader, viewport());
        viewer.load("trace.json").await;
        viewer.select(&Pid::from("1")).unwrap();

        viewer.load("trace.json").await;
        // Falls back to the auto-select policy
        assert_eq!(viewer.session().unwrap().selected(), Some(&Pid::from("0")));
    }

    #[tokio::test]
    async fn test_stale_load_result_is_discarded() {
        let loader = StubLoader::new(vec![]);
        let mut viewer = Viewer::new(loader, viewport());

        let stale = viewer.begin_load("first.json");
        let latest = viewer.begin_load("second.json");

        // The earlier response arrives late and must not win
        viewer.finish_load(stale, "first.json", Ok(two_process_dataset()));
        assert!(matches!(viewer.state(), ViewerState::Loading { .. }));

        viewer.finish_load(latest, "second.json", Ok(two_process_dataset()));
        assert!(viewer.session().is_some());
    }

    #[tokio::test]
    async fn test_threshold_override_applies_before_build() {
        let loader = StubLoader::new(vec![Ok(two_process_dataset())]);
        let mut viewer = Viewer::new(loader, viewport()).threshold_override(Some(5.0));
        viewer.load("trace.json").await;

        let session = viewer.session().unwrap();
        // 1s root < 5s threshold: no bars, but the root is still indexed
        assert!(session.bars.is_empty());
        assert!(session.index().contains_key(&Pid::from("0")));
    }
}
