//! # tracefall - Main Entry Point
//!
//! Two operational modes:
//! - **Interactive TUI** (default): navigate the waterfall, inspect syscalls
//! - **Headless** (`--headless`): print the timeline description and bar
//!   tree as text, for CI and scripting

use anyhow::Result;
use clap::Parser;
use log::info;

use tracefall::cli::Args;
use tracefall::domain::BuildError;
use tracefall::loader::FileLoader;
use tracefall::trace_data::Viewport;
use tracefall::tui;
use tracefall::viewer::{Viewer, ViewerState};
use tracefall::waterfall::BarNode;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code_for(&e)
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.root_cause().downcast_ref::<BuildError>() {
        Some(BuildError::InvalidViewport(_)) => EXIT_USAGE,
        _ => EXIT_ERROR,
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();

    let viewport = Viewport { start: args.start, end: args.end, scale: args.scale };
    anyhow::ensure!(
        viewport.end >= viewport.start,
        "viewport end ({}) must not precede its start ({})",
        viewport.end,
        viewport.start
    );

    let mut viewer = Viewer::new(FileLoader, viewport)
        .flatten(args.flat)
        .auto_select_root(!args.no_auto_select)
        .threshold_override(args.threshold);

    info!("loading dataset \"{}\"", args.dataset);
    viewer.load(&args.dataset).await;

    if args.headless {
        return print_report(&viewer, args.quiet);
    }

    tui::run(viewer)
}

/// Text rendition of the waterfall for non-interactive use.
fn print_report(viewer: &Viewer<FileLoader>, quiet: bool) -> Result<()> {
    let session = match viewer.state() {
        ViewerState::Ready(session) => session,
        ViewerState::Failed { error } => {
            if let Some(build) = find_build_error(error) {
                return Err(anyhow::Error::new(build.clone()).context(error.to_string()));
            }
            anyhow::bail!("{error}");
        }
        state => anyhow::bail!("viewer never became ready: {state:?}"),
    };

    if let Some(description) = viewer.timeline_description() {
        println!("{description}");
    }

    if !quiet {
        for warning in &session.warnings {
            println!("warning: {warning}");
        }
    }

    for bar in &session.bars {
        print_bar(bar, 0);
    }

    if let Some(view) = session.view() {
        println!("\n{}", view.description());
        for cmd in &view.commands {
            println!("  {cmd}");
        }
    }

    Ok(())
}

fn print_bar(bar: &BarNode, depth: usize) {
    println!(
        "{:indent$}#{} [{}] left={}px width={}px",
        "",
        bar.id,
        bar.class,
        bar.left,
        bar.width,
        indent = depth * 2
    );
    for child in &bar.children {
        print_bar(child, depth + 1);
    }
}

fn find_build_error(error: &tracefall::domain::ViewerError) -> Option<&BuildError> {
    match error {
        tracefall::domain::ViewerError::Build { source, .. } => Some(source),
        tracefall::domain::ViewerError::Load { .. } => None,
    }
}
