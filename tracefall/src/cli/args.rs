//! CLI argument definitions

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "tracefall",
    about = "Render a process trace dataset as a waterfall timeline",
    after_help = "\
EXAMPLES:
    tracefall trace.json                         Open the interactive viewer
    tracefall trace.json --end 80000 --scale 0.05   Wider window, coarser scale
    tracefall trace.json --threshold 0.5 --headless Text report, 0.5s threshold"
)]
pub struct Args {
    /// Trace dataset to display (JSON)
    #[arg(value_name = "DATASET")]
    pub dataset: String,

    /// Viewport start in milliseconds
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,

    /// Viewport end in milliseconds (inclusive)
    #[arg(long, default_value_t = 40000.0)]
    pub end: f64,

    /// Viewport scale in pixels per millisecond
    #[arg(long, default_value_t = 0.1)]
    pub scale: f64,

    /// Override the dataset's duration threshold (seconds)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Lay out every visible process at absolute offsets instead of nesting
    #[arg(long)]
    pub flat: bool,

    /// Leave the view unselected after a load instead of selecting the root
    #[arg(long)]
    pub no_auto_select: bool,

    /// Print the waterfall as text and exit (no TUI)
    #[arg(long)]
    pub headless: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
