//! TUI color theme

use ratatui::style::Color;

pub const FG_TEXT: Color = Color::Rgb(220, 220, 220);
pub const FG_DIM: Color = Color::Rgb(130, 130, 130);
pub const ACCENT: Color = Color::Rgb(95, 175, 255);
pub const WARNING: Color = Color::Rgb(255, 191, 0);
pub const ERROR: Color = Color::Rgb(255, 85, 85);

/// Bar colors, assigned per process category.
const BAR_PALETTE: [Color; 6] = [
    Color::Rgb(95, 175, 255),
    Color::Rgb(135, 215, 135),
    Color::Rgb(255, 175, 95),
    Color::Rgb(215, 135, 215),
    Color::Rgb(95, 215, 215),
    Color::Rgb(215, 215, 95),
];

/// Stable color for a category class: the same class always renders in the
/// same color within and across frames.
#[must_use]
pub fn category_color(class: &str) -> Color {
    let sum: usize = class.bytes().map(usize::from).sum();
    BAR_PALETTE[sum % BAR_PALETTE.len()]
}
