//! Color palette for listings. Styles are applied per logical field after
//! the plain layout is fixed, so they never move a column.

use yansi::{Color, Paint, Style};

/// One style per field of a row.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub frame: Style,
    pub date: Style,
    pub status: Style,
    pub id: Style,
    pub indicator: Style,
    pub note: Style,
    pub highlight: Style,
    pub marker: Style,
    pub created: Style,
    pub modified: Style,
}

impl Palette {
    /// Red dates on dark grey, everything else on black.
    pub fn classic() -> Self {
        let on_black = Style::new().bg(Color::Black);
        Self {
            frame: on_black.fg(Color::White),
            date: Style::new().fg(Color::Red).bg(Color::Rgb(28, 28, 28)),
            status: on_black.fg(Color::Yellow),
            id: on_black.fg(Color::White),
            indicator: on_black.fg(Color::Magenta),
            note: on_black.fg(Color::Cyan),
            highlight: on_black.fg(Color::BrightCyan).bold(),
            marker: on_black.fg(Color::Green),
            created: Style::new().fg(Color::Rgb(158, 158, 158)),
            modified: Style::new().fg(Color::Rgb(175, 135, 0)),
        }
    }
}

/// Paint `text` when a style is present, otherwise pass it through.
pub fn paint(text: &str, style: Option<Style>) -> String {
    match style {
        Some(style) if !text.is_empty() => text.paint(style).to_string(),
        _ => text.to_string(),
    }
}
