//! Theme system for human-mode output.

use console::{Color, Style};

use crate::model::Rgb;

/// Visual theme for the panel's human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
pub struct PanelTheme {
    // Status styles
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub group: Style,
    pub group_selected: Style,
    pub index: Style,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().color256(33).bold(),
            success: Style::new().color256(41).bold(),
            error: Style::new().color256(203).bold(),
            warning: Style::new().color256(214).bold(),
            muted: Style::new().color256(244),
            header: Style::new().color256(33).bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            group: Style::new(),
            group_selected: Style::new().color256(41).bold(),
            index: Style::new().color256(214).bold(),
        }
    }
}

impl PanelTheme {
    /// Style that paints a swatch in the closest xterm-256 color.
    pub fn swatch(color: Rgb) -> Style {
        Style::new().fg(Color::Color256(xterm_index(color)))
    }
}

/// Nearest entry of the 6x6x6 xterm color cube.
pub fn xterm_index(Rgb(r, g, b): Rgb) -> u8 {
    let level = |c: u8| ((u16::from(c) * 5 + 127) / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}
