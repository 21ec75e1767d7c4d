//! Colours for the presentation. Warm, low-contrast, close to the fallback
//! circle fill.

use ratatui::style::{Color, Modifier, Style};

pub(crate) const BACKGROUND: Color = Color::Rgb(24, 21, 17);
pub(crate) const TEXT: Color = Color::Rgb(226, 216, 196);
pub(crate) const DIM: Color = Color::Rgb(128, 116, 98);
pub(crate) const ACCENT: Color = Color::Rgb(214, 160, 90);
pub(crate) const STATUS_BG: Color = Color::Rgb(44, 39, 32);

pub(crate) fn rgb(pixel: [u8; 3]) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

pub(crate) fn base() -> Style {
    Style::default().fg(TEXT).bg(BACKGROUND)
}

pub(crate) fn dim() -> Style {
    base().fg(DIM)
}

pub(crate) fn accent() -> Style {
    base().fg(ACCENT)
}

pub(crate) fn title() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub(crate) fn term_number(hovered: bool) -> Style {
    if hovered {
        title().add_modifier(Modifier::UNDERLINED)
    } else {
        title()
    }
}

pub(crate) fn button(disabled: bool) -> Style {
    if disabled {
        dim()
    } else {
        accent()
    }
}

pub(crate) fn status() -> Style {
    Style::default().fg(DIM).bg(STATUS_BG)
}
