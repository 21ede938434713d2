use ratatui::style::{Color, Modifier, Style};
use rust_decimal::Decimal;

pub(crate) const BASE: Color = Color::Rgb(30, 30, 46);
pub(crate) const MANTLE: Color = Color::Rgb(24, 24, 37);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const SUBTEXT: Color = Color::Rgb(127, 132, 156);
pub(crate) const BLUE: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);

pub(crate) fn header_style() -> Style {
    Style::default().fg(TEXT).bg(BASE).add_modifier(Modifier::BOLD)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(SUBTEXT).add_modifier(Modifier::BOLD)
}

pub(crate) fn section_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub(crate) fn cursor_style() -> Style {
    Style::default().fg(BASE).bg(BLUE)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(SUBTEXT)
}

pub(crate) fn stripe_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(MANTLE)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(SUBTEXT).bg(SURFACE)
}

/// Green for money in, red for money out, plain for zero.
pub(crate) fn amount_color(amount: Decimal) -> Color {
    if amount > Decimal::ZERO {
        GREEN
    } else if amount < Decimal::ZERO {
        RED
    } else {
        TEXT
    }
}

pub(crate) fn mode_badge(bg: Color) -> Style {
    Style::default().fg(BASE).bg(bg).add_modifier(Modifier::BOLD)
}
