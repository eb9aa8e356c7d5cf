use std::sync::atomic::Ordering;

use atomic::Atomic;
use ratatui::style::{Color, Modifier, Style};

use crate::data::{ColorState, StockColorMode};

static COLOR_MODE: Atomic<StockColorMode> = Atomic::new(StockColorMode::RedUp);

#[inline]
pub fn header() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn label() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn text_selected() -> Style {
    text().add_modifier(Modifier::REVERSED)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text().add_modifier(Modifier::BOLD)
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn busy() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn set_color_mode(mode: StockColorMode) {
    COLOR_MODE.store(mode, Ordering::Relaxed);
}

#[inline]
pub fn color_mode() -> StockColorMode {
    COLOR_MODE.load(Ordering::Relaxed)
}

/// Foreground for a directional signal under the active color mode
pub fn signal_color(state: ColorState) -> Color {
    let (up, down) = match color_mode() {
        StockColorMode::RedUp => (Color::LightRed, Color::LightGreen),
        StockColorMode::GreenUp => (Color::LightGreen, Color::LightRed),
    };
    match state {
        ColorState::Up => up,
        ColorState::Down => down,
        ColorState::Neutral => Color::White,
    }
}

#[inline]
pub fn signal(state: ColorState) -> Style {
    Style::default().fg(signal_color(state))
}

/// Bull and bear colors for the candlestick chart
pub fn bull_bear_color() -> (Color, Color) {
    (signal_color(ColorState::Up), signal_color(ColorState::Down))
}
