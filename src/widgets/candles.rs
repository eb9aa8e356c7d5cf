//! Candlestick and volume panes drawn cell by cell into a ratatui buffer.
//!
//! Each candle takes one column. A row is picked a glyph by how far the
//! wick and body reach into it, in quarter-row steps.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::kline::KlineBar;

/// `"{:>9.2} │"`
const Y_AXIS_WIDTH: u16 = 11;
const LABEL_EVERY: u16 = 4;
/// Shorter areas get no volume pane
const MIN_HEIGHT_FOR_VOLUME: u16 = 12;

const BODY: char = '┃';
const HALF_BODY_BOTTOM: char = '╻';
const HALF_BODY_TOP: char = '╹';
const WICK: char = '│';
const WICK_TOP: char = '╽';
const WICK_BOTTOM: char = '╿';
const UPPER_WICK: char = '╷';
const LOWER_WICK: char = '╵';

pub struct Candles<'a> {
    bars: &'a [KlineBar],
    bull: Color,
    bear: Color,
    axis: Style,
}

impl<'a> Candles<'a> {
    pub fn new(bars: &'a [KlineBar]) -> Self {
        Self {
            bars,
            bull: Color::LightRed,
            bear: Color::LightGreen,
            axis: Style::default().fg(Color::DarkGray),
        }
    }

    #[must_use]
    pub fn colors(mut self, bull: Color, bear: Color) -> Self {
        self.bull = bull;
        self.bear = bear;
        self
    }

    #[must_use]
    pub fn axis_style(mut self, style: Style) -> Self {
        self.axis = style;
        self
    }

    fn color(&self, bar: &KlineBar) -> Color {
        if bar.close >= bar.open {
            self.bull
        } else {
            self.bear
        }
    }
}

impl Widget for Candles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width <= Y_AXIS_WIDTH || area.height == 0 || self.bars.is_empty() {
            return;
        }

        // newest candles win when the history is wider than the plot
        let plot_width = usize::from(area.width - Y_AXIS_WIDTH);
        let visible = &self.bars[self.bars.len().saturating_sub(plot_width)..];
        let left = area.left() + Y_AXIS_WIDTH;

        let max_volume = visible.iter().map(|bar| bar.volume).fold(0.0, f64::max);
        let volume_rows = if area.height >= MIN_HEIGHT_FOR_VOLUME && max_volume > 0.0 {
            area.height / 5
        } else {
            0
        };
        let price_rows = area.height - volume_rows;
        let scale = Scale::new(visible, price_rows);

        for row in 0..price_rows {
            let y = area.top() + price_rows - 1 - row;
            let label = if row % LABEL_EVERY == 0 {
                format!("{:>9.2} │", scale.price_at(row))
            } else {
                format!("{:>9} │", "")
            };
            buf.set_stringn(area.left(), y, label, usize::from(Y_AXIS_WIDTH), self.axis);

            for (x, bar) in (left..).zip(visible) {
                if let Some(glyph) = candle_glyph(bar, row, &scale) {
                    buf.get_mut(x, y).set_char(glyph).set_fg(self.color(bar));
                }
            }
        }

        for row in 0..volume_rows {
            let y = area.bottom() - 1 - row;
            let label = if row + 1 == volume_rows {
                format!("{max_volume:>9.1} │")
            } else {
                format!("{:>9} │", "")
            };
            buf.set_stringn(area.left(), y, label, usize::from(Y_AXIS_WIDTH), self.axis);

            for (x, bar) in (left..).zip(visible) {
                let filled = (bar.volume / max_volume * f64::from(volume_rows)).ceil();
                if f64::from(row) < filled {
                    buf.get_mut(x, y).set_char(BODY).set_fg(self.color(bar));
                }
            }
        }
    }
}

/// Maps prices onto pane rows; row 0 is the bottom one
struct Scale {
    min: f64,
    max: f64,
    rows: f64,
}

impl Scale {
    fn new(bars: &[KlineBar], rows: u16) -> Self {
        let (min, max) = bars
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), bar| {
                (min.min(bar.low), max.max(bar.high))
            });
        Self {
            min,
            max,
            rows: f64::from(rows),
        }
    }

    /// Height of `price` above the pane bottom, in rows
    fn height(&self, price: f64) -> f64 {
        if self.max <= self.min {
            return self.rows / 2.0;
        }
        (price - self.min) / (self.max - self.min) * self.rows
    }

    /// Price at the bottom edge of `row`
    fn price_at(&self, row: u16) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        self.min + f64::from(row) * (self.max - self.min) / self.rows
    }
}

fn candle_glyph(bar: &KlineBar, row: u16, scale: &Scale) -> Option<char> {
    let y = f64::from(row);
    let high = scale.height(bar.high);
    let low = scale.height(bar.low);
    let top = scale.height(bar.open.max(bar.close));
    let bottom = scale.height(bar.open.min(bar.close));

    if high.ceil() >= y && y >= top.floor() {
        // upper wick
        if top - y > 0.75 {
            Some(BODY)
        } else if top - y > 0.25 {
            Some(if high - y > 0.75 { WICK_TOP } else { HALF_BODY_BOTTOM })
        } else if high - y > 0.75 {
            Some(WICK)
        } else if high - y > 0.25 {
            Some(UPPER_WICK)
        } else {
            None
        }
    } else if top.floor() >= y && y >= bottom.ceil() {
        Some(BODY)
    } else if bottom.ceil() >= y && y >= low.floor() {
        // lower wick
        if bottom - y < 0.25 {
            Some(BODY)
        } else if bottom - y < 0.75 {
            Some(if low - y < 0.25 { WICK_BOTTOM } else { HALF_BODY_TOP })
        } else if low - y < 0.25 {
            Some(WICK)
        } else if low - y < 0.75 {
            Some(LOWER_WICK)
        } else {
            None
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, close: f64, high: f64, low: f64, volume: f64) -> KlineBar {
        KlineBar {
            date: "2024-01-02".to_string(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn column(buf: &Buffer, x: u16) -> String {
        (0..buf.area.height).map(|y| buf.get(x, y).symbol.clone()).collect()
    }

    #[test]
    fn glyphs_follow_wick_and_body() {
        let full = bar(10.0, 20.0, 20.0, 10.0, 0.0);
        let inner = bar(14.0, 16.0, 20.0, 10.0, 0.0);
        let scale = Scale::new(&[full.clone(), inner.clone()], 10);

        for row in 0..10 {
            assert_eq!(candle_glyph(&full, row, &scale), Some(BODY), "row {row}");
        }

        // body spans heights 4..6, wicks run to 0 and 10
        assert_eq!(candle_glyph(&inner, 9, &scale), Some(WICK));
        assert_eq!(candle_glyph(&inner, 6, &scale), Some(WICK));
        assert_eq!(candle_glyph(&inner, 5, &scale), Some(BODY));
        assert_eq!(candle_glyph(&inner, 4, &scale), Some(BODY));
        assert_eq!(candle_glyph(&inner, 3, &scale), Some(WICK));
        assert_eq!(candle_glyph(&inner, 0, &scale), Some(WICK));
    }

    #[test]
    fn half_rows_use_half_glyphs() {
        let full = bar(10.0, 20.0, 20.0, 10.0, 0.0);
        let short = bar(14.0, 15.5, 15.5, 14.0, 0.0);
        let scale = Scale::new(&[full, short.clone()], 10);

        // top of the body lands half way into row 5
        assert_eq!(candle_glyph(&short, 5, &scale), Some(HALF_BODY_BOTTOM));
        assert_eq!(candle_glyph(&short, 4, &scale), Some(BODY));
        assert_eq!(candle_glyph(&short, 6, &scale), None);
        assert_eq!(candle_glyph(&short, 2, &scale), None);
    }

    #[test]
    fn flat_history_sits_mid_pane() {
        let flat = bar(10.0, 10.0, 10.0, 10.0, 0.0);
        let scale = Scale::new(std::slice::from_ref(&flat), 8);
        assert!((scale.height(10.0) - 4.0).abs() < f64::EPSILON);
        assert!((scale.price_at(3) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn renders_axis_and_candles() {
        let bars = [
            bar(10.0, 20.0, 20.0, 10.0, 0.0),
            bar(16.0, 14.0, 20.0, 10.0, 0.0),
        ];
        let area = Rect::new(0, 0, 14, 10);
        let mut buf = Buffer::empty(area);
        Candles::new(&bars)
            .colors(Color::Red, Color::Green)
            .render(area, &mut buf);

        assert_eq!(column(&buf, 11), "┃".repeat(10));
        assert_eq!(buf.get(11, 0).fg, Color::Red);
        assert_eq!(column(&buf, 12), "││││┃┃││││");
        assert_eq!(buf.get(12, 5).fg, Color::Green);
        assert_eq!(column(&buf, 13), " ".repeat(10));

        // bottom row carries the lowest price label
        assert_eq!(buf.get(4, 9).symbol, "1");
        assert_eq!(buf.get(10, 9).symbol, "│");
    }

    #[test]
    fn keeps_newest_candles_when_narrow() {
        let bars = [
            bar(10.0, 20.0, 20.0, 10.0, 0.0),
            bar(10.0, 20.0, 20.0, 10.0, 0.0),
            bar(20.0, 10.0, 20.0, 10.0, 0.0),
        ];
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        Candles::new(&bars)
            .colors(Color::Red, Color::Green)
            .render(area, &mut buf);

        assert_eq!(buf.get(11, 0).fg, Color::Green);
    }

    #[test]
    fn volume_pane_scales_to_largest_bar() {
        let bars = [
            bar(10.0, 20.0, 20.0, 10.0, 8.0),
            bar(10.0, 20.0, 20.0, 10.0, 4.0),
        ];
        let area = Rect::new(0, 0, 13, 15);
        let mut buf = Buffer::empty(area);
        Candles::new(&bars).render(area, &mut buf);

        // 15 rows split into 12 price rows and 3 volume rows
        let volume = |x| column(&buf, x).chars().skip(12).collect::<String>();
        assert_eq!(volume(11), "┃┃┃");
        assert_eq!(volume(12), " ┃┃");
    }

    #[test]
    fn too_small_area_draws_nothing() {
        let bars = [bar(10.0, 20.0, 20.0, 10.0, 1.0)];
        let area = Rect::new(0, 0, Y_AXIS_WIDTH, 5);
        let mut buf = Buffer::empty(area);
        Candles::new(&bars).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
