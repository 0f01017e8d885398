//! Candlestick chart of the visible window.
//!
//! Renders using direct buffer writes:
//! - Each candle = 1 terminal column, newest on the right
//! - Body: block char, green if close >= open, pink otherwise
//! - Wicks: vertical line chars to high/low
//! - The current bar is drawn in the highlight colour with a marker above it
//!
//! When the window is wider than the plot, the oldest bars are dropped so the
//! current bar always stays in view.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};
use ratatui::Frame;

use papertrade_core::PriceBar;

use crate::app::AppState;
use crate::theme;
use crate::ui::panel_block;

const LABEL_WIDTH: u16 = 9;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(session) = &app.session else {
        return;
    };
    let bars = session.visible_bars();
    let highlight = session.cursor().highlight_offset();
    let title = format!(
        "{} | {} bars | {} to {}",
        session.stock_id(),
        bars.len(),
        bars.first().map(|b| b.date.to_string()).unwrap_or_default(),
        bars.last().map(|b| b.date.to_string()).unwrap_or_default(),
    );
    let widget = CandleChart::new(bars, Some(highlight)).block(panel_block(title, true));
    f.render_widget(widget, area);
}

pub struct CandleChart<'a> {
    bars: &'a [PriceBar],
    highlight: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> CandleChart<'a> {
    /// `highlight` indexes into `bars`.
    pub fn new(bars: &'a [PriceBar], highlight: Option<usize>) -> Self {
        Self {
            bars,
            highlight,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Map a price to a Y position in the plot area (0 = top).
fn price_to_y(price: f64, y_min: f64, y_max: f64, plot_height: u16) -> u16 {
    if (y_max - y_min).abs() < 1e-9 || plot_height == 0 {
        return 0;
    }
    let last = plot_height.saturating_sub(1) as f64;
    let frac = (price - y_min) / (y_max - y_min);
    (last * (1.0 - frac)).round().clamp(0.0, last) as u16
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.is_empty() {
            return;
        }
        if self.bars.is_empty() {
            buf.set_stringn(inner.x, inner.y, "No data", inner.width as usize, theme::muted());
            return;
        }

        // Reserve a left margin for price labels, one row on top for the
        // current-bar marker and one at the bottom for dates.
        let plot_left = inner.x + LABEL_WIDTH;
        let plot_top = inner.y + 1;
        let plot_width = inner.width.saturating_sub(LABEL_WIDTH);
        let plot_height = inner.height.saturating_sub(2);
        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let shown = self.bars.len().min(plot_width as usize);
        let first = self.bars.len() - shown;
        let visible = &self.bars[first..];

        let y_min = visible.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let y_max = visible
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let rows = [0u16, plot_height / 2, plot_height.saturating_sub(1)];
        for (value, row) in labels.iter().zip(rows) {
            buf.set_string(
                inner.x,
                plot_top + row,
                format!("{value:>8.2}"),
                theme::muted(),
            );
        }

        for (i, bar) in visible.iter().enumerate() {
            let x = plot_left + i as u16;
            let is_current = self.highlight == Some(first + i);
            let style = if is_current {
                theme::highlight()
            } else if bar.is_up() {
                Style::default().fg(theme::up())
            } else {
                Style::default().fg(theme::down())
            };

            let high_y = price_to_y(bar.high, y_lower, y_upper, plot_height);
            let low_y = price_to_y(bar.low, y_lower, y_upper, plot_height);
            let body_top = price_to_y(bar.open.max(bar.close), y_lower, y_upper, plot_height);
            let body_bot = price_to_y(bar.open.min(bar.close), y_lower, y_upper, plot_height);

            for y in high_y..body_top {
                buf.set_string(x, plot_top + y, "│", style);
            }
            let body = if bar.is_up() { "█" } else { "▓" };
            for y in body_top..=body_bot {
                buf.set_string(x, plot_top + y, body, style);
            }
            for y in (body_bot + 1)..=low_y {
                buf.set_string(x, plot_top + y, "│", style);
            }

            if is_current {
                buf.set_string(x, inner.y, "▼", theme::highlight());
            }
        }

        // Date axis: oldest shown on the left, current bar's date on the right.
        let axis_y = plot_top + plot_height;
        if axis_y < inner.bottom() {
            let left = visible[0].date.format("%Y-%m-%d").to_string();
            buf.set_stringn(plot_left, axis_y, &left, plot_width as usize, theme::muted());
            if let Some(last) = visible.last() {
                let right = last.date.format("%Y-%m-%d").to_string();
                let rx = (plot_left + plot_width).saturating_sub(right.len() as u16);
                if rx > plot_left + left.len() as u16 {
                    buf.set_string(rx, axis_y, &right, theme::muted());
                }
            }
        }
    }
}
