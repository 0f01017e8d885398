//! Day-window cursor — maps a "current day" pointer onto the visible and
//! tradable slice of a price series.
//!
//! The cursor starts on the last bar of the first full window (or the last bar
//! of the series if it is shorter than one window) and only moves forward.
//! Advancing is clamped at the final bar.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lookback shown on screen.
pub const DEFAULT_WINDOW_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("price series is empty")]
    EmptySeries,
    #[error("window size must be at least 1")]
    ZeroWindow,
}

/// How far a single user step moves the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepSize {
    Day,
    Week,
    Month,
}

impl StepSize {
    /// Number of bars this step advances.
    pub fn bars(self) -> usize {
        match self {
            StepSize::Day => 1,
            StepSize::Week => 7,
            StepSize::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepSize::Day => "+1 day",
            StepSize::Week => "+1 week",
            StepSize::Month => "+1 month",
        }
    }
}

/// Result of an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The cursor moved. `exhausted` is true when it landed on the final bar.
    Moved { from: usize, to: usize, exhausted: bool },
    /// Already on the final bar; nothing changed.
    Exhausted,
}

impl StepOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, StepOutcome::Moved { .. })
    }

    /// Bars actually advanced (may be fewer than requested near the end).
    pub fn bars_moved(&self) -> usize {
        match self {
            StepOutcome::Moved { from, to, .. } => to - from,
            StepOutcome::Exhausted => 0,
        }
    }
}

/// Cursor over a series of `total_days` bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCursor {
    current_index: usize,
    window_size: usize,
    total_days: usize,
}

impl DayCursor {
    /// Place the cursor at `min(window_size - 1, total_days - 1)`.
    pub fn new(total_days: usize, window_size: usize) -> Result<Self, CursorError> {
        if total_days == 0 {
            return Err(CursorError::EmptySeries);
        }
        if window_size == 0 {
            return Err(CursorError::ZeroWindow);
        }
        Ok(Self {
            current_index: (window_size - 1).min(total_days - 1),
            window_size,
            total_days,
        })
    }

    pub fn with_default_window(total_days: usize) -> Result<Self, CursorError> {
        Self::new(total_days, DEFAULT_WINDOW_SIZE)
    }

    /// Move back to the starting position chosen by `new`.
    pub fn rewind(&mut self) {
        self.current_index = (self.window_size - 1).min(self.last_index());
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn total_days(&self) -> usize {
        self.total_days
    }

    fn last_index(&self) -> usize {
        self.total_days - 1
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index == self.last_index()
    }

    /// Bars left after the current one.
    pub fn remaining(&self) -> usize {
        self.last_index() - self.current_index
    }

    /// Move forward `steps` bars, clamped at the final bar.
    pub fn advance(&mut self, steps: usize) -> StepOutcome {
        if self.is_exhausted() {
            return StepOutcome::Exhausted;
        }
        let from = self.current_index;
        self.current_index = from.saturating_add(steps).min(self.last_index());
        if self.current_index == from {
            // steps == 0
            return StepOutcome::Moved {
                from,
                to: from,
                exhausted: false,
            };
        }
        StepOutcome::Moved {
            from,
            to: self.current_index,
            exhausted: self.is_exhausted(),
        }
    }

    pub fn step(&mut self, size: StepSize) -> StepOutcome {
        self.advance(size.bars())
    }

    /// Half-open index range of the visible window, ending at the current bar.
    pub fn visible_window(&self) -> Range<usize> {
        let start = (self.current_index + 1).saturating_sub(self.window_size);
        start..self.current_index + 1
    }

    /// Position of the current bar inside the visible window.
    pub fn highlight_offset(&self) -> usize {
        self.current_index - self.visible_window().start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_full_window() {
        let cursor = DayCursor::new(500, 500).unwrap();
        assert_eq!(cursor.current_index(), 499);
        assert_eq!(cursor.visible_window(), 0..500);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn initialize_short_series_spans_everything() {
        let cursor = DayCursor::new(120, 500).unwrap();
        assert_eq!(cursor.current_index(), 119);
        assert_eq!(cursor.visible_window(), 0..120);
    }

    #[test]
    fn initialize_long_series_starts_after_first_window() {
        let cursor = DayCursor::with_default_window(1200).unwrap();
        assert_eq!(cursor.current_index(), 499);
        assert_eq!(cursor.visible_window(), 0..500);
        assert_eq!(cursor.remaining(), 700);
    }

    #[test]
    fn rejects_empty_series_and_zero_window() {
        assert_eq!(DayCursor::new(0, 500), Err(CursorError::EmptySeries));
        assert_eq!(DayCursor::new(10, 0), Err(CursorError::ZeroWindow));
    }

    #[test]
    fn window_slides_with_cursor() {
        let mut cursor = DayCursor::new(1000, 500).unwrap();
        let outcome = cursor.step(StepSize::Week);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                from: 499,
                to: 506,
                exhausted: false
            }
        );
        assert_eq!(cursor.visible_window(), 7..507);
        assert_eq!(cursor.highlight_offset(), 499);
    }

    #[test]
    fn advance_clamps_at_last_bar() {
        let mut cursor = DayCursor::new(510, 500).unwrap();
        let outcome = cursor.step(StepSize::Month);
        assert_eq!(
            outcome,
            StepOutcome::Moved {
                from: 499,
                to: 509,
                exhausted: true
            }
        );
        assert_eq!(outcome.bars_moved(), 10);
        assert!(cursor.is_exhausted());

        assert_eq!(cursor.step(StepSize::Day), StepOutcome::Exhausted);
        assert_eq!(cursor.current_index(), 509);
    }

    #[test]
    fn rewind_returns_to_start() {
        let mut cursor = DayCursor::new(800, 500).unwrap();
        let start = cursor.clone();
        cursor.step(StepSize::Month);
        cursor.step(StepSize::Week);
        assert_eq!(cursor.current_index(), 536);
        cursor.rewind();
        assert_eq!(cursor, start);

        let mut short = DayCursor::new(120, 500).unwrap();
        short.rewind();
        assert_eq!(short.current_index(), 119);
    }

    #[test]
    fn step_sizes() {
        assert_eq!(StepSize::Day.bars(), 1);
        assert_eq!(StepSize::Week.bars(), 7);
        assert_eq!(StepSize::Month.bars(), 30);
    }

    #[test]
    fn huge_advance_does_not_overflow() {
        let mut cursor = DayCursor::new(600, 500).unwrap();
        cursor.advance(usize::MAX);
        assert_eq!(cursor.current_index(), 599);
    }
}
