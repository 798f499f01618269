//! Progress reporting for a volume walk
//!
//! The denominator comes from the volume superblock's declared object
//! counters, which may lag the live namespace; the bar can therefore finish
//! short of (or run past) the bracket end. It saturates instead of
//! overflowing.

use std::io::{self, Write};

/// Redraw the bar every this many objects to bound terminal output
pub const REFRESH_INTERVAL: u64 = 50;

/// Columns reserved for the brackets and trailing count
const WIDTH_MARGIN: usize = 12;

const DEFAULT_COLUMNS: usize = 80;
const MIN_BAR_WIDTH: usize = 10;

/// Filled cell count for a bar of `width` cells
///
/// Monotonically non-decreasing in `processed` and never exceeds `width`.
pub fn filled_width(processed: u64, total: u64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    if total == 0 {
        // Nothing was expected; show the bar complete
        return width;
    }
    let filled = (width as u128 * processed as u128 / total as u128) as usize;
    filled.min(width)
}

/// Render the bracketed bar, e.g. `[#####     ]`
pub fn render_bar(processed: u64, total: u64, width: usize) -> String {
    let filled = filled_width(processed, total, width);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '#' } else { ' ' });
    }
    bar.push(']');
    bar
}

fn terminal_columns() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&c| c > 0)
        .unwrap_or(DEFAULT_COLUMNS)
}

/// Tracks `(processed, total)` for one volume and renders the bar
pub struct ProgressMeter {
    processed: u64,
    total: u64,
    width: usize,
    enabled: bool,
}

impl ProgressMeter {
    /// Create a meter for a volume with `total` estimated objects
    pub fn new(total: u64, enabled: bool) -> Self {
        let width = terminal_columns()
            .saturating_sub(WIDTH_MARGIN)
            .max(MIN_BAR_WIDTH);
        Self {
            processed: 0,
            total,
            width,
            enabled,
        }
    }

    /// Objects processed so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Account for one directory entry
    ///
    /// Redraws at the refresh cadence, before the count advances, so the
    /// very first entry paints an empty bar.
    pub fn advance(&mut self) {
        if self.enabled && self.processed % REFRESH_INTERVAL == 0 {
            self.draw(false);
        }
        self.processed += 1;
    }

    /// Final render, newline-terminated so the bar survives completion
    pub fn finish(&self) {
        if self.enabled {
            self.draw(true);
        }
    }

    fn draw(&self, last: bool) {
        let bar = render_bar(self.processed, self.total, self.width);
        let mut err = io::stderr();
        if last {
            let _ = writeln!(err, "\r{} {}/{}", bar, self.processed, self.total);
        } else {
            let _ = write!(err, "\r{} {}/{}", bar, self.processed, self.total);
            // Partial lines stay invisible without an explicit flush
            let _ = err.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_width_bounds() {
        assert_eq!(filled_width(0, 100, 40), 0);
        assert_eq!(filled_width(50, 100, 40), 20);
        assert_eq!(filled_width(100, 100, 40), 40);
        // Processed past the stale estimate saturates at full width
        assert_eq!(filled_width(250, 100, 40), 40);
    }

    #[test]
    fn test_filled_width_monotone() {
        let mut last = 0;
        for processed in 0..500 {
            let filled = filled_width(processed, 321, 64);
            assert!(filled >= last);
            assert!(filled <= 64);
            last = filled;
        }
    }

    #[test]
    fn test_filled_width_zero_total() {
        assert_eq!(filled_width(0, 0, 40), 40);
        assert_eq!(filled_width(7, 0, 40), 40);
    }

    #[test]
    fn test_render_bar_shape() {
        let bar = render_bar(5, 10, 10);
        assert_eq!(bar, "[#####     ]");
        assert_eq!(bar.len(), 12);

        assert_eq!(render_bar(0, 10, 10), "[          ]");
        assert_eq!(render_bar(10, 10, 10), "[##########]");
    }

    #[test]
    fn test_meter_counts_entries() {
        let mut meter = ProgressMeter::new(100, false);
        for _ in 0..42 {
            meter.advance();
        }
        assert_eq!(meter.processed(), 42);
    }
}
