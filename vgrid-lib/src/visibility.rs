//! Visibility resolver: which rows to materialize for a scroll position.

use crate::store::Row;

/// Scroll state the resolver works from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Current scroll offset in pixels.
    pub scroll_offset: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Fixed row height in pixels.
    pub row_height: u32,
    /// Rows above the viewport that stay materialized.
    pub backward_slack_rows: u32,
}

impl Window {
    /// Inclusive end of the visible band.
    fn bottom(&self) -> i64 {
        self.scroll_offset as i64 + self.viewport_height as i64
    }

    /// Lowest position kept alive above the viewport.
    fn slack_top(&self) -> i64 {
        self.scroll_offset as i64 - (self.backward_slack_rows as i64 * self.row_height as i64)
    }

    /// Whether a row at `position` belongs on screen.
    pub fn contains(&self, position: u32) -> bool {
        let position = position as i64;
        position >= self.scroll_offset as i64 && position <= self.bottom()
    }

    /// Whether a live row at `position` has left the kept band.
    pub fn is_outside_slack(&self, position: u32) -> bool {
        let position = position as i64;
        position < self.slack_top() || position > self.bottom()
    }
}

/// Row indices to create and destroy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityChange {
    /// Rows to create a visual element for, in display order.
    pub to_materialize: Vec<usize>,
    /// Rows whose visual element must go, in display order.
    pub to_dematerialize: Vec<usize>,
}

impl VisibilityChange {
    /// Returns `true` when nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.to_materialize.is_empty() && self.to_dematerialize.is_empty()
    }
}

/// Compute the materialization delta for the current window.
///
/// A row is materialized when it is not yet live and its position lies in
/// `[scroll, scroll + viewport]`. A live row is dropped once its position is
/// above `scroll - slack` or below `scroll + viewport`; rows in the slack
/// band just above the viewport stay live.
pub fn resolve(rows: &[Row], window: Window) -> VisibilityChange {
    let mut change = VisibilityChange::default();
    for (index, row) in rows.iter().enumerate() {
        if row.materialized {
            if window.is_outside_slack(row.position) {
                change.to_dematerialize.push(index);
            }
        } else if window.contains(row.position) {
            change.to_materialize.push(index);
        }
    }
    change
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::Record;

    fn rows(n: usize, row_height: u32) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                data: Arc::new(Record::new().set("id", i as i64)),
                position: i as u32 * row_height,
                materialized: false,
            })
            .collect()
    }

    fn window(scroll_offset: u32) -> Window {
        Window {
            scroll_offset,
            viewport_height: 100,
            row_height: 10,
            backward_slack_rows: 2,
        }
    }

    #[test]
    fn test_initial_window_is_inclusive() {
        let rows = rows(50, 10);
        let change = resolve(&rows, window(0));
        assert_eq!(change.to_materialize, (0..=10).collect::<Vec<_>>());
        assert!(change.to_dematerialize.is_empty());
    }

    #[test]
    fn test_backward_slack_keeps_rows_above() {
        let mut rows = rows(50, 10);
        for row in rows.iter_mut().take(11) {
            row.materialized = true;
        }

        let change = resolve(&rows, window(25));
        // Slack band starts at 25 - 2 * 10 = 5.
        assert_eq!(change.to_dematerialize, vec![0]);
        assert_eq!(change.to_materialize, vec![11, 12]);
    }

    #[test]
    fn test_rows_below_viewport_are_dropped() {
        let mut rows = rows(50, 10);
        for row in rows.iter_mut().skip(20).take(11) {
            row.materialized = true;
        }

        let change = resolve(&rows, window(0));
        assert_eq!(change.to_dematerialize, (20..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_rows() {
        assert!(resolve(&[], window(0)).is_empty());
    }
}
