//! Assertion functions for range read results.
//!
//! These work with batches carrying a non-null `Int64` column named `id` that
//! numbers rows from zero, as [`sample_batch`](super::sample_batch) produces.

use crate::window::BatchWindow;
use arrow::array::{Array, Int64Array};

/// The `id` values selected by each window, concatenated in order.
///
/// # Panics
///
/// Panics if a window's batch has no `Int64` column named `id`.
#[must_use]
pub fn window_ids(windows: &[BatchWindow]) -> Vec<i64> {
    windows
        .iter()
        .flat_map(|w| {
            w.slice()
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
                .expect("window batch has an Int64 `id` column")
                .values()
                .to_vec()
        })
        .collect()
}

/// Assert that `windows` is the result of reading `[start, start + limit)`.
///
/// Checks that sizes add up to `limit`, that the selected ids are exactly
/// `start..start + limit` in order, and that only an empty read produces an
/// empty window (and then exactly one).
///
/// # Panics
///
/// Panics if any of the checks fail.
///
/// # Example
///
/// ```
/// use ironbatch::BatchWindow;
/// use ironbatch::testing::*;
///
/// let windows = vec![
///     BatchWindow::try_new(sample_batch(0..10), 5, 10).unwrap(),
///     BatchWindow::try_new(sample_batch(10..20), 0, 5).unwrap(),
/// ];
/// assert_windows_cover(&windows, 5, 10);
/// ```
pub fn assert_windows_cover(windows: &[BatchWindow], start: u64, limit: u64) {
    assert!(!windows.is_empty(), "a read never returns zero windows");

    let total: u64 = windows.iter().map(|w| w.size() as u64).sum();
    assert_eq!(
        total, limit,
        "window sizes add up to {total}, expected {limit}:\n  windows: {:?}",
        windows.iter().map(|w| (w.start(), w.end())).collect::<Vec<_>>()
    );

    if limit == 0 {
        assert_eq!(windows.len(), 1, "an empty read returns exactly one window");
        return;
    }
    for (i, w) in windows.iter().enumerate() {
        assert!(!w.is_empty(), "window #{i} is empty in a non-empty read");
    }

    let expected: Vec<i64> = (start..start + limit)
        .map(|i| i64::try_from(i).expect("row id fits in i64"))
        .collect();
    let actual = window_ids(windows);
    assert_eq!(
        actual, expected,
        "windows do not reconstruct rows [{start}, {})",
        start + limit
    );
}
