//! Sliding window of page links shown around the current page.

/// Page numbers to display for `page` out of `total_pages`.
///
/// The window starts `window_size / 2` pages before the current page. When it
/// would run past the last page it is pulled back so it ends on the last page,
/// and `start` is clamped to 1 a second time after that shift.
pub fn build_window(page: u64, total_pages: u64, window_size: u64) -> Vec<u64> {
    if total_pages == 0 || window_size == 0 {
        return Vec::new();
    }

    let mut start = page.saturating_sub(window_size / 2).max(1);
    let end = match start.checked_add(window_size - 1) {
        Some(end) if end <= total_pages => end,
        _ => {
            start = total_pages.saturating_sub(window_size - 1).max(1);
            total_pages
        }
    };

    (start..=end).collect()
}
