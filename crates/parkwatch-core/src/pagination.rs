// ── Map pagination ──

/// Spots shown per map page.
pub const SPOTS_PER_PAGE: u32 = 12;

/// Maximum number of numbered page buttons.
pub const WINDOW_SIZE: u32 = 5;

/// Number of pages needed for `total` items.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
}

/// Page numbers to show, centered on `current` and clamped to `[1, total]`.
///
/// `(1, 10)` → `1..=5`, `(5, 10)` → `3..=7`, `(10, 10)` → `6..=10`.
pub fn page_window(current: u32, total: u32) -> Vec<u32> {
    let len = WINDOW_SIZE.min(total);
    if len == 0 {
        return Vec::new();
    }
    let ideal = i64::from(current) - 2;
    let latest_start = i64::from(total) - i64::from(WINDOW_SIZE - 1);
    let start = u32::try_from(ideal.min(latest_start).max(1)).unwrap_or(1);
    (start..start + len).collect()
}

/// Everything a pagination control renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub current: u32,
    pub total: u32,
    pub window: Vec<u32>,
    /// Target of "Previous", `None` when on the first page.
    pub prev: Option<u32>,
    /// Target of "Next", `None` when on the last page.
    pub next: Option<u32>,
}

impl PageControls {
    pub fn new(current: u32, total: u32) -> Self {
        Self {
            current,
            total,
            window: page_window(current, total),
            prev: (current > 1).then(|| current - 1),
            next: (current < total).then(|| current + 1),
        }
    }
}
