//! Pagination types shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Requested page window.
///
/// - `page`: 1-based, default 1
/// - `limit`: items per page, 1–100, default 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` to 1–100 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Page metadata returned alongside every list result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    /// Derive metadata for a clamped request over `total_items` matches.
    pub fn new(req: PageRequest, total_items: u64) -> Self {
        let limit = u64::from(req.limit.max(1));
        let total_pages = total_items.div_ceil(limit) as u32;
        Self {
            current_page: req.page,
            total_pages,
            total_items,
            items_per_page: req.limit,
            has_next_page: req.page < total_pages,
            has_prev_page: req.page > 1,
        }
    }
}

/// Slice an in-memory result set down to the requested page.
///
/// Clamps the request first, so callers may pass raw input.
pub fn paginate<T>(items: Vec<T>, req: PageRequest) -> (Vec<T>, PageMeta) {
    let req = req.clamped();
    let meta = PageMeta::new(req, items.len() as u64);
    let page = items
        .into_iter()
        .skip(req.offset() as usize)
        .take(req.limit as usize)
        .collect();
    (page, meta)
}
