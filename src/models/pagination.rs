//! Pagination envelope shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned next to `data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };
        PageMeta {
            page,
            limit,
            total,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }

    /// Metadata for an empty result set
    pub fn empty(limit: u32) -> Self {
        Self::new(1, limit, 0)
    }
}

/// `{data, meta}` response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Paginated {
            data,
            meta: PageMeta::new(page, limit, total),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
