//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use gigtrack_core::pagination;
use serde::Deserialize;

use crate::error::AppError;

/// Generic page-based pagination parameters (`?page=&page_size=`).
///
/// Used by the notification feed and the project listing. Page numbers are
/// 1-based; `page_size` must be one of [`pagination::PAGE_SIZE_OPTIONS`].
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParams {
    /// Resolve the raw parameters into a concrete `(page, page_size)` pair.
    ///
    /// Rejects a `page_size` outside the allowed options with a 400. The
    /// page itself is not validated here: callers clamp it against the
    /// total row count once that is known.
    pub fn resolve(&self) -> Result<(u32, u32), AppError> {
        let page_size = self.page_size.unwrap_or(pagination::DEFAULT_PAGE_SIZE);
        if !pagination::is_valid_page_size(page_size) {
            return Err(AppError::BadRequest(format!(
                "page_size must be one of {:?}",
                pagination::PAGE_SIZE_OPTIONS
            )));
        }
        let page = self.page.unwrap_or(1).max(1);
        Ok((page, page_size))
    }
}
