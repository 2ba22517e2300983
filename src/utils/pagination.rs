use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Listings are paged at a fixed size of 10.
pub const PER_PAGE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    offset: i64,
}

impl Page {
    pub fn from_query(query: &PageQuery) -> Result<Self, AppError> {
        let number = query.page.unwrap_or(1);
        // Computing the offset up front also rejects page numbers large
        // enough to overflow it.
        let offset = match number {
            n if n < 1 => None,
            n => n.checked_sub(1).and_then(|n| n.checked_mul(PER_PAGE)),
        }
        .ok_or_else(|| {
            AppError::ValidationError(format!("'{}' is not a valid page number", number))
        })?;
        Ok(Self { number, offset })
    }

    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Number of pages needed for `count` rows. An empty listing still has
    /// one (empty) page, matching the "zero results is not an error" rule.
    pub fn total_pages(count: i64) -> i64 {
        if count <= 0 {
            1
        } else {
            (count + PER_PAGE - 1) / PER_PAGE
        }
    }
}

/// Page metadata included alongside every listing payload.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub pages: i64,
    pub count: i64,
}

impl PageMeta {
    pub fn new(page: Page, count: i64) -> Self {
        Self {
            page: page.number,
            pages: Page::total_pages(count),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_is_one() {
        let page = Page::from_query(&PageQuery { page: None }).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_offset_advances_by_page_size() {
        let page = Page::from_query(&PageQuery { page: Some(3) }).unwrap();
        assert_eq!(page.offset(), 20);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_rejects_non_positive_pages() {
        assert!(Page::from_query(&PageQuery { page: Some(0) }).is_err());
        assert!(Page::from_query(&PageQuery { page: Some(-2) }).is_err());
    }

    #[test]
    fn test_rejects_pages_whose_offset_would_overflow() {
        assert!(Page::from_query(&PageQuery { page: Some(i64::MAX) }).is_err());
        assert!(Page::from_query(&PageQuery {
            page: Some(i64::MAX - 1),
        })
        .is_err());

        // A page whose offset still fits in i64 is accepted
        let page = Page::from_query(&PageQuery {
            page: Some(i64::MAX / PER_PAGE),
        })
        .unwrap();
        assert_eq!(page.offset(), (i64::MAX / PER_PAGE - 1) * PER_PAGE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Page::total_pages(0), 1);
        assert_eq!(Page::total_pages(1), 1);
        assert_eq!(Page::total_pages(10), 1);
        assert_eq!(Page::total_pages(11), 2);
        assert_eq!(Page::total_pages(25), 3);
    }

    #[test]
    fn test_page_meta_for_empty_listing() {
        let page = Page::from_query(&PageQuery { page: Some(1) }).unwrap();
        let meta = PageMeta::new(page, 0);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.pages, 1);
        assert_eq!(meta.count, 0);
    }
}
