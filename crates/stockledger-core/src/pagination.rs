//! # Pagination
//!
//! Offset pages over an ordered list. Pages are 1-based; a page past the end
//! (or page 0) is an empty slice, never an error.
//!
//! ```text
//! 25 items, page_size 10
//!
//!   page 1 → items  1–10
//!   page 2 → items 11–20
//!   page 3 → items 21–25
//!   page 4 → []            total_pages = 3
//! ```

use serde::{Deserialize, Serialize};

use crate::validation::{validate_page_size, ValidationResult};

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Maps the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Number of pages needed for `count` items: `ceil(count / page_size)`.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Slices `items` to `[(page-1)*page_size, page*page_size)`.
///
/// ## Errors
/// Only an invalid `page_size` (0 or above the maximum) is rejected.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> ValidationResult<Page<T>> {
    validate_page_size(page_size)?;

    let total_items = items.len() as u64;
    let total_pages = total_pages(total_items, page_size);

    let items = match page.checked_sub(1) {
        Some(index) => {
            let start = (index as usize).saturating_mul(page_size as usize);
            items.into_iter().skip(start).take(page_size as usize).collect()
        }
        None => Vec::new(),
    };

    Ok(Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_middle_page() {
        let page = paginate(catalog(25), 2, 10).unwrap();
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate(catalog(25), 3, 10).unwrap();
        assert_eq!(page.items, (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        assert!(paginate(catalog(25), 4, 10).unwrap().items.is_empty());
        assert!(paginate(catalog(25), 0, 10).unwrap().items.is_empty());
        assert!(paginate(catalog(25), u32::MAX, 10).unwrap().items.is_empty());
    }

    #[test]
    fn test_empty_listing() {
        let page = paginate(Vec::<u32>::new(), 1, 10).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_invalid_page_size() {
        assert!(paginate(catalog(5), 1, 0).is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = paginate(catalog(25), 2, 10).unwrap().map(|n| n * 2);
        assert_eq!(page.items.first(), Some(&22));
        assert_eq!(page.total_pages, 3);
    }
}
