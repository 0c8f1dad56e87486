//! Pagination request shared by all list-style operations.

use serde::{Deserialize, Serialize};

/// Zero-based page window.
///
/// Absent parameters at the HTTP boundary mean "everything": a window
/// applies only when both `page` and `size` were supplied, otherwise the
/// request collapses to [`PageRequest::all`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// The whole collection in one page.
    pub fn all() -> Self {
        Self {
            page: 0,
            size: usize::MAX,
        }
    }

    /// Collapse optional query parameters. Only a fully specified pair
    /// produces a window.
    pub fn from_params(page: Option<usize>, size: Option<usize>) -> Self {
        match (page, size) {
            (Some(page), Some(size)) => Self { page, size },
            _ => Self::all(),
        }
    }

    /// Window a fully materialized collection, preserving its order.
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let start = self.page.saturating_mul(self.size);
        items.into_iter().skip(start).take(self.size).collect()
    }

    /// OFFSET/LIMIT pair for SQL backends.
    pub fn offset_limit(&self) -> (i64, i64) {
        let offset = self.page.saturating_mul(self.size).min(i64::MAX as usize) as i64;
        let limit = self.size.min(i64::MAX as usize) as i64;
        (offset, limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_params_mean_everything() {
        assert_eq!(PageRequest::from_params(None, None), PageRequest::all());
        assert_eq!(PageRequest::from_params(Some(2), None), PageRequest::all());
        assert_eq!(PageRequest::from_params(None, Some(5)), PageRequest::all());
        assert_eq!(
            PageRequest::from_params(Some(2), Some(5)),
            PageRequest::new(2, 5)
        );
    }

    #[test]
    fn windows_in_order() {
        let page = PageRequest::new(1, 3);
        assert_eq!(page.window((0..8).collect::<Vec<_>>()), vec![3, 4, 5]);
    }

    #[test]
    fn window_past_the_end_is_empty() {
        let page = PageRequest::new(9, 10);
        assert!(page.window((0..8).collect::<Vec<_>>()).is_empty());
    }

    #[test]
    fn all_keeps_everything() {
        let items: Vec<_> = (0..100).collect();
        assert_eq!(PageRequest::all().window(items.clone()), items);
    }

    proptest! {
        #[test]
        fn window_never_exceeds_size(len in 0usize..200, page in 0usize..50, size in 0usize..50) {
            let request = PageRequest::new(page, size);
            let out = request.window((0..len).collect::<Vec<_>>());
            prop_assert!(out.len() <= size);
            for pair in out.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
