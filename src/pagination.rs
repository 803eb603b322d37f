//! Pagination over ordered collections

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaginationError {
    #[error("per_page must be at least 1")]
    ZeroPerPage,
}

/// The `page`-th slice of `items` when split into pages of `per_page`.
///
/// Pages are 1-based. Pages outside `1..=total_pages` are allowed and
/// simply hold no items.
#[derive(Debug, Clone, Copy)]
pub struct Pagination<'a, T> {
    items: &'a [T],
    page: usize,
    per_page: usize,
}

impl<'a, T> Pagination<'a, T> {
    pub fn new(items: &'a [T], page: usize, per_page: usize) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPerPage);
        }
        Ok(Self {
            items,
            page,
            per_page,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of items across all pages
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of available pages
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn prev_page(&self) -> Option<usize> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.has_next().then(|| self.page + 1)
    }

    /// Items on the current page
    pub fn items(&self) -> &'a [T] {
        let Some(index) = self.page.checked_sub(1) else {
            return &[];
        };
        let start = index.saturating_mul(self.per_page).min(self.items.len());
        let end = start.saturating_add(self.per_page).min(self.items.len());
        &self.items[start..end]
    }
}

/// Template-facing view of a [`Pagination`]
#[derive(Debug, Serialize)]
pub struct PaginationData<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl<'a, T> From<Pagination<'a, T>> for PaginationData<'a, T> {
    fn from(p: Pagination<'a, T>) -> Self {
        Self {
            items: p.items(),
            page: p.page,
            per_page: p.per_page,
            total_pages: p.total_pages(),
            has_prev: p.has_prev(),
            has_next: p.has_next(),
            prev: p.prev_page(),
            next: p.next_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

    #[test]
    fn test_first_page() {
        let p = Pagination::new(&TEN, 1, 4).unwrap();
        assert_eq!(p.items(), &[1, 2, 3, 4]);
        assert!(!p.has_prev());
        assert!(p.has_next());
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.next_page(), Some(2));
        assert_eq!(p.prev_page(), None);
    }

    #[test]
    fn test_last_page_is_partial() {
        let p = Pagination::new(&TEN, 3, 4).unwrap();
        assert_eq!(p.items(), &[9, 10]);
        assert!(p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn test_page_past_the_end() {
        let p = Pagination::new(&TEN, 4, 4).unwrap();
        assert!(p.items().is_empty());
        assert!(p.has_prev());
        assert!(!p.has_next());

        let p = Pagination::new(&TEN, usize::MAX, 4).unwrap();
        assert!(p.items().is_empty());
    }

    #[test]
    fn test_page_zero() {
        let p = Pagination::new(&TEN, 0, 4).unwrap();
        assert!(p.items().is_empty());
        assert!(!p.has_prev());
        assert!(p.has_next());
    }

    #[test]
    fn test_exact_fit() {
        let p = Pagination::new(&TEN, 2, 5).unwrap();
        assert_eq!(p.total_pages(), 2);
        assert_eq!(p.items(), &[6, 7, 8, 9, 10]);
        assert!(!p.has_next());
    }

    #[test]
    fn test_empty_sequence() {
        let empty: [u32; 0] = [];
        let p = Pagination::new(&empty, 1, 10).unwrap();
        assert_eq!(p.total_pages(), 0);
        assert!(p.items().is_empty());
        assert!(!p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn test_zero_per_page_rejected() {
        assert_eq!(
            Pagination::new(&TEN, 1, 0).unwrap_err(),
            PaginationError::ZeroPerPage
        );
    }

    #[test]
    fn test_data_view() {
        let p = Pagination::new(&TEN, 2, 4).unwrap();
        let json = serde_json::to_value(PaginationData::from(p)).unwrap();
        assert_eq!(json["items"], serde_json::json!([5, 6, 7, 8]));
        assert_eq!(json["prev"], 1);
        assert_eq!(json["next"], 3);
        assert_eq!(json["total_pages"], 3);
    }
}
