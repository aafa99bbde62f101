//! Forgiving page-number pagination.
//!
//! A missing or unparseable `page` is page 1, and a page past the end is the last page,
//! so a stale link never produces an error.

use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::Serialize;

/// Listing pages hold this many rows.
pub const PER_PAGE: u64 = 12;

/// Parse a raw `page` query value. Anything that is not a positive integer is page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// Number of pages for `total` rows. An empty result still has one (empty) page.
#[must_use]
pub const fn num_pages(total: u64, per_page: u64) -> u64 {
    if total == 0 || per_page == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// Clamp a requested 1-based page into `1..=num_pages`.
#[must_use]
pub fn clamp_page(requested: u64, pages: u64) -> u64 {
    requested.clamp(1, pages.max(1))
}

/// One page of results plus the navigation metadata clients need.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(data: Vec<T>, page: u64, num_pages: u64, total: u64, per_page: u64) -> Self {
        Self {
            data,
            page,
            num_pages,
            total,
            per_page,
            has_next: page < num_pages,
            has_previous: page > 1,
        }
    }
}

/// Run `query` and return the requested page, clamped to the pages that exist.
///
/// # Errors
///
/// Returns a database error if counting or fetching fails.
pub async fn paginate<C, E>(
    db: &C,
    query: Select<E>,
    raw_page: Option<&str>,
) -> Result<Page<E::Model>, sea_orm::DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync + 'static,
{
    let paginator = query.paginate(db, PER_PAGE);
    let total = paginator.num_items().await?;
    let pages = num_pages(total, PER_PAGE);
    let page = clamp_page(parse_page(raw_page), pages);
    let data = paginator.fetch_page(page - 1).await?;
    Ok(Page::new(data, page, pages, total, PER_PAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_is_forgiving() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some(" 4 ")), 4);
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, PER_PAGE), 1);
        assert_eq!(num_pages(12, PER_PAGE), 1);
        assert_eq!(num_pages(13, PER_PAGE), 2);
        assert_eq!(num_pages(25, PER_PAGE), 3);
    }

    #[test]
    fn test_page_past_end_is_last_page() {
        assert_eq!(clamp_page(99, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_navigation_flags() {
        let first: Page<u8> = Page::new(vec![1], 1, 2, 13, PER_PAGE);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last: Page<u8> = Page::new(vec![2], 2, 2, 13, PER_PAGE);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }
}
