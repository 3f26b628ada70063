use crate::data::post_repository::Pagination;

pub(crate) mod offers;
pub(crate) mod posts;

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 20;

/// Fills in defaults for client `limit`/`offset`; the offset is used as given.
pub(crate) fn resolve_pagination(limit: Option<u32>, offset: Option<u32>) -> Pagination {
    Pagination {
        limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        offset: offset.unwrap_or(0),
    }
}
