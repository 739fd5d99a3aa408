pub mod account;
pub mod student;
pub mod study_class;
pub mod teacher;

use domain_shared::pagination::PageRequest;

/// `LIMIT` and `OFFSET` bind values of a page request.
pub(crate) fn page_bounds(page: PageRequest) -> (i64, i64) {
    (page.limit() as i64, page.offset() as i64)
}
