use serde::Serialize;
use utoipa::ToSchema;

use crate::query::Page;

/// Paginated response envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T, U> From<Page<U>> for PageResponse<T>
where
    T: From<U>,
{
    fn from(page: Page<U>) -> Self {
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();
        let page = page.map(T::from);

        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
            first,
            last,
        }
    }
}
