use serde::Serialize;
use utoipa::ToSchema;

/// Paged envelope returned by the list endpoints: the page content plus the
/// metadata a client needs to walk the collection.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(content: Vec<T>, page: i64, per_page: i64, total_elements: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total_elements + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            content,
            page,
            per_page,
            total_elements,
            total_pages,
        }
    }
}
