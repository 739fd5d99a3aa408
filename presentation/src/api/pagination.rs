use axum::http::{HeaderMap, HeaderName, HeaderValue};
use domain_shared::pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use url::form_urlencoded;

pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

/// `X-Total-Count` and RFC 5988 `Link` headers for a page served at `path`.
/// `filters` are repeated in every link next to `page` and `size`.
pub fn page_headers<T>(path: &str, filters: &[(&str, &str)], page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(page.total_elements));

    let last_page = page.total_pages().saturating_sub(1);
    let mut links = Vec::with_capacity(4);
    if let Some(next) = page.page.checked_add(1).filter(|_| page.has_next()) {
        links.push(link(path, filters, next, page.size, "next"));
    }
    if page.has_previous() {
        links.push(link(path, filters, page.page - 1, page.size, "prev"));
    }
    links.push(link(path, filters, last_page, page.size, "last"));
    links.push(link(path, filters, 0, page.size, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(axum::http::header::LINK, value);
    }

    headers
}

fn link(path: &str, filters: &[(&str, &str)], page: u32, size: u32, rel: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in filters {
        query.append_pair(name, value);
    }
    query.append_pair("page", &page.to_string());
    query.append_pair("size", &size.to_string());

    format!("<{}?{}>; rel=\"{}\"", path, query.finish(), rel)
}
