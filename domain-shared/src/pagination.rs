pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Zero-based page coordinates of a paged read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Builds a request, clamping the size to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    pub fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self {
            content,
            total_elements,
            page: request.page,
            size: request.size,
        }
    }

    /// Slices an already ordered, complete result set.
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        Self::new(content, total_elements, request)
    }

    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.size as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < u64::from(self.total_pages())
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Converts every element, stopping at the first failure.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ordered_slices_requested_page() {
        let page = Page::from_ordered((1..=45).collect::<Vec<_>>(), PageRequest::new(2, 20));

        assert_eq!(page.content, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total_elements, 45);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn last_representable_page_has_no_next() {
        let page = Page::from_ordered(vec![1, 2, 3], PageRequest::new(u32::MAX, 20));

        assert!(page.content.is_empty());
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn try_map_keeps_page_metadata() {
        let page = Page::new(vec![1, 2], 42, PageRequest::new(1, 2));

        let mapped: Page<String> = page.try_map(|n| Ok::<_, ()>(n.to_string())).unwrap();

        assert_eq!(mapped.content, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.total_elements, 42);
        assert_eq!((mapped.page, mapped.size), (1, 2));
    }

    #[test]
    fn try_map_stops_at_first_failure() {
        let page = Page::new(vec![1, 2, 3], 3, PageRequest::default());

        let mapped = page.try_map(|n| if n == 2 { Err("two") } else { Ok(n) });

        assert_eq!(mapped, Err("two"));
    }

    #[test]
    fn request_size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 10_000).size, MAX_PAGE_SIZE);
    }

    #[test]
    fn empty_page_has_no_pages() {
        let page: Page<u8> = Page::from_ordered(vec![], PageRequest::default());

        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
    }
}
