use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
pub const SEARCH_TITLE_PARAM: &str = "searchTitle";

/// Parameters of a single top-stories request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryQuery {
    pub page: u32,
    pub page_size: u32,
    pub search_title: String,
}

impl Default for StoryQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search_title: String::new(),
        }
    }
}

impl StoryQuery {
    pub fn new(page: u32, page_size: u32, search_title: impl Into<String>) -> Self {
        Self {
            page,
            page_size,
            search_title: search_title.into(),
        }
    }

    /// Query-string pairs in request order. `searchTitle` is only present for
    /// a non-empty search.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (PAGE_PARAM, self.page.to_string()),
            (PAGE_SIZE_PARAM, self.page_size.to_string()),
        ];
        if !self.search_title.is_empty() {
            pairs.push((SEARCH_TITLE_PARAM, self.search_title.clone()));
        }
        pairs
    }
}
