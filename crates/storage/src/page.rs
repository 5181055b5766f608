use serde::{Deserialize, Serialize};

/// Title search plus 1-based pagination for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: 5,
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            search: None,
            page,
            limit,
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// Case-insensitive substring match on a title. No search matches everything.
    #[must_use]
    pub fn matches_title(&self, title: &str) -> bool {
        match &self.search {
            Some(needle) => title
                .to_lowercase()
                .contains(needle.trim().to_lowercase().as_str()),
            None => true,
        }
    }

    /// Number of items skipped before this page; page 0 is treated as page 1.
    #[must_use]
    pub fn offset(&self) -> usize {
        let page = usize::try_from(self.page.max(1)).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        (page - 1).saturating_mul(limit)
    }

    /// Slices an already filtered and ordered list into a page.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let items = items.into_iter().skip(self.offset()).take(limit).collect();
        Page {
            items,
            page: self.page.max(1),
            limit: self.limit,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        let page = usize::try_from(self.page).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        page.saturating_mul(limit) < self.total
    }
}
