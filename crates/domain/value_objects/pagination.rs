use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_LIMIT;

/// `?page=&limit=&search=` as accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    /// Capped so the row offset always fits in an `i64`.
    pub fn page(&self) -> i64 {
        self.page
            .filter(|page| *page >= 1)
            .unwrap_or(1)
            .min(MAX_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .filter(|limit| *limit >= 1)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
    }

    /// Builds a repository filter. `owner_id` restricts rows to one client; `None` lists all.
    pub fn to_filter(&self, owner_id: Option<Uuid>) -> ListFilter {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_string);

        ListFilter {
            owner_id,
            search,
            limit: self.limit(),
            offset: (self.page() - 1).saturating_mul(self.limit()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub owner_id: Option<Uuid>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl ListFilter {
    /// `%term%` for case-insensitive matching, with LIKE wildcards escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|search| {
            let escaped = search
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, query: &PageQuery) -> Self {
        Self {
            data,
            total,
            page: query.page(),
            limit: query.limit(),
        }
    }
}
