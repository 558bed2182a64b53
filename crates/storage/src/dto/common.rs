use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    24
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageQuery {
    pub fn ensure_valid(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(query: &PageQuery, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            ((total_items - 1) / i64::from(query.per_page) + 1) as u32
        };
        Self {
            page: query.page,
            per_page: query.per_page,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total_items: i64) -> Self {
        Self {
            items,
            meta: PageMeta::new(query, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let query = PageQuery {
            page: 3,
            per_page: 24,
        };
        assert_eq!(query.offset(), 48);
        assert_eq!(query.limit(), 24);
    }

    #[test]
    fn test_page_bounds() {
        assert!(
            PageQuery {
                page: 0,
                per_page: 10
            }
            .ensure_valid()
            .is_err()
        );
        assert!(
            PageQuery {
                page: 1,
                per_page: 101
            }
            .ensure_valid()
            .is_err()
        );
        assert!(PageQuery::default().ensure_valid().is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let query = PageQuery {
            page: 1,
            per_page: 10,
        };
        assert_eq!(PageMeta::new(&query, 0).total_pages, 0);
        assert_eq!(PageMeta::new(&query, 10).total_pages, 1);
        assert_eq!(PageMeta::new(&query, 11).total_pages, 2);
    }
}
