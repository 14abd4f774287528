//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
///
/// List endpoints return either a bare JSON array or an object with the
/// items under `items`/`docs`/`results` plus paging counters. Both shapes
/// deserialize into a `Page`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of pages given `total` and `limit`.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(self.limit as u64)
    }

    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    List(Vec<T>),
    Paged {
        #[serde(alias = "docs", alias = "results", alias = "data")]
        items: Vec<T>,
        #[serde(default = "first_page")]
        page: u32,
        #[serde(default, alias = "pageSize")]
        limit: u32,
        #[serde(default, alias = "totalDocs", alias = "count")]
        total: Option<u64>,
    },
}

const fn first_page() -> u32 {
    1
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageRepr::deserialize(deserializer)? {
            PageRepr::List(items) => {
                let len = items.len();
                Self {
                    items,
                    page: 1,
                    limit: u32::try_from(len).unwrap_or(u32::MAX),
                    total: len as u64,
                }
            }
            PageRepr::Paged {
                items,
                page,
                limit,
                total,
            } => {
                let total = total.unwrap_or(items.len() as u64);
                Self {
                    items,
                    page,
                    limit,
                    total,
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let page: Page<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn test_paged_object() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"docs": [1, 2], "page": 1, "limit": 2, "totalDocs": 5}"#)
                .unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_empty_array_has_single_page() {
        let page: Page<u32> = serde_json::from_str("[]").unwrap();
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }
}
