//! Pagination shared by the registry adapters.
//!
//! The REST API pages by number and signals the end with a short page, the
//! GraphQL API hands back a continuation cursor. Both are expressed as a
//! [`PagedFetch`] and drained with [`collect_pages`].

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::RegistryError;

/// One page of results and the request for the page after it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub next: Option<C>,
}

/// Number-based paging: fixed-size pages, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub page: u32,
    pub per_page: u32,
}

impl Offset {
    pub fn first(per_page: u32) -> Self {
        Offset {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// A page shorter than `per_page` is the last one.
    pub fn next_after(self, received: usize) -> Option<Self> {
        if received < self.per_page as usize {
            None
        } else {
            Some(Offset {
                page: self.page + 1,
                ..self
            })
        }
    }
}

/// Cursor-based paging. `after` is `None` for the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub after: Option<String>,
    pub first: u32,
}

impl Cursor {
    pub fn start(first: u32) -> Self {
        Cursor {
            after: None,
            first: first.max(1),
        }
    }

    pub fn next_after(&self, has_next_page: bool, end_cursor: Option<String>) -> Option<Self> {
        match (has_next_page, end_cursor) {
            (true, Some(after)) => Some(Cursor {
                after: Some(after),
                first: self.first,
            }),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PagedFetch: Sync {
    type Item: Send;
    type Cursor: Debug + Clone + PartialEq + Send + Sync;

    fn first_page(&self) -> Self::Cursor;

    async fn fetch_page(
        &self,
        cursor: &Self::Cursor,
    ) -> Result<Page<Self::Item, Self::Cursor>, RegistryError>;
}

/// Fetch every page, in order, until the registry reports no further pages.
pub async fn collect_pages<F: PagedFetch>(fetch: &F) -> Result<Vec<F::Item>, RegistryError> {
    let mut items = Vec::new();
    let mut cursor = Some(fetch.first_page());

    while let Some(current) = cursor {
        let page = fetch.fetch_page(&current).await?;
        tracing::debug!("Fetched {} items for page {:?}", page.items.len(), current);
        items.extend(page.items);

        cursor = match page.next {
            Some(next) if next == current => {
                tracing::warn!("Registry returned the same page {:?} twice, stopping", next);
                None
            }
            next => next,
        };
    }

    Ok(items)
}
