//! Cursor-based pagination
//!
//! A page holds its items, the page-info flags and a bound continuation
//! capturing the original query shape. Both directions physically re-execute
//! the full query; there is no client-side page cache.

use crate::entity::{EntityRef, GraphqlEntity};
use crate::error::OrmResult;

type FetchPage<T> = Box<dyn Fn(Option<String>, Vec<String>) -> OrmResult<PaginatedResult<T>>>;

pub struct PaginatedResult<T: GraphqlEntity> {
    pub items: Vec<EntityRef<T>>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub end_cursor: Option<String>,
    cursor_stack: Vec<String>,
    fetch_page: FetchPage<T>,
}

impl<T: GraphqlEntity> PaginatedResult<T> {
    pub(crate) fn new(
        items: Vec<EntityRef<T>>,
        has_next_page: bool,
        has_previous_page: bool,
        end_cursor: Option<String>,
        cursor_stack: Vec<String>,
        fetch_page: FetchPage<T>,
    ) -> Self {
        Self {
            items,
            has_next_page,
            has_previous_page,
            end_cursor,
            cursor_stack,
            fetch_page,
        }
    }

    /// Fetch the next page, or `None` at the boundary. The current end
    /// cursor is pushed onto the stack so `previous` can find the way back.
    pub fn next(&self) -> OrmResult<Option<Self>> {
        if !self.has_next_page {
            return Ok(None);
        }

        let mut stack = self.cursor_stack.clone();
        stack.push(self.end_cursor.clone().unwrap_or_default());

        (self.fetch_page)(self.end_cursor.clone(), stack).map(Some)
    }

    /// Re-fetch the previous page, or `None` on the first page. Popping the
    /// stack leaves the cursor that produced the previous page on top; an
    /// empty stack means "first page", queried without a cursor.
    pub fn previous(&self) -> OrmResult<Option<Self>> {
        if !self.has_previous_page {
            return Ok(None);
        }

        let mut stack = self.cursor_stack.clone();
        stack.pop();
        let cursor = stack.last().cloned();

        (self.fetch_page)(cursor, stack).map(Some)
    }
}

impl<T: GraphqlEntity> std::fmt::Debug for PaginatedResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedResult")
            .field("items", &self.items.len())
            .field("has_next_page", &self.has_next_page)
            .field("has_previous_page", &self.has_previous_page)
            .field("end_cursor", &self.end_cursor)
            .finish_non_exhaustive()
    }
}
