//! Domain models and operation parameter types.
//!
//! Repositories convert SeaORM entity models into these types at the data boundary,
//! parsing stored status strings into enums. Services work exclusively with these
//! types, and controllers convert them into DTOs from `crate::model`.

pub mod audit;
pub mod club;
pub mod course;
pub mod follow;
pub mod invitation;
pub mod job;
pub mod notification;
pub mod organization;
pub mod post;
pub mod research;
pub mod user;

use crate::model::api::{CursorPageDto, CursorParams, PaginatedDto, PaginationParams};

const MAX_ENTRIES: u64 = 100;
const DEFAULT_CURSOR_LIMIT: u64 = 20;
const MAX_CURSOR_LIMIT: u64 = 50;

/// Normalized offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page,
            per_page: per_page.clamp(1, MAX_ENTRIES),
        }
    }
}

impl From<PaginationParams> for PageRequest {
    fn from(params: PaginationParams) -> Self {
        Self::new(params.page, params.entries)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PaginationParams::default().into()
    }
}

/// Normalized cursor pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequest {
    pub before: Option<i32>,
    pub limit: u64,
}

impl From<CursorParams> for CursorRequest {
    fn from(params: CursorParams) -> Self {
        Self {
            before: params.before,
            limit: params
                .limit
                .unwrap_or(DEFAULT_CURSOR_LIMIT)
                .clamp(1, MAX_CURSOR_LIMIT),
        }
    }
}

/// A page of items with totals for navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }

    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<Paginated<U>, E> {
        Ok(Paginated {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        })
    }

    /// Keeps the totals of this page around a different set of items.
    ///
    /// Used when rows are joined with other records after fetching and some drop out.
    pub fn with_items<U>(&self, items: Vec<U>) -> Paginated<U> {
        Paginated {
            items,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }

    pub fn into_dto<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedDto<U> {
        let page = self.map(f);
        PaginatedDto {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}

/// A slice of a newest-first stream with the cursor for the next slice.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<i32>,
}

impl<T> CursorPage<T> {
    pub fn into_dto<U, F: FnMut(T) -> U>(self, f: F) -> CursorPageDto<U> {
        CursorPageDto {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_entries() {
        assert_eq!(PageRequest::new(0, 0).per_page, 1);
        assert_eq!(PageRequest::new(0, 500).per_page, 100);
        assert_eq!(PageRequest::default().per_page, 10);
    }

    #[test]
    fn clamps_cursor_limit() {
        let request = CursorRequest::from(CursorParams {
            before: Some(9),
            limit: Some(80),
        });
        assert_eq!(request.limit, 50);
        assert_eq!(CursorRequest::from(CursorParams::default()).limit, 20);
    }
}
