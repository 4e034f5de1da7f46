use derive_more::Display;
use serde::{Deserialize, Serialize};
use siftql_core::predicate::FilterNode;
use std::collections::BTreeSet;

///
/// Direction
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[display("ASC")]
    Asc,
    #[display("DESC")]
    Desc,
}

///
/// SortOrder
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortOrder {
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortOrder {
    #[must_use]
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

///
/// Pagination
///
/// Zero-based page number and page size. Carried through compilation
/// unchanged; applying it is the backend's job.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    pub const DEFAULT_SIZE: u32 = 20;

    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Rows to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }
}

///
/// SearchOptions
///
/// Everything one search request carries: an optional keyword, the
/// associations the keyword may cross, an optional parsed filter, sort
/// orders and paging.
///

#[derive(Clone, Debug, Default)]
pub struct SearchOptions {
    pub keyword: Option<String>,
    pub propagate: BTreeSet<String>,
    pub filter: Option<FilterNode>,
    pub sort: Vec<SortOrder>,
    pub pagination: Option<Pagination>,
}

impl SearchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Allow the keyword to cross the named root association.
    #[must_use]
    pub fn propagate(mut self, association: impl Into<String>) -> Self {
        self.propagate.insert(association.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn sort(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(SortOrder::new(property, direction));
        self
    }

    #[must_use]
    pub fn asc(self, property: impl Into<String>) -> Self {
        self.sort(property, Direction::Asc)
    }

    #[must_use]
    pub fn desc(self, property: impl Into<String>) -> Self {
        self.sort(property, Direction::Desc)
    }

    #[must_use]
    pub const fn page(mut self, page: u32, size: u32) -> Self {
        self.pagination = Some(Pagination::new(page, size));
        self
    }
}
