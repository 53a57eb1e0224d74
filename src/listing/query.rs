//! Typed list queries.
//!
//! Each table has its own sort-key enum so that an unknown column cannot be
//! requested; status filters share [`StatusFilter`].

use std::fmt::Debug;

use serde::Serialize;

use crate::constants::{DEFAULT_LEADERBOARD_PAGE_SIZE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::{ContestId, ProblemId, UserId};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active/inactive filter used by Tags and Topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// Value of the `isActive` query parameter, if any
    pub fn is_active(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }
}

/// Marker for per-table sort columns
pub trait SortKey: Copy + Eq + Default + Debug + Serialize + Send + Sync + 'static {}

/// Tag table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TagSortBy {
    Name,
    PostCount,
    #[default]
    CreatedAt,
    UpdatedAt,
}

/// Topic table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TopicSortBy {
    Name,
    PostCount,
    #[default]
    CreatedAt,
    UpdatedAt,
}

/// Role table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleSortBy {
    Name,
    #[default]
    Priority,
}

/// Problem table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProblemSortBy {
    Title,
    Difficulty,
    #[default]
    CreatedAt,
}

/// Contest table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContestSortBy {
    Title,
    #[default]
    StartTime,
}

impl SortKey for TagSortBy {}
impl SortKey for TopicSortBy {}
impl SortKey for RoleSortBy {}
impl SortKey for ProblemSortBy {}
impl SortKey for ContestSortBy {}

/// Page-number based list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<S: SortKey> {
    pub page: u32,
    pub limit: u32,
    pub sort_by: S,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
    #[serde(rename = "isActive", skip_serializing_if = "Option::is_none")]
    status: Option<bool>,
    #[serde(skip)]
    pub status_filter: StatusFilter,
}

pub type TagListQuery = ListQuery<TagSortBy>;
pub type TopicListQuery = ListQuery<TopicSortBy>;
pub type RoleListQuery = ListQuery<RoleSortBy>;
pub type ProblemListQuery = ListQuery<ProblemSortBy>;
pub type ContestListQuery = ListQuery<ContestSortBy>;

/// Change emitted by a table header, pager, search box or filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent<S: SortKey> {
    Page(u32),
    Sort(S),
    Keyword(String),
    Status(StatusFilter),
}

impl<S: SortKey> Default for ListQuery<S> {
    fn default() -> Self {
        Self::with_limit(DEFAULT_PAGE_SIZE)
    }
}

impl<S: SortKey> ListQuery<S> {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            sort_by: S::default(),
            sort_order: SortOrder::default(),
            keyword: String::new(),
            status: None,
            status_filter: StatusFilter::All,
        }
    }

    /// Apply a UI event. Returns whether the query changed and needs a refetch.
    ///
    /// Anything other than a page change sends the table back to page 1.
    pub fn apply(&mut self, event: ListEvent<S>) -> bool {
        let before = self.clone();
        match event {
            ListEvent::Page(page) => {
                self.page = page.max(1);
            }
            ListEvent::Sort(column) => {
                if column == self.sort_by {
                    self.sort_order = self.sort_order.toggled();
                } else {
                    self.sort_by = column;
                    self.sort_order = SortOrder::Asc;
                }
                self.page = 1;
            }
            ListEvent::Keyword(keyword) => {
                let keyword = keyword.trim().to_string();
                if keyword != self.keyword {
                    self.keyword = keyword;
                    self.page = 1;
                }
            }
            ListEvent::Status(filter) => {
                if filter != self.status_filter {
                    self.status_filter = filter;
                    self.status = filter.is_active();
                    self.page = 1;
                }
            }
        }
        *self != before
    }
}

/// Leaderboard page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LEADERBOARD_PAGE_SIZE,
            keyword: String::new(),
        }
    }
}

/// Offset-based submission history request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    pub contest_id: ContestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<ProblemId>,
    pub offset: u64,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_same_column_toggles_order() {
        let mut query = TagListQuery::default();
        assert!(query.apply(ListEvent::Sort(TagSortBy::Name)));
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert!(query.apply(ListEvent::Sort(TagSortBy::Name)));
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_filters_reset_page() {
        let mut query = TopicListQuery::default();
        query.apply(ListEvent::Page(4));
        assert_eq!(query.page, 4);

        assert!(query.apply(ListEvent::Keyword("graph".to_string())));
        assert_eq!(query.page, 1);

        query.apply(ListEvent::Page(3));
        assert!(query.apply(ListEvent::Status(StatusFilter::Inactive)));
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_identical_keyword_is_noop() {
        let mut query = RoleListQuery::default();
        query.apply(ListEvent::Keyword("admin".to_string()));
        assert!(!query.apply(ListEvent::Keyword(" admin ".to_string())));
    }

    #[test]
    fn test_query_serialization() {
        let mut query = TagListQuery::default();
        query.apply(ListEvent::Status(StatusFilter::Active));
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["sortBy"], "createdAt");
        assert!(json.get("keyword").is_none());
        assert!(json.get("statusFilter").is_none());
    }
}
