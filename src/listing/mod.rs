//! List views: typed queries, paginated tables, row actions and the
//! submission feed.

pub mod confirm;
pub mod feed;
pub mod query;
pub mod sources;
pub mod table;

pub use confirm::{PendingAction, RowAction};
pub use feed::{FeedTicket, SubmissionFeed};
pub use query::{
    ListEvent, ListQuery, SortKey, SortOrder, StatusFilter, LeaderboardQuery, SubmissionQuery,
};
pub use sources::{
    contest_table, problem_table, role_table, tag_table, topic_table, ContestTable, ProblemTable,
    RoleTable, TagTable, TopicTable,
};
pub use table::{FetchTicket, ListSource, ManagedSource, TableController, TableView};
