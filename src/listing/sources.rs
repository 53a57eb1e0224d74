//! Table sources for each managed entity.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AdminError, AdminResult, ServiceResult};
use crate::forms::role::ensure_mutable;
use crate::listing::confirm::RowAction;
use crate::listing::query::{
    ContestListQuery, ContestSortBy, ProblemListQuery, ProblemSortBy, RoleListQuery, RoleSortBy,
    TagListQuery, TagSortBy, TopicListQuery, TopicSortBy,
};
use crate::listing::table::{ListSource, ManagedSource, TableController};
use crate::models::{Contest, Paginated, Problem, Role, Tag, Topic};
use crate::services::{ContestsService, ProblemsService, RolesService, TagsService, TopicsService};
use crate::state::AdminState;

pub type TagTable = TableController<dyn TagsService>;
pub type TopicTable = TableController<dyn TopicsService>;
pub type RoleTable = TableController<dyn RolesService>;
pub type ProblemTable = TableController<dyn ProblemsService>;
pub type ContestTable = TableController<dyn ContestsService>;

fn delete_only(entity: &str, action: RowAction) -> AdminResult<()> {
    match action {
        RowAction::Delete => Ok(()),
        _ => Err(AdminError::Forbidden(format!(
            "{entity}s cannot be activated or deactivated"
        ))),
    }
}

#[async_trait]
impl ListSource for dyn TagsService {
    type Item = Tag;
    type Sort = TagSortBy;

    async fn fetch(&self, query: &TagListQuery) -> ServiceResult<Paginated<Tag>> {
        self.list(query).await
    }
}

#[async_trait]
impl ManagedSource for dyn TagsService {
    const ENTITY: &'static str = "Tag";

    fn id_of(item: &Tag) -> Uuid {
        item.id
    }

    fn label_of(item: &Tag) -> String {
        item.name.clone()
    }

    async fn perform(&self, id: Uuid, action: RowAction) -> ServiceResult<()> {
        match action {
            RowAction::Activate => self.set_active(id, true).await.map(|_| ()),
            RowAction::Deactivate => self.set_active(id, false).await.map(|_| ()),
            RowAction::Delete => self.delete(id).await,
        }
    }
}

#[async_trait]
impl ListSource for dyn TopicsService {
    type Item = Topic;
    type Sort = TopicSortBy;

    async fn fetch(&self, query: &TopicListQuery) -> ServiceResult<Paginated<Topic>> {
        self.list(query).await
    }
}

#[async_trait]
impl ManagedSource for dyn TopicsService {
    const ENTITY: &'static str = "Topic";

    fn id_of(item: &Topic) -> Uuid {
        item.id
    }

    fn label_of(item: &Topic) -> String {
        item.name.clone()
    }

    async fn perform(&self, id: Uuid, action: RowAction) -> ServiceResult<()> {
        match action {
            RowAction::Activate => self.set_active(id, true).await.map(|_| ()),
            RowAction::Deactivate => self.set_active(id, false).await.map(|_| ()),
            RowAction::Delete => self.delete(id).await,
        }
    }
}

#[async_trait]
impl ListSource for dyn RolesService {
    type Item = Role;
    type Sort = RoleSortBy;

    async fn fetch(&self, query: &RoleListQuery) -> ServiceResult<Paginated<Role>> {
        self.list(query).await
    }
}

#[async_trait]
impl ManagedSource for dyn RolesService {
    const ENTITY: &'static str = "Role";

    fn id_of(item: &Role) -> Uuid {
        item.id
    }

    fn label_of(item: &Role) -> String {
        item.name.clone()
    }

    fn guard(item: &Role, action: RowAction) -> AdminResult<()> {
        ensure_mutable(item)?;
        delete_only(Self::ENTITY, action)
    }

    async fn perform(&self, id: Uuid, _action: RowAction) -> ServiceResult<()> {
        self.delete(id).await
    }
}

#[async_trait]
impl ListSource for dyn ProblemsService {
    type Item = Problem;
    type Sort = ProblemSortBy;

    async fn fetch(&self, query: &ProblemListQuery) -> ServiceResult<Paginated<Problem>> {
        self.list(query).await
    }
}

#[async_trait]
impl ManagedSource for dyn ProblemsService {
    const ENTITY: &'static str = "Problem";

    fn id_of(item: &Problem) -> Uuid {
        item.id
    }

    fn label_of(item: &Problem) -> String {
        item.title.clone()
    }

    fn guard(_item: &Problem, action: RowAction) -> AdminResult<()> {
        delete_only(Self::ENTITY, action)
    }

    async fn perform(&self, id: Uuid, _action: RowAction) -> ServiceResult<()> {
        self.delete(id).await
    }
}

#[async_trait]
impl ListSource for dyn ContestsService {
    type Item = Contest;
    type Sort = ContestSortBy;

    async fn fetch(&self, query: &ContestListQuery) -> ServiceResult<Paginated<Contest>> {
        self.list(query).await
    }
}

#[async_trait]
impl ManagedSource for dyn ContestsService {
    const ENTITY: &'static str = "Contest";

    fn id_of(item: &Contest) -> Uuid {
        item.id
    }

    fn label_of(item: &Contest) -> String {
        item.title.clone()
    }

    fn guard(item: &Contest, action: RowAction) -> AdminResult<()> {
        delete_only(Self::ENTITY, action)?;
        if item.status.is_live() {
            return Err(AdminError::Forbidden(
                "A running contest cannot be deleted".to_string(),
            ));
        }
        Ok(())
    }

    async fn perform(&self, id: Uuid, _action: RowAction) -> ServiceResult<()> {
        self.delete(id).await
    }
}

pub fn tag_table(state: &AdminState) -> TagTable {
    TableController::new(state.tags(), state.notifier(), state.config().listing.page_size)
}

pub fn topic_table(state: &AdminState) -> TopicTable {
    TableController::new(state.topics(), state.notifier(), state.config().listing.page_size)
}

pub fn role_table(state: &AdminState) -> RoleTable {
    TableController::new(state.roles(), state.notifier(), state.config().listing.page_size)
}

pub fn problem_table(state: &AdminState) -> ProblemTable {
    TableController::new(state.problems(), state.notifier(), state.config().listing.page_size)
}

pub fn contest_table(state: &AdminState) -> ContestTable {
    TableController::new(state.contests(), state.notifier(), state.config().listing.page_size)
}
