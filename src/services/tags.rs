//! Tags endpoints

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::TagListQuery;
use crate::models::{Paginated, Tag, TagId, TagPayload};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TagsService: Send + Sync {
    async fn list(&self, query: &TagListQuery) -> ServiceResult<Paginated<Tag>>;

    async fn get(&self, id: TagId) -> ServiceResult<Tag>;

    async fn create(&self, payload: &TagPayload) -> ServiceResult<Tag>;

    async fn update(&self, id: TagId, payload: &TagPayload) -> ServiceResult<Tag>;

    /// Activate or deactivate a tag
    async fn set_active(&self, id: TagId, active: bool) -> ServiceResult<Tag>;

    async fn delete(&self, id: TagId) -> ServiceResult<()>;
}
