//! Topics endpoints

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::TopicListQuery;
use crate::models::{Paginated, Topic, TopicId, TopicPayload};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TopicsService: Send + Sync {
    async fn list(&self, query: &TopicListQuery) -> ServiceResult<Paginated<Topic>>;

    async fn get(&self, id: TopicId) -> ServiceResult<Topic>;

    async fn create(&self, payload: &TopicPayload) -> ServiceResult<Topic>;

    async fn update(&self, id: TopicId, payload: &TopicPayload) -> ServiceResult<Topic>;

    /// Activate or deactivate a topic
    async fn set_active(&self, id: TopicId, active: bool) -> ServiceResult<Topic>;

    async fn delete(&self, id: TopicId) -> ServiceResult<()>;
}
