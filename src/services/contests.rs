//! Contests endpoints, including contest statistics

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::{ContestListQuery, LeaderboardQuery};
use crate::models::{
    Contest, ContestId, ContestPayload, LeaderboardEntry, Paginated, ParticipantDetail, UserId,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContestsService: Send + Sync {
    async fn list(&self, query: &ContestListQuery) -> ServiceResult<Paginated<Contest>>;

    async fn get(&self, id: ContestId) -> ServiceResult<Contest>;

    async fn create(&self, payload: &ContestPayload) -> ServiceResult<Contest>;

    async fn update(&self, id: ContestId, payload: &ContestPayload) -> ServiceResult<Contest>;

    async fn delete(&self, id: ContestId) -> ServiceResult<()>;

    async fn leaderboard(
        &self,
        id: ContestId,
        query: &LeaderboardQuery,
    ) -> ServiceResult<Paginated<LeaderboardEntry>>;

    async fn participant(
        &self,
        id: ContestId,
        user_id: UserId,
    ) -> ServiceResult<ParticipantDetail>;
}
