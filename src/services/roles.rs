//! Roles and permissions endpoints

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::RoleListQuery;
use crate::models::{Paginated, Permission, Role, RoleId, RolePayload};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RolesService: Send + Sync {
    async fn list(&self, query: &RoleListQuery) -> ServiceResult<Paginated<Role>>;

    async fn get(&self, id: RoleId) -> ServiceResult<Role>;

    async fn create(&self, payload: &RolePayload) -> ServiceResult<Role>;

    async fn update(&self, id: RoleId, payload: &RolePayload) -> ServiceResult<Role>;

    async fn delete(&self, id: RoleId) -> ServiceResult<()>;

    /// Every permission known to the backend
    async fn permissions(&self) -> ServiceResult<Vec<Permission>>;
}
