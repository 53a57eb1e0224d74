//! Submissions endpoints

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::SubmissionQuery;
use crate::models::{Paginated, Submission};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubmissionsService: Send + Sync {
    async fn list(&self, query: &SubmissionQuery) -> ServiceResult<Paginated<Submission>>;
}
