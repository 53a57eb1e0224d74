//! Problems endpoints, including the test-case upload surface

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ServiceResult;
use crate::listing::query::ProblemListQuery;
use crate::models::{Paginated, Problem, ProblemId, ProblemPayload, TestcaseFileRef};

/// Multipart body of a test-case upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestcaseUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Number of records found when the content was validated
    pub testcase_count: usize,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProblemsService: Send + Sync {
    async fn list(&self, query: &ProblemListQuery) -> ServiceResult<Paginated<Problem>>;

    async fn get(&self, id: ProblemId) -> ServiceResult<Problem>;

    async fn create(&self, payload: &ProblemPayload) -> ServiceResult<Problem>;

    async fn update(&self, id: ProblemId, payload: &ProblemPayload) -> ServiceResult<Problem>;

    async fn delete(&self, id: ProblemId) -> ServiceResult<()>;

    /// POST the hidden test-case file for a problem
    async fn upload_testcase_file(
        &self,
        id: ProblemId,
        upload: &TestcaseUpload,
    ) -> ServiceResult<TestcaseFileRef>;

    async fn remove_testcase_file(&self, id: ProblemId, file_id: uuid::Uuid) -> ServiceResult<()>;
}
