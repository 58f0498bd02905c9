use std::sync::Arc;

use async_trait::async_trait;

use super::RemoteError;
use super::User;

/// What the tracker knew about an issue when it was assigned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IssueSnapshot {
    pub estimated_hours: Option<f64>,
    pub classification: Option<String>,
    pub parent_id: Option<u64>,
}

/// Result of a successful self assignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    pub user: User,
    pub issue: IssueSnapshot,
}

#[async_trait]
pub trait Tracker: Send + Sync {
    /// Resolves the identity owning the API key.
    async fn who_am_i(&self) -> Result<User, RemoteError>;

    /// Reads the issue's current estimate and classification, then moves it to
    /// "in progress" and assigns it to `user`.
    async fn assign(
        &self,
        issue_id: i64,
        project_id: &str,
        user: &User,
    ) -> Result<IssueSnapshot, RemoteError>;

    /// Identity lookup followed by assignment. A failure in either step is
    /// final, nothing is retried.
    async fn self_assign(&self, issue_id: i64, project_id: &str) -> Result<Assignment, RemoteError> {
        let user = self.who_am_i().await?;
        let issue = self.assign(issue_id, project_id, &user).await?;

        return Ok(Assignment { user, issue });
    }
}

pub type TrackerBox = Arc<dyn Tracker>;
