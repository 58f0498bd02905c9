#[cfg(test)]
#[path = "redmine_test.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::IssueSnapshot;
use crate::domain::models::RemoteError;
use crate::domain::models::Tracker;
use crate::domain::models::User;

const API_KEY_HEADER: &str = "X-Redmine-API-Key";
const JSON_MEDIA_TYPE: &str = "application/json";
/// Redmine's stock "In Progress" status.
const IN_PROGRESS_STATUS_ID: &str = "2";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CurrentUserResponse {
    user: User,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ParentResponse {
    id: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CustomFieldResponse {
    id: u64,
    name: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
}

impl CustomFieldResponse {
    /// Multi value fields come back as arrays of strings.
    fn text(&self) -> Option<String> {
        match &self.value {
            Some(serde_json::Value::String(text)) => return Some(text.to_string()),
            Some(serde_json::Value::Array(values)) => {
                let text = values
                    .iter()
                    .filter_map(|value| return value.as_str())
                    .collect::<Vec<&str>>()
                    .join(", ");
                return Some(text);
            }
            _ => return None,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IssueDetailsResponse {
    id: i64,
    #[serde(default)]
    parent: Option<ParentResponse>,
    #[serde(default)]
    estimated_hours: Option<f64>,
    #[serde(default)]
    custom_fields: Vec<CustomFieldResponse>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IssueResponse {
    issue: IssueDetailsResponse,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AssignedTo {
    id: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IssueRequest {
    project_id: String,
    status_id: String,
    assigned_to: AssignedTo,
    assigned_to_id: u64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AssignIssueRequest {
    issue: IssueRequest,
}

pub struct Redmine {
    url: String,
    api_key: String,
}

impl Default for Redmine {
    fn default() -> Redmine {
        return Redmine::new(
            &Config::get(ConfigKey::RedmineBaseURL),
            &Config::get(ConfigKey::ApiKey),
        );
    }
}

impl Redmine {
    pub fn new(url: &str, api_key: &str) -> Redmine {
        return Redmine {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        };
    }

    fn issue_url(&self, issue_id: i64) -> String {
        return format!("{url}/issues/{issue_id}.json", url = self.url);
    }

    #[allow(clippy::implicit_return)]
    async fn send(&self, req: RequestBuilder, operation: &str) -> Result<String, RemoteError> {
        let res = req
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|err| {
                return RemoteError::Transport {
                    operation: operation.to_string(),
                    source: Box::new(err),
                };
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            return RemoteError::Transport {
                operation: operation.to_string(),
                source: Box::new(err),
            };
        })?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body, "{operation}");
            return Err(RemoteError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        return Ok(body);
    }

    #[allow(clippy::implicit_return)]
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        operation: &str,
    ) -> Result<T, RemoteError> {
        let body = self.send(reqwest::Client::new().get(url), operation).await?;

        return serde_json::from_str::<T>(&body).map_err(|err| {
            return RemoteError::Decode {
                operation: operation.to_string(),
                source: err,
            };
        });
    }

    #[allow(clippy::implicit_return)]
    async fn get_issue(&self, issue_id: i64) -> Result<IssueDetailsResponse, RemoteError> {
        let operation = format!("could not get data of the issue {issue_id}");
        let res = self
            .get_json::<IssueResponse>(&self.issue_url(issue_id), &operation)
            .await?;

        tracing::debug!(issue = ?res.issue, "Issue snapshot");
        return Ok(res.issue);
    }
}

#[async_trait]
impl Tracker for Redmine {
    #[allow(clippy::implicit_return)]
    async fn who_am_i(&self) -> Result<User, RemoteError> {
        let current_user_url = format!("{url}/users/current.json", url = self.url);
        let operation = format!("could not get user data from Redmine {current_user_url}");

        let res = self
            .get_json::<CurrentUserResponse>(&current_user_url, &operation)
            .await?;

        tracing::debug!(user_id = res.user.id, "Resolved current user");
        return Ok(res.user);
    }

    #[allow(clippy::implicit_return)]
    async fn assign(
        &self,
        issue_id: i64,
        project_id: &str,
        user: &User,
    ) -> Result<IssueSnapshot, RemoteError> {
        let outer = format!(
            "could not assign the issue {issue_id} to user with id {}",
            user.id
        );

        let issue = self
            .get_issue(issue_id)
            .await
            .map_err(|err| return err.within(&outer))?;

        let body = AssignIssueRequest {
            issue: IssueRequest {
                project_id: project_id.to_string(),
                status_id: IN_PROGRESS_STATUS_ID.to_string(),
                assigned_to: AssignedTo { id: user.id },
                assigned_to_id: user.id,
            },
        };
        let payload = serde_json::to_string(&body).map_err(|err| {
            return RemoteError::Decode {
                operation: outer.to_string(),
                source: err,
            };
        })?;

        let req = reqwest::Client::new()
            .put(self.issue_url(issue_id))
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .body(payload);
        self.send(req, &outer).await?;

        tracing::info!(issue_id, user_id = user.id, "Issue self assigned");
        return Ok(IssueSnapshot {
            estimated_hours: issue.estimated_hours,
            classification: issue
                .custom_fields
                .first()
                .and_then(|field| return field.text()),
            parent_id: issue.parent.map(|parent| return parent.id),
        });
    }
}
