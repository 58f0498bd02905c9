#[cfg(test)]
#[path = "record_test.rs"]
mod tests;

use std::fmt;
use std::time::Duration;

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::Assignment;
use super::SessionInput;

/// Sonar-style classification of the work behind an issue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    #[serde(rename = "CODE_SMELL")]
    CodeSmell,
    #[serde(rename = "BUG")]
    Bug,
    #[serde(rename = "VULNERABILITY")]
    Vulnerability,
    // Logs have always stored general issues as `N/A`.
    #[default]
    #[serde(rename = "N/A", alias = "GENERAL")]
    General,
}

impl IssueType {
    /// Values accepted by the `--issue-type` flag.
    pub const FLAG_VALUES: &'static [&'static str] =
        &["code-smell", "bug", "vulnerability", "general"];

    /// Maps free text from the tracker to an issue type. Matching is a case
    /// insensitive substring search, and the first hit wins in the order
    /// smell, bug, vulnerability.
    pub fn classify(text: &str) -> IssueType {
        let text = text.to_lowercase();
        if text.contains("smell") {
            return IssueType::CodeSmell;
        }
        if text.contains("bug") {
            return IssueType::Bug;
        }
        if text.contains("vulnerabilit") {
            return IssueType::Vulnerability;
        }

        return IssueType::General;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub id: u64,
}

/// Older logs wrote `{"id":0}` when an issue had no parent.
fn deserialize_parent<'de, D>(deserializer: D) -> Result<Option<Parent>, D::Error>
where
    D: Deserializer<'de>,
{
    let parent = Option::<Parent>::deserialize(deserializer)?;
    return Ok(parent.filter(|parent| return parent.id != 0));
}

pub fn hours(elapsed: Duration) -> f64 {
    return elapsed.as_secs_f64() / 3600.0;
}

/// One timed session on one issue. Serialized as a single JSON line in the
/// host log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub project_id: String,
    pub issue_id: i64,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    #[serde(
        default,
        deserialize_with = "deserialize_parent",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Parent>,
    pub estimated_hours: f64,
    pub spent_hours: f64,
    pub start_time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub user: User,
}

impl SessionRecord {
    pub fn new(project_id: &str, issue_id: i64, start_time: DateTime<FixedOffset>) -> SessionRecord {
        return SessionRecord {
            project_id: project_id.to_string(),
            issue_id,
            issue_type: IssueType::General,
            parent: None,
            estimated_hours: 0.0,
            spent_hours: 0.0,
            start_time,
            end_time: None,
            user: User::default(),
        };
    }

    /// Copies what the tracker reported at assignment time. The tracker's
    /// estimate and classification win over the values given on the command
    /// line, which only fill in what the tracker left empty.
    pub fn apply_assignment(&mut self, assignment: Assignment, input: &SessionInput) {
        let issue = assignment.issue;

        self.user = assignment.user;
        self.parent = issue.parent_id.filter(|id| return *id != 0).map(|id| {
            return Parent { id };
        });
        self.estimated_hours = issue
            .estimated_hours
            .or(input.estimated_hours)
            .unwrap_or_default();
        self.issue_type = match issue.classification {
            Some(text) => IssueType::classify(&text),
            None => input.issue_type,
        };
    }

    /// Closes the session `elapsed` after it started. The end time is derived
    /// from the start so that it can never precede it.
    pub fn finalize(&mut self, elapsed: Duration) {
        let offset = chrono::Duration::from_std(elapsed).unwrap_or_else(|_| {
            return chrono::Duration::zero();
        });

        self.end_time = Some(self.start_time + offset);
        self.spent_hours = hours(elapsed);
    }
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(line) => return write!(f, "{line}"),
            Err(_) => return write!(f, "{self:?}"),
        }
    }
}
