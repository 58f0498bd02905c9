#[cfg(test)]
#[path = "flag_test.rs"]
mod tests;

use std::time::Duration;

use super::IssueType;
use super::ValidationError;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Placeholder issue id meaning "not provided".
pub const UNSET_ISSUE_ID: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationRule {
    NonEmpty,
    /// An integer other than [`UNSET_ISSUE_ID`].
    IssueId,
    /// Optional. Either decimal hours (`1.5`) or a human duration (`1h 30m`).
    Duration,
    OneOf(&'static [&'static str]),
}

impl ValidationRule {
    pub fn check(&self, value: &str) -> Result<(), String> {
        match self {
            ValidationRule::NonEmpty => {
                if value.trim().is_empty() {
                    return Err("value is empty".to_string());
                }
            }
            ValidationRule::IssueId => {
                parse_issue_id(value)?;
            }
            ValidationRule::Duration => {
                parse_estimated_hours(value)?;
            }
            ValidationRule::OneOf(values) => {
                if value.is_empty() {
                    return Err("value is empty".to_string());
                }
                if !values.iter().any(|allowed| return *allowed == value) {
                    return Err(format!(
                        "'{value}' is not one of {}",
                        values.join(", ")
                    ));
                }
            }
        }

        return Ok(());
    }
}

pub fn parse_issue_id(value: &str) -> Result<i64, String> {
    let id = value
        .trim()
        .parse::<i64>()
        .map_err(|err| return format!("'{value}' is not an issue number: {err}"))?;

    if id == UNSET_ISSUE_ID {
        return Err("issue id is not set".to_string());
    }

    return Ok(id);
}

pub fn parse_estimated_hours(value: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(hours) = value.parse::<f64>() {
        if !hours.is_finite() || hours < 0.0 {
            return Err(format!("'{value}' is not a valid number of hours"));
        }
        return Ok(Some(hours));
    }

    let duration: Duration = humantime::parse_duration(value)
        .map_err(|err| return format!("'{value}' is not a duration: {err}"))?;

    return Ok(Some(super::hours(duration)));
}

/// A user settable input: where it comes from, how it is described, and the
/// rule its value must satisfy before a session may start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    pub key: ConfigKey,
    pub usage: &'static str,
    pub rule: ValidationRule,
}

impl Flag {
    pub fn name(&self) -> String {
        return self.key.to_string();
    }

    pub fn default_value(&self) -> String {
        return Config::default(self.key);
    }

    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        return self.rule.check(value).map_err(|reason| {
            return ValidationError {
                flag: self.name(),
                usage: self.usage.to_string(),
                reason,
            };
        });
    }

    /// Every input a session needs, in the order they are checked.
    pub fn session_flags() -> Vec<Flag> {
        return vec![
            Flag {
                key: ConfigKey::ProjectID,
                usage: "project identifier",
                rule: ValidationRule::NonEmpty,
            },
            Flag {
                key: ConfigKey::IssueID,
                usage: "Redmine issue identifier",
                rule: ValidationRule::IssueId,
            },
            Flag {
                key: ConfigKey::ApiKey,
                usage: "your Redmine api key",
                rule: ValidationRule::NonEmpty,
            },
            Flag {
                key: ConfigKey::RedmineBaseURL,
                usage: "Redmine base URL",
                rule: ValidationRule::NonEmpty,
            },
            Flag {
                key: ConfigKey::EstimatedTime,
                usage: "estimated time, used when the issue has no estimate",
                rule: ValidationRule::Duration,
            },
            Flag {
                key: ConfigKey::IssueType,
                usage: "issue type, used when the issue has no classification",
                rule: ValidationRule::OneOf(IssueType::FLAG_VALUES),
            },
        ];
    }

    pub fn find(key: ConfigKey) -> Option<Flag> {
        return Flag::session_flags()
            .into_iter()
            .find(|flag| return flag.key == key);
    }
}

/// Validated inputs of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionInput {
    pub project_id: String,
    pub issue_id: i64,
    pub estimated_hours: Option<f64>,
    pub issue_type: IssueType,
}

impl SessionInput {
    /// Checks every session flag against the values returned by `lookup`. The
    /// first failing flag aborts.
    pub fn from_values<F>(lookup: F) -> Result<SessionInput, ValidationError>
    where
        F: Fn(ConfigKey) -> String,
    {
        for flag in Flag::session_flags() {
            flag.validate(&lookup(flag.key))?;
        }

        // Both already passed validation above.
        let issue_id = parse_issue_id(&lookup(ConfigKey::IssueID)).unwrap_or(UNSET_ISSUE_ID);
        let estimated_hours =
            parse_estimated_hours(&lookup(ConfigKey::EstimatedTime)).unwrap_or_default();

        return Ok(SessionInput {
            project_id: lookup(ConfigKey::ProjectID).trim().to_string(),
            issue_id,
            estimated_hours,
            issue_type: IssueType::classify(&lookup(ConfigKey::IssueType)),
        });
    }

    pub fn from_config() -> Result<SessionInput, ValidationError> {
        return SessionInput::from_values(Config::get);
    }
}
