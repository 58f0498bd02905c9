use super::parse_estimated_hours;
use super::Flag;
use super::SessionInput;
use super::ValidationRule;
use crate::configuration::ConfigKey;
use crate::domain::models::IssueType;

fn valid(key: ConfigKey) -> String {
    let val = match key {
        ConfigKey::ProjectID => "111",
        ConfigKey::IssueID => "632",
        ConfigKey::ApiKey => "abc",
        ConfigKey::RedmineBaseURL => "https://redmine.example.com",
        ConfigKey::EstimatedTime => "1h 30m",
        ConfigKey::IssueType => "bug",
        _ => "",
    };

    return val.to_string();
}

#[test]
fn it_checks_non_empty() {
    assert!(ValidationRule::NonEmpty.check("111").is_ok());
    assert!(ValidationRule::NonEmpty.check("").is_err());
    assert!(ValidationRule::NonEmpty.check("   ").is_err());
}

#[test]
fn it_checks_issue_ids() {
    assert!(ValidationRule::IssueId.check("632").is_ok());
    assert!(ValidationRule::IssueId.check("-1").is_err());
    assert!(ValidationRule::IssueId.check("abc").is_err());
    assert!(ValidationRule::IssueId.check("").is_err());
}

#[test]
fn it_checks_durations() {
    assert!(ValidationRule::Duration.check("").is_ok());
    assert!(ValidationRule::Duration.check("2.5").is_ok());
    assert!(ValidationRule::Duration.check("1h 30m").is_ok());
    assert!(ValidationRule::Duration.check("-2").is_err());
    assert!(ValidationRule::Duration.check("soon").is_err());
}

#[test]
fn it_checks_one_of() {
    let rule = ValidationRule::OneOf(IssueType::FLAG_VALUES);
    assert!(rule.check("code-smell").is_ok());
    assert!(rule.check("feature").is_err());
    assert!(rule.check("").is_err());
}

#[test]
fn it_parses_estimates_to_hours() {
    assert_eq!(parse_estimated_hours(""), Ok(None));
    assert_eq!(parse_estimated_hours("2.5"), Ok(Some(2.5)));
    assert_eq!(parse_estimated_hours("90m"), Ok(Some(1.5)));
    assert_eq!(parse_estimated_hours("1h 30m"), Ok(Some(1.5)));
}

#[test]
fn it_builds_session_input() {
    let input = SessionInput::from_values(valid).unwrap();

    assert_eq!(input.project_id, "111");
    assert_eq!(input.issue_id, 632);
    assert_eq!(input.estimated_hours, Some(1.5));
    assert_eq!(input.issue_type, IssueType::Bug);
}

#[test]
fn it_reports_the_first_invalid_flag() {
    let err = SessionInput::from_values(|key| {
        if key == ConfigKey::IssueID {
            return "-1".to_string();
        }
        if key == ConfigKey::ApiKey {
            return "".to_string();
        }
        return valid(key);
    })
    .unwrap_err();

    assert_eq!(err.flag, "issue-id");
    insta::assert_snapshot!(err.to_string(), @"provide Redmine issue identifier (--issue-id): issue id is not set");
}

#[test]
fn it_rejects_a_missing_project() {
    let err = SessionInput::from_values(|key| {
        if key == ConfigKey::ProjectID {
            return "".to_string();
        }
        return valid(key);
    })
    .unwrap_err();

    assert_eq!(err.flag, "project-id");
}

#[test]
fn it_declares_every_session_flag() {
    let names = Flag::session_flags()
        .iter()
        .map(|flag| return flag.name())
        .collect::<Vec<String>>();

    assert_eq!(
        names,
        vec![
            "project-id",
            "issue-id",
            "api-key",
            "redmine-base-url",
            "estimated-time",
            "issue-type"
        ]
    );
}

#[test]
fn it_defaults_to_an_unset_issue() {
    let flag = Flag::find(ConfigKey::IssueID).unwrap();
    assert_eq!(flag.default_value(), "-1");
    assert!(flag.validate(&flag.default_value()).is_err());
}
