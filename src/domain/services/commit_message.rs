#[cfg(test)]
#[path = "commit_message_test.rs"]
mod tests;

use crate::domain::models::SessionRecord;

/// Smallest amount of time worth logging against an issue.
const MIN_LOGGED_HOURS: f64 = 0.01;

fn format_close_issue(record: &SessionRecord) -> String {
    return format!("closes #{}", record.issue_id);
}

fn format_log_time(record: &SessionRecord) -> String {
    let spent_hours = record.spent_hours.max(MIN_LOGGED_HOURS);
    return format!("@{spent_hours:.8}");
}

/// The svn command closing the issue and logging the spent time. Only the
/// suggestion is floored to [`MIN_LOGGED_HOURS`], the record keeps the
/// measured value.
pub fn commit_suggestion(record: &SessionRecord) -> String {
    return format!(
        "svn commit -m \"{} {}\"",
        format_close_issue(record),
        format_log_time(record)
    );
}
