pub fn redmine_user_fixture() -> &'static str {
    return r#"
{
  "user": {
    "id": 3,
    "login": "jsmith",
    "admin": false,
    "firstname": "John",
    "lastname": "Smith",
    "mail": "jsmith@somenet.foo",
    "created_on": "2007-01-01T00:00:00Z",
    "last_login_on": "2023-11-02T08:19:34Z",
    "api_key": "ebc3f6b781a6fb3f2b0a83ce0ebb80e0d585189d"
  }
}
"#
    .trim();
}

pub fn redmine_issue_fixture() -> &'static str {
    return r#"
{
  "issue": {
    "id": 632,
    "project": { "id": 111, "name": "Monitoring" },
    "tracker": { "id": 1, "name": "Bug" },
    "status": { "id": 1, "name": "New" },
    "priority": { "id": 2, "name": "Normal" },
    "author": { "id": 5, "name": "Jane Doe" },
    "parent": { "id": 600 },
    "subject": "Duplicate parsing branches in importer",
    "description": "",
    "start_date": "2023-11-01",
    "done_ratio": 0,
    "estimated_hours": 2.5,
    "spent_hours": 0.0,
    "custom_fields": [
      { "id": 9, "name": "Sonar type", "value": "Code Smell: duplicated blocks" }
    ],
    "created_on": "2023-11-01T10:00:00Z",
    "updated_on": "2023-11-01T10:00:00Z"
  }
}
"#
    .trim();
}

/// Two records as written by earlier releases, where a missing parent was
/// stored as `{"id":0}` and general issues as `N/A`.
pub fn log_fixture() -> &'static str {
    return concat!(
        r#"{"project_id":"111","issue_id":632,"type":"CODE_SMELL","parent":{"id":600},"estimated_hours":2.5,"spent_hours":1.25,"start_time":"2023-11-02T09:00:00+01:00","end_time":"2023-11-02T10:15:00+01:00","user":{"id":3,"firstname":"John","lastname":"Smith"}}"#,
        "\n",
        r#"{"project_id":"111","issue_id":640,"type":"N/A","parent":{"id":0},"estimated_hours":0,"spent_hours":0.5,"start_time":"2023-11-02T11:00:00+01:00","end_time":"2023-11-02T11:30:00+01:00","user":{"id":3,"firstname":"John","lastname":"Smith"}}"#,
        "\n",
    );
}
