use crate::{
    domain::{Todo, TodoId, TodoStatus, UserId, UserProfile},
    error::{ErrorBody, ErrorCode, RemoteRejection},
    protocol::NewTodoRequest,
};

#[test]
fn status_uses_backend_wire_names() {
    let encoded = serde_json::to_string(&TodoStatus::InProgress).expect("encode");
    assert_eq!(encoded, "\"in progress\"");

    let decoded: TodoStatus = serde_json::from_str("\"not started\"").expect("decode");
    assert_eq!(decoded, TodoStatus::NotStarted);
    assert_eq!(TodoStatus::default(), TodoStatus::NotStarted);
}

#[test]
fn status_parse_is_case_insensitive_and_rejects_unknown() {
    assert_eq!(TodoStatus::parse("Done"), Some(TodoStatus::Done));
    assert_eq!(TodoStatus::parse(" in progress "), Some(TodoStatus::InProgress));
    assert_eq!(TodoStatus::parse("blocked"), None);
}

#[test]
fn todo_decodes_list_row_without_description() {
    let todo: Todo = serde_json::from_value(serde_json::json!({
        "id": "4",
        "title": "water plants",
        "created_at": "2024-01-01 09:00:00",
        "due_time": "2024-01-02 10:00:00",
        "status": "todo",
        "user_id": "9"
    }))
    .expect("decode");

    assert_eq!(todo.id, TodoId::from("4"));
    assert!(todo.description.is_empty());
    assert_eq!(todo.user_id, Some(UserId::from("9")));
}

#[test]
fn ids_accept_numeric_json() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({
        "id": 12,
        "firstname": "Ada",
        "name": "Lovelace",
        "email": "ada@example.com"
    }))
    .expect("decode");
    assert_eq!(profile.id.as_str(), "12");
}

#[test]
fn new_todo_request_carries_owner_id() {
    let request = NewTodoRequest {
        title: "t".into(),
        description: String::new(),
        due_time: "2024-01-01T10:00".into(),
        status: TodoStatus::NotStarted,
        user_id: UserId::from("3"),
    };
    let value = serde_json::to_value(&request).expect("encode");
    assert_eq!(value["user_id"], "3");
    assert_eq!(value["status"], "not started");
}

#[test]
fn error_body_prefers_detail_then_message() {
    let both: ErrorBody = serde_json::from_value(serde_json::json!({
        "detail": "Account already exists",
        "message": "ignored"
    }))
    .expect("decode");
    assert_eq!(both.into_message().as_deref(), Some("Account already exists"));

    let message_only: ErrorBody =
        serde_json::from_value(serde_json::json!({ "message": "bad due time" })).expect("decode");
    assert_eq!(message_only.into_message().as_deref(), Some("bad due time"));

    let empty = ErrorBody::default();
    assert_eq!(empty.into_message(), None);
}

#[test]
fn error_body_stringifies_structured_detail() {
    let body: ErrorBody = serde_json::from_value(serde_json::json!({
        "detail": [{ "loc": ["body", "title"], "msg": "field required" }]
    }))
    .expect("decode");
    let message = body.into_message().expect("message");
    assert!(message.contains("field required"), "got {message}");
}

#[test]
fn rejection_classifies_status() {
    let rejection = RemoteRejection::new(409, "Account already exists");
    assert_eq!(rejection.code, ErrorCode::Conflict);
    assert_eq!(RemoteRejection::new(401, "x").code, ErrorCode::Unauthorized);
    assert_eq!(RemoteRejection::new(503, "x").code, ErrorCode::Internal);
}

#[test]
fn null_description_decodes_as_empty_and_keeps_the_rest_of_the_list() {
    let rows: Vec<Todo> = serde_json::from_str(
        r#"[
            {"id":"1","title":"a","description":null,"created_at":"2024-01-01 09:00:00",
             "due_time":"2024-01-02T10:00","status":"todo"},
            {"id":"2","title":"b","description":"details","created_at":"2024-01-01 09:00:00",
             "due_time":"2024-01-02T10:00","status":"done"}
        ]"#,
    )
    .expect("decode");

    assert_eq!(rows.len(), 2);
    assert!(rows[0].description.is_empty());
    assert_eq!(rows[1].description, "details");
}
