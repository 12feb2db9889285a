/// Integration tests for task group and task endpoints

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::{json, Value};

async fn create_group(ctx: &TestContext, token: &str, title: &str, status: &str) -> Value {
    let (code, body) = ctx
        .send(
            Method::POST,
            "/api/v1/groups",
            Some(token),
            Some(json!({ "title": title, "status": status })),
        )
        .await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body
}

async fn create_task(ctx: &TestContext, token: &str, group_id: i64, title: &str) -> Value {
    let (code, body) = ctx
        .send(
            Method::POST,
            &format!("/api/v1/groups/{}/tasks", group_id),
            Some(token),
            Some(json!({ "title": title, "body": "details" })),
        )
        .await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body
}

async fn list_tasks(ctx: &TestContext, token: &str, group_id: i64) -> Vec<Value> {
    let (code, body) = ctx
        .send(Method::GET, &format!("/api/v1/groups/{}/tasks", group_id), Some(token), None)
        .await;
    assert_eq!(code, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_group_create_and_list() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;

    let group = create_group(&ctx, &token, "Shopping", "urgent").await;
    assert_eq!(group["title"], "Shopping");
    assert_eq!(group["status"], "urgent");

    create_group(&ctx, &token, "Habits", "daily").await;

    let (status, body) = ctx.send(Method::GET, "/api/v1/groups", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let groups = body.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["id"], group["id"]);
}

#[tokio::test]
async fn test_group_create_validation() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;

    for (title, status) in [("", "urgent"), ("Shopping", "someday")] {
        let (code, body) = ctx
            .send(
                Method::POST,
                "/api/v1/groups",
                Some(&token),
                Some(json!({ "title": title, "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_foreign_group_looks_missing() {
    let ctx = TestContext::new();
    let alice = ctx.signup("alice").await;
    let mallory = ctx.signup("mallory").await;
    let group = create_group(&ctx, &alice, "Shopping", "urgent").await;
    let id = group["id"].as_i64().unwrap();

    let (foreign_status, foreign_body) = ctx
        .send(
            Method::PATCH,
            &format!("/api/v1/groups/{}", id),
            Some(&mallory),
            Some(json!({ "title": "Pwned" })),
        )
        .await;
    let (missing_status, missing_body) = ctx
        .send(
            Method::PATCH,
            "/api/v1/groups/999999",
            Some(&mallory),
            Some(json!({ "title": "Pwned" })),
        )
        .await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body, missing_body);

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/api/v1/groups/{}", id), Some(&mallory), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = ctx.send(Method::GET, "/api/v1/groups", Some(&alice), None).await;
    assert_eq!(body[0]["title"], "Shopping");
    let (_, body) = ctx.send(Method::GET, "/api/v1/groups", Some(&mallory), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_task_lifecycle() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;
    let inbox = create_group(&ctx, &token, "Inbox", "daily").await["id"].as_i64().unwrap();
    let later = create_group(&ctx, &token, "Later", "longterm").await["id"].as_i64().unwrap();

    let task = create_task(&ctx, &token, inbox, "Milk").await;
    assert_eq!(task["is_done"], false);
    assert_eq!(task["group_id"], inbox);
    let task_id = task["id"].as_i64().unwrap();

    let (status, _) = ctx
        .send(
            Method::PATCH,
            &format!("/api/v1/tasks/{}", task_id),
            Some(&token),
            Some(json!({ "title": "Oat milk", "body": "1 litre" })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/v1/tasks/{}/done", task_id),
            Some(&token),
            Some(json!({ "done": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let tasks = list_tasks(&ctx, &token, inbox).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Oat milk");
    assert_eq!(tasks[0]["body"], "1 litre");
    assert_eq!(tasks[0]["is_done"], true);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/v1/tasks/{}/group", task_id),
            Some(&token),
            Some(json!({ "group_id": later })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(list_tasks(&ctx, &token, inbox).await.is_empty());
    assert_eq!(list_tasks(&ctx, &token, later).await.len(), 1);

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/api/v1/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(list_tasks(&ctx, &token, later).await.is_empty());
}

#[tokio::test]
async fn test_task_content_validation() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;
    let inbox = create_group(&ctx, &token, "Inbox", "daily").await["id"].as_i64().unwrap();

    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/api/v1/groups/{}/tasks", inbox),
            Some(&token),
            Some(json!({ "title": "Milk", "body": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(list_tasks(&ctx, &token, inbox).await.is_empty());
}

#[tokio::test]
async fn test_repeated_done_is_unobservable() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;
    let inbox = create_group(&ctx, &token, "Inbox", "daily").await["id"].as_i64().unwrap();
    let task_id = create_task(&ctx, &token, inbox, "Milk").await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tasks/{}/done", task_id);

    ctx.send(Method::PUT, &uri, Some(&token), Some(json!({ "done": true }))).await;
    let first = list_tasks(&ctx, &token, inbox).await;

    ctx.send(Method::PUT, &uri, Some(&token), Some(json!({ "done": true }))).await;
    let second = list_tasks(&ctx, &token, inbox).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_foreign_tasks_and_groups_are_off_limits() {
    let ctx = TestContext::new();
    let alice = ctx.signup("alice").await;
    let mallory = ctx.signup("mallory").await;
    let inbox = create_group(&ctx, &alice, "Inbox", "daily").await["id"].as_i64().unwrap();
    let task_id = create_task(&ctx, &alice, inbox, "Milk").await["id"].as_i64().unwrap();
    let mallory_group = create_group(&ctx, &mallory, "Mine", "urgent").await["id"].as_i64().unwrap();

    // Creating in someone else's group
    let (status, _) = ctx
        .send(
            Method::POST,
            &format!("/api/v1/groups/{}/tasks", inbox),
            Some(&mallory),
            Some(json!({ "title": "Sneaky", "body": "task" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Moving an own task into someone else's group
    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/v1/tasks/{}/group", task_id),
            Some(&alice),
            Some(json!({ "group_id": mallory_group })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/v1/tasks/{}/done", task_id),
            Some(&mallory),
            Some(json!({ "done": true })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/api/v1/tasks/{}", task_id), Some(&mallory), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(list_tasks(&ctx, &mallory, inbox).await.is_empty());
    let tasks = list_tasks(&ctx, &alice, inbox).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Milk");
    assert_eq!(tasks[0]["is_done"], false);
}

#[tokio::test]
async fn test_group_delete_removes_its_tasks() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;
    let inbox = create_group(&ctx, &token, "Inbox", "daily").await["id"].as_i64().unwrap();
    let task_id = create_task(&ctx, &token, inbox, "Milk").await["id"].as_i64().unwrap();

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/api/v1/groups/{}", inbox), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .send(Method::DELETE, &format!("/api/v1/tasks/{}", task_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_json_bad_request() {
    let ctx = TestContext::new();
    let token = ctx.signup("alice").await;

    let (status, body) = ctx
        .send(Method::GET, "/api/v1/groups/abc/tasks", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(!body["message"].as_str().unwrap().is_empty());

    let (status, body) = ctx
        .send(Method::PUT, "/api/v1/tasks/12x/done", Some(&token), Some(json!({ "done": true })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}
