use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Chapter, ChapterMember, ChapterRole, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn create_user(app: &Router, name: &str) -> User {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/user",
            &serde_json::json!({ "name": name }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn create_chapter(app: &Router, name: &str) -> Chapter {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/chapter",
            &serde_json::json!({ "name": name }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- users ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(empty_request("GET", "/user")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn create_user_assigns_increasing_ids() {
    let app = app();
    let first = create_user(&app, "ada").await;
    let second = create_user(&app, "grace").await;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(second.name, "grace");
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/user", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_missing_user_returns_sentinel_body() {
    let resp = app().oneshot(empty_request("GET", "/user/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"ERROR_USER_NOT_FOUND");
}

#[tokio::test]
async fn update_user_renames_in_place() {
    let app = app();
    let user = create_user(&app, "ada").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/user/{}", user.id),
            r#"{"name":"ada-new"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = body_json(resp).await;
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.name, "ada-new");
}

#[tokio::test]
async fn delete_user_returns_200_then_sentinel() {
    let app = app();
    let user = create_user(&app, "ada").await;
    let uri = format!("/user/{}", user.id);

    let resp = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: User = body_json(resp).await;
    assert_eq!(removed, user);

    let resp = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"ERROR_USER_NOT_FOUND");
}

// --- chapters ---

#[tokio::test]
async fn get_missing_chapter_returns_sentinel_body() {
    let resp = app().oneshot(empty_request("GET", "/chapter/7")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"ERROR_CHAPTER_NOT_FOUND");
}

#[tokio::test]
async fn update_missing_chapter_returns_sentinel_body() {
    let resp = app()
        .oneshot(json_request("PUT", "/chapter/7", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"ERROR_CHAPTER_NOT_FOUND");
}

#[tokio::test]
async fn list_chapters_contains_created() {
    let app = app();
    let chapter = create_chapter(&app, "abc12").await;

    let resp = app.clone().oneshot(empty_request("GET", "/chapter")).await.unwrap();
    let chapters: Vec<Chapter> = body_json(resp).await;
    assert_eq!(chapters, vec![chapter]);
}

// --- chapter members ---

#[tokio::test]
async fn create_member_defaults_role_to_contributor() {
    let app = app();
    let user = create_user(&app, "ada").await;
    let chapter = create_chapter(&app, "abc12").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/chapter/{}/member/{}", chapter.id, user.id),
            "{}",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let member: ChapterMember = body_json(resp).await;
    assert_eq!(member.role, Some(ChapterRole::Contributor));
}

#[tokio::test]
async fn duplicate_member_is_conflict() {
    let app = app();
    let user = create_user(&app, "ada").await;
    let chapter = create_chapter(&app, "abc12").await;
    let uri = format!("/chapter/{}/member/{}", chapter.id, user.id);

    let resp = app
        .clone()
        .oneshot(json_request("POST", &uri, r#"{"role":"Lead"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(json_request("POST", &uri, r#"{"role":"Lead"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already a member"));
}

#[tokio::test]
async fn member_of_missing_chapter_is_unprocessable() {
    let app = app();
    let user = create_user(&app, "ada").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/chapter/99/member/{}", user.id),
            "{}",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn member_listing_by_chapter_and_globally() {
    let app = app();
    let user = create_user(&app, "ada").await;
    let first = create_chapter(&app, "one").await;
    let second = create_chapter(&app, "two").await;
    for chapter in [&first, &second] {
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/chapter/{}/member/{}", chapter.id, user.id),
                "{}",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app
        .clone()
        .oneshot(empty_request("GET", "/chapter/member"))
        .await
        .unwrap();
    let all: Vec<ChapterMember> = body_json(resp).await;
    assert_eq!(all.len(), 2);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &format!("/chapter/{}/member", first.id)))
        .await
        .unwrap();
    let in_first: Vec<ChapterMember> = body_json(resp).await;
    assert_eq!(in_first.len(), 1);
    assert_eq!(in_first[0].chapter_id, first.id);
}

#[tokio::test]
async fn chapter_with_members_cannot_be_deleted() {
    let app = app();
    let user = create_user(&app, "ada").await;
    let chapter = create_chapter(&app, "abc12").await;
    let member_uri = format!("/chapter/{}/member/{}", chapter.id, user.id);
    app.clone()
        .oneshot(json_request("POST", &member_uri, "{}"))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/chapter/{}", chapter.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &member_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &member_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"ERROR_CHAPTER_MEMBER_NOT_FOUND");
}
