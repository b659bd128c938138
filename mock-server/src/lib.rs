//! In-memory stand-in for the Data Minded API.
//!
//! Missing entities are answered with a fixed per-kind body instead of a
//! structured error, the way the real service does it.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const USER_NOT_FOUND: &str = "ERROR_USER_NOT_FOUND";
pub const CHAPTER_NOT_FOUND: &str = "ERROR_CHAPTER_NOT_FOUND";
pub const CHAPTER_MEMBER_NOT_FOUND: &str = "ERROR_CHAPTER_MEMBER_NOT_FOUND";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChapterRole {
    #[default]
    Contributor,
    Lead,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChapterMember {
    pub chapter_id: i64,
    pub user_id: i64,
    pub role: Option<ChapterRole>,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
}

#[derive(Deserialize)]
pub struct NewChapter {
    pub name: String,
}

#[derive(Deserialize, Default)]
pub struct NewChapterMember {
    #[serde(default)]
    pub role: Option<ChapterRole>,
}

#[derive(Default)]
pub struct Store {
    next_user_id: i64,
    next_chapter_id: i64,
    users: BTreeMap<i64, User>,
    chapters: BTreeMap<i64, Chapter>,
    members: BTreeMap<(i64, i64), ChapterMember>,
}

impl Store {
    fn is_member_anywhere(&self, user_id: i64) -> bool {
        self.members.keys().any(|(_, u)| *u == user_id)
    }

    fn has_members(&self, chapter_id: i64) -> bool {
        self.members.keys().any(|(c, _)| *c == chapter_id)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/user", get(list_users).post(create_user))
        .route("/user/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/chapter", get(list_chapters).post(create_chapter))
        .route("/chapter/member", get(list_all_members))
        .route(
            "/chapter/{id}",
            get(get_chapter).put(update_chapter).delete(delete_chapter),
        )
        .route("/chapter/{id}/member", get(list_chapter_members))
        .route(
            "/chapter/{id}/member/{user_id}",
            get(get_member)
                .post(create_member)
                .put(update_member)
                .delete(delete_member),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found(sentinel: &'static str) -> Response {
    (StatusCode::NOT_FOUND, sentinel).into_response()
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

// --- users ---

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn create_user(State(db): State<Db>, Json(input): Json<NewUser>) -> (StatusCode, Json<User>) {
    let mut store = db.write().await;
    store.next_user_id += 1;
    let user = User {
        id: store.next_user_id,
        name: input.name,
    };
    tracing::info!(id = user.id, name = %user.name, "creating user");
    store.users.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => not_found(USER_NOT_FOUND),
    }
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewUser>,
) -> Response {
    let mut store = db.write().await;
    match store.users.get_mut(&id) {
        Some(user) => {
            user.name = input.name;
            Json(user.clone()).into_response()
        }
        None => not_found(USER_NOT_FOUND),
    }
}

async fn delete_user(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    if store.is_member_anywhere(id) {
        return failure(
            StatusCode::CONFLICT,
            format!("user {id} is still a member of a chapter"),
        );
    }
    match store.users.remove(&id) {
        Some(user) => Json(user).into_response(),
        None => not_found(USER_NOT_FOUND),
    }
}

// --- chapters ---

async fn list_chapters(State(db): State<Db>) -> Json<Vec<Chapter>> {
    let store = db.read().await;
    Json(store.chapters.values().cloned().collect())
}

async fn create_chapter(
    State(db): State<Db>,
    Json(input): Json<NewChapter>,
) -> (StatusCode, Json<Chapter>) {
    let mut store = db.write().await;
    store.next_chapter_id += 1;
    let chapter = Chapter {
        id: store.next_chapter_id,
        name: input.name,
    };
    tracing::info!(id = chapter.id, name = %chapter.name, "creating chapter");
    store.chapters.insert(chapter.id, chapter.clone());
    (StatusCode::CREATED, Json(chapter))
}

async fn get_chapter(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let store = db.read().await;
    match store.chapters.get(&id) {
        Some(chapter) => Json(chapter.clone()).into_response(),
        None => not_found(CHAPTER_NOT_FOUND),
    }
}

async fn update_chapter(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewChapter>,
) -> Response {
    let mut store = db.write().await;
    match store.chapters.get_mut(&id) {
        Some(chapter) => {
            chapter.name = input.name;
            Json(chapter.clone()).into_response()
        }
        None => not_found(CHAPTER_NOT_FOUND),
    }
}

async fn delete_chapter(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    let mut store = db.write().await;
    if store.has_members(id) {
        return failure(
            StatusCode::CONFLICT,
            format!("chapter {id} still has members"),
        );
    }
    match store.chapters.remove(&id) {
        Some(chapter) => Json(chapter).into_response(),
        None => not_found(CHAPTER_NOT_FOUND),
    }
}

// --- chapter members ---

async fn list_all_members(State(db): State<Db>) -> Json<Vec<ChapterMember>> {
    let store = db.read().await;
    Json(store.members.values().cloned().collect())
}

async fn list_chapter_members(
    State(db): State<Db>,
    Path(chapter_id): Path<i64>,
) -> Json<Vec<ChapterMember>> {
    let store = db.read().await;
    Json(
        store
            .members
            .values()
            .filter(|m| m.chapter_id == chapter_id)
            .cloned()
            .collect(),
    )
}

async fn get_member(State(db): State<Db>, Path((chapter_id, user_id)): Path<(i64, i64)>) -> Response {
    let store = db.read().await;
    match store.members.get(&(chapter_id, user_id)) {
        Some(member) => Json(member.clone()).into_response(),
        None => not_found(CHAPTER_MEMBER_NOT_FOUND),
    }
}

async fn create_member(
    State(db): State<Db>,
    Path((chapter_id, user_id)): Path<(i64, i64)>,
    Json(input): Json<NewChapterMember>,
) -> Response {
    let mut store = db.write().await;
    if !store.chapters.contains_key(&chapter_id) {
        return failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("chapter {chapter_id} does not exist"),
        );
    }
    if !store.users.contains_key(&user_id) {
        return failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("user {user_id} does not exist"),
        );
    }
    if store.members.contains_key(&(chapter_id, user_id)) {
        return failure(
            StatusCode::CONFLICT,
            format!("user {user_id} is already a member of chapter {chapter_id}"),
        );
    }
    let member = ChapterMember {
        chapter_id,
        user_id,
        role: Some(input.role.unwrap_or_default()),
    };
    tracing::info!(chapter_id, user_id, role = ?member.role, "registering chapter member");
    store.members.insert((chapter_id, user_id), member.clone());
    (StatusCode::CREATED, Json(member)).into_response()
}

async fn update_member(
    State(db): State<Db>,
    Path((chapter_id, user_id)): Path<(i64, i64)>,
    Json(input): Json<NewChapterMember>,
) -> Response {
    let mut store = db.write().await;
    match store.members.get_mut(&(chapter_id, user_id)) {
        Some(member) => {
            member.role = Some(input.role.unwrap_or_default());
            Json(member.clone()).into_response()
        }
        None => not_found(CHAPTER_MEMBER_NOT_FOUND),
    }
}

async fn delete_member(
    State(db): State<Db>,
    Path((chapter_id, user_id)): Path<(i64, i64)>,
) -> Response {
    let mut store = db.write().await;
    match store.members.remove(&(chapter_id, user_id)) {
        Some(member) => Json(member).into_response(),
        None => not_found(CHAPTER_MEMBER_NOT_FOUND),
    }
}
