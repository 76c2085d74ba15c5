use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Body accepted by POST and PUT. Server-owned fields in the body are ignored.
#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub avatar: String,
}

#[derive(Default)]
pub struct Store {
    last_id: u64,
    users: BTreeMap<u64, User>,
}

pub type Db = Arc<RwLock<Store>>;

/// JSON error body: `{"message": "..."}`.
pub struct ErrorBody(StatusCode, &'static str);

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "message": self.1 }))).into_response()
    }
}

const NOT_FOUND: ErrorBody = ErrorBody(StatusCode::NOT_FOUND, "user not found");

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validate(input: &UserInput) -> Result<(), ErrorBody> {
    if input.name.trim().is_empty() {
        return Err(ErrorBody(StatusCode::BAD_REQUEST, "name must not be empty"));
    }
    Ok(())
}

// Ids are decimal counters; anything else can never match a stored user.
fn key(id: &str) -> Result<u64, ErrorBody> {
    id.parse().map_err(|_| NOT_FOUND)
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), ErrorBody> {
    validate(&input)?;
    let mut store = db.write().await;
    store.last_id += 1;
    let key = store.last_id;
    let user = User {
        id: key.to_string(),
        name: input.name,
        avatar: input.avatar,
        created_at: Utc::now().trunc_subsecs(0),
    };
    store.users.insert(key, user.clone());
    debug!(id = %user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<User>, ErrorBody> {
    let key = key(&id)?;
    let store = db.read().await;
    store.users.get(&key).cloned().map(Json).ok_or(NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ErrorBody> {
    let key = key(&id)?;
    validate(&input)?;
    let mut store = db.write().await;
    let user = store.users.get_mut(&key).ok_or(NOT_FOUND)?;
    user.name = input.name;
    user.avatar = input.avatar;
    Ok(Json(user.clone()))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, ErrorBody> {
    let key = key(&id)?;
    let mut store = db.write().await;
    if store.users.remove(&key).is_none() {
        return Err(NOT_FOUND);
    }
    debug!(%id, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}
