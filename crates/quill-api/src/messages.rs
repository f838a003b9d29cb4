use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use quill_types::ObjectId;
use quill_types::api::{
    CreateMessageRequest, DeleteMessageResponse, MessageListResponse, UpdateMessageRequest,
    UpdateMessageResponse,
};
use quill_types::models::{Message, MessageChanges};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /messages — the whole collection, no filtering or paging.
pub async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<MessageListResponse>, ApiError> {
    let messages = state.with_db(|db| db.find_all_messages()).await?;
    Ok(Json(MessageListResponse { messages }))
}

/// GET /messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Message>, ApiError> {
    let Path(raw_id) = path?;
    let id: ObjectId = raw_id.parse()?;

    let lookup = id;
    state
        .with_db(move |db| db.find_message_by_id(&lookup))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::message_not_found(&id))
}

/// POST /messages — `author` is taken at face value; it is not looked up.
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let message = build_message(req)?;

    let record = message.clone();
    let inserted = state.with_db(move |db| db.insert_message(&record)).await?;
    if !inserted {
        return Err(ApiError::Conflict(format!("message {} already exists", message.id)));
    }

    info!("Message {} created by {}", message.id, message.author);
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /messages/{id} — partial update, absent fields are kept.
pub async fn update_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<UpdateMessageResponse>, ApiError> {
    let Path(raw_id) = path?;
    let id: ObjectId = raw_id.parse()?;
    let Json(req) = payload?;

    let changes = MessageChanges {
        title: non_empty(req.title, "title")?,
        body: non_empty(req.body, "body")?,
        author: non_empty(req.author, "author")?
            .map(|raw| raw.parse::<ObjectId>())
            .transpose()?,
    };

    let lookup = id;
    let message = state
        .with_db(move |db| db.update_message(&lookup, &changes))
        .await?
        .ok_or_else(|| ApiError::message_not_found(&id))?;

    info!("Message {} updated", message.id);
    Ok(Json(UpdateMessageResponse { message }))
}

/// DELETE /messages/{id} — a second delete of the same id is a 404.
pub async fn delete_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteMessageResponse>, ApiError> {
    let Path(raw_id) = path?;
    let id: ObjectId = raw_id.parse()?;

    let lookup = id;
    let deleted = state.with_db(move |db| db.delete_message(&lookup)).await?;
    if !deleted {
        return Err(ApiError::message_not_found(&id));
    }

    info!("Message {} deleted", id);
    Ok(Json(DeleteMessageResponse::new(raw_id)))
}

fn build_message(req: CreateMessageRequest) -> Result<Message, ApiError> {
    let title = required(req.title, "title")?;
    let body = required(req.body, "body")?;
    let author: ObjectId = required(req.author, "author")?.parse()?;
    let id: ObjectId = match req.id {
        Some(raw) => raw.parse()?,
        None => ObjectId::generate(),
    };

    let now = Utc::now();
    Ok(Message {
        id,
        title,
        body,
        author,
        created_at: now,
        updated_at: now,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    non_empty(value, field)?.ok_or_else(|| ApiError::BadRequest(format!("{} is required", field)))
}

/// `None` passes through; `Some("")` is rejected.
fn non_empty(value: Option<String>, field: &str) -> Result<Option<String>, ApiError> {
    match value {
        Some(v) if v.is_empty() => Err(ApiError::BadRequest(format!("{} must not be empty", field))),
        other => Ok(other),
    }
}
