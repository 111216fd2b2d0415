use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State, rejection::JsonRejection},
    http::HeaderMap,
    response::Response,
};
use payloads::{
    guestbook::{
        Created, DeleteEntry, Eligibility, EligibilityRequest, EntryView, NewEntry, Outcome,
    },
    spotify::Track,
    status::{Health, StatusReceipt, StatusSnapshot, StoredStatus},
};
use serde::{Deserialize, Serialize};

use crate::{
    database::Store,
    error::AppError,
    resume::serve_resume,
    state::AppState,
    utils::{client_address, validate_fingerprint},
};

type AppStateRef<S> = State<Arc<AppState<S>>>;

#[derive(Serialize)]
pub struct ChannelInfo {
    id: String,
    icon: String,
    order: usize,
    path: String,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|_| AppError::MalformedPayload)
}

pub async fn channels_handler<S: Store>(
    State(state): AppStateRef<S>,
) -> Json<Vec<ChannelInfo>> {
    Json(
        state
            .registry
            .channels()
            .iter()
            .map(|channel| ChannelInfo {
                id: channel.id.clone(),
                icon: channel.icon.clone(),
                order: channel.order,
                path: channel.path(),
            })
            .collect(),
    )
}

pub async fn list_entries_handler<S: Store>(
    State(state): AppStateRef<S>,
) -> Json<Vec<EntryView>> {
    Json(state.guestbook.list_entries().await.to_vec())
}

pub async fn eligibility_handler<S: Store>(
    State(state): AppStateRef<S>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<EligibilityRequest>, JsonRejection>,
) -> Result<Json<Eligibility>, AppError> {
    let request = body(payload)?;
    validate_fingerprint(&request.fingerprint)?;

    let address = client_address(&headers, Some(peer));

    Ok(Json(
        state
            .guestbook
            .check_eligibility(&request.fingerprint, &address)
            .await,
    ))
}

pub async fn create_entry_handler<S: Store>(
    State(state): AppStateRef<S>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<Created>, AppError> {
    let entry = body(payload)?;
    let address = client_address(&headers, Some(peer));

    let entry_id = state
        .guestbook
        .submit_entry(&entry.message, &entry.fingerprint, &address)
        .await?;

    Ok(Json(Created {
        success: true,
        entry_id,
    }))
}

pub async fn delete_entry_handler<S: Store>(
    State(state): AppStateRef<S>,
    Path(id): Path<String>,
    payload: Result<Json<DeleteEntry>, JsonRejection>,
) -> Result<Json<Outcome>, AppError> {
    let request = body(payload)?;

    state
        .guestbook
        .delete_entry(&id, &request.fingerprint)
        .await?;

    Ok(Json(Outcome {
        success: true,
        error: None,
    }))
}

pub async fn now_playing_handler<S: Store>(
    State(state): AppStateRef<S>,
) -> Json<Option<Track>> {
    Json(state.now_playing.current_or_recent().await)
}

pub async fn status_health_handler<S: Store>(State(state): AppStateRef<S>) -> Json<Health> {
    Json(state.device_status.health())
}

pub async fn status_ingest_handler<S: Store>(
    State(state): AppStateRef<S>,
    payload: Result<Json<StatusSnapshot>, JsonRejection>,
) -> Result<Json<StatusReceipt>, AppError> {
    let snapshot = body(payload)?;

    Ok(Json(state.device_status.ingest(snapshot).await?))
}

pub async fn status_history_handler<S: Store>(
    State(state): AppStateRef<S>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<StoredStatus>> {
    Json(state.device_status.latest(query.limit).await)
}

pub async fn resume_handler<S: Store>(State(state): AppStateRef<S>) -> Response {
    serve_resume(&state.config.resume_path, &state.config.resume_filename).await
}
