use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateField, CandidateRecord, Position, PrimaryTech, Region};
use crate::models::session::{ChatMessage, Session, Step};
use crate::screening::dialogue::{TurnInput, TurnOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: Step,
    pub step_id: u8,
    pub messages: Vec<ChatMessage>,
    pub candidate: CandidateRecord,
    /// Next candidate field the dialogue will collect.
    pub awaiting: Option<CandidateField>,
    pub questions: Vec<String>,
    pub q_index: usize,
    pub tech_confirmed: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            step: session.step,
            step_id: session.step.id(),
            messages: session.messages().to_vec(),
            candidate: session.candidate.clone(),
            awaiting: session.candidate.next_field(),
            questions: session.questions().to_vec(),
            q_index: session.q_index(),
            tech_confirmed: session.tech_confirmed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    pub step: Step,
    pub step_id: u8,
    /// Assistant messages appended by this turn, in order.
    pub replies: Vec<String>,
}

impl TurnResponse {
    fn new(session_id: Uuid, outcome: TurnOutcome) -> Self {
        Self {
            session_id,
            step: outcome.step,
            step_id: outcome.step.id(),
            replies: outcome.replies,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub position: Position,
}

#[derive(Debug, Deserialize)]
pub struct RegionRequest {
    pub region: Region,
}

#[derive(Debug, Deserialize)]
pub struct TechStackRequest {
    pub primary: PrimaryTech,
    #[serde(default)]
    pub extras: String,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub positions: Vec<Position>,
    pub regions: Vec<Region>,
    pub primary_tech: Vec<PrimaryTech>,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<CandidateRecord>,
    /// Stored entries that could not be decrypted or parsed.
    pub skipped_entries: usize,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

async fn run_turn(
    state: &AppState,
    id: Uuid,
    input: TurnInput,
) -> Result<Json<TurnResponse>, AppError> {
    let handle = state.sessions.get(id).await.ok_or_else(|| not_found(id))?;
    let mut session = handle.lock().await;
    let outcome = state.engine.handle(&mut session, input).await?;
    Ok(Json(TurnResponse::new(session.id, outcome)))
}

/// GET /api/v1/options
pub async fn handle_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        positions: Position::ALL.to_vec(),
        regions: Region::ALL.to_vec(),
        primary_tech: PrimaryTech::ALL.to_vec(),
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let mut session = Session::new();
    state.engine.start(&mut session);
    let view = SessionView::from(&session);
    state.sessions.create(session).await;
    info!("Session {} created", view.session_id);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await.ok_or_else(|| not_found(id))?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.destroy(id).await {
        return Err(not_found(id));
    }
    info!("Session {id} destroyed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnResponse>, AppError> {
    let handle = state.sessions.get(id).await.ok_or_else(|| not_found(id))?;
    let mut session = handle.lock().await;
    let outcome = state.engine.reset(&mut session);
    Ok(Json(TurnResponse::new(session.id, outcome)))
}

/// POST /api/v1/sessions/:id/messages
pub async fn handle_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    run_turn(&state, id, TurnInput::text(req.content)).await
}

/// POST /api/v1/sessions/:id/position
pub async fn handle_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PositionRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    run_turn(
        &state,
        id,
        TurnInput::Position {
            position: req.position,
        },
    )
    .await
}

/// POST /api/v1/sessions/:id/region
pub async fn handle_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegionRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    run_turn(&state, id, TurnInput::Region { region: req.region }).await
}

/// POST /api/v1/sessions/:id/tech-stack
pub async fn handle_tech_stack(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TechStackRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    run_turn(
        &state,
        id,
        TurnInput::TechStack {
            primary: req.primary,
            extras: req.extras,
        },
    )
    .await
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let store = state.store.clone();
    let report = tokio::task::spawn_blocking(move || store.load_report())
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(Json(CandidateListResponse {
        candidates: report.records,
        skipped_entries: report.skipped,
    }))
}
