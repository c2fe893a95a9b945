use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use timetable_parser::{parse_calendar, Calendar, ParseError};

use crate::cli::SummarySource;
use crate::composer::{Composer, FALLBACK_MESSAGE};
use crate::prompt::TimetableSource;
use crate::session::{Session, SessionId, Sessions};

const UPLOADED_MESSAGE: &str =
    "Timetable uploaded successfully. You can now ask questions about your schedule.";

#[derive(Clone)]
pub struct AppState {
    pub composer: Composer,
    pub sessions: Arc<Sessions>,
    pub summary_source: SummarySource,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/timetable", post(handle_upload))
        .route("/ask", post(handle_ask))
        .route("/events", post(handle_events))
        .route("/session", delete(handle_end_session))
        .fallback(|| async { Redirect::permanent(env!("CARGO_PKG_REPOSITORY")) })
        .with_state(state)
}

#[derive(Deserialize)]
struct SessionQuery {
    session: Option<SessionId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session: SessionId,
    pub events: usize,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub session: SessionId,
    pub question: String,
}

/// One question and the answer shown for it.
#[derive(Debug, Serialize, Deserialize)]
pub struct QaExchange {
    pub question: String,
    pub answer: String,
}

fn unreadable(err: &ParseError) -> Response {
    tracing::info!("rejected timetable: {err}");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Could not read this file: {err}"),
    )
        .into_response()
}

async fn handle_upload(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Response {
    let calendar = match parse_calendar(&body) {
        Ok(calendar) => calendar,
        Err(err) => return unreadable(&err),
    };

    let source = match state.summary_source {
        SummarySource::Raw => TimetableSource::Raw(&body),
        SummarySource::Events => TimetableSource::Events(&calendar),
    };

    let narrative = match state.composer.try_summarize(source).await {
        Ok(narrative) => narrative,
        Err(err) => {
            tracing::warn!("summary failed: {err}");
            return (StatusCode::BAD_GATEWAY, FALLBACK_MESSAGE).into_response();
        }
    };

    let id = query.session.unwrap_or_else(SessionId::generate);
    let events = calendar.events.len();

    Arc::clone(&state.sessions)
        .insert(id, Session::new(narrative, events))
        .await;

    let active = state.sessions.len().await;
    tracing::info!(session = %id, events, active, "timetable uploaded");

    Json(UploadResponse {
        session: id,
        events,
        message: UPLOADED_MESSAGE.to_string(),
    })
    .into_response()
}

async fn handle_ask(State(state): State<AppState>, Json(request): Json<AskRequest>) -> Response {
    let question = request.question.trim();
    if question.is_empty() {
        return (StatusCode::BAD_REQUEST, "Question must not be empty").into_response();
    }

    let Some(session) = state.sessions.get(&request.session).await else {
        return (
            StatusCode::NOT_FOUND,
            "Unknown session, upload a timetable first",
        )
            .into_response();
    };

    let Some(_in_flight) = session.try_begin() else {
        return (
            StatusCode::CONFLICT,
            "A question is already being answered for this session",
        )
            .into_response();
    };

    let (status, answer) = match state
        .composer
        .try_answer(question, Some(session.narrative()))
        .await
    {
        Ok(answer) => (StatusCode::OK, answer),
        Err(err) => {
            tracing::warn!(session = %request.session, "answer failed: {err}");
            (StatusCode::BAD_GATEWAY, FALLBACK_MESSAGE.to_string())
        }
    };

    (
        status,
        Json(QaExchange {
            question: question.to_string(),
            answer,
        }),
    )
        .into_response()
}

async fn handle_events(body: String) -> Response {
    match parse_calendar(&body) {
        Ok(Calendar { events, .. }) => Json(events).into_response(),
        Err(err) => unreadable(&err),
    }
}

async fn handle_end_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> StatusCode {
    let Some(id) = query.session else {
        return StatusCode::BAD_REQUEST;
    };

    if state.sessions.remove(&id).await {
        tracing::info!(session = %id, "session ended");
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
