//! HTTP gateway in front of the process oracle.
//!
//! - `GET /` serves the host page.
//! - `GET /solve/{game}/{next_player}?num_try={n}` validates the request,
//!   runs the oracle once and returns `{ "stdout", "stderr" }`.

use crate::process_oracle::ProcessOracle;
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strictly_connect_four::{
    FormatError, MoveRequest, ParseError, ProcessError, SearchBudget, classify_reply,
};
use tower::ServiceBuilder;
use tracing::{info, instrument, warn};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Connect-Four 6x7</title></head>
  <body>
    <h1>Connect-Four 6x7</h1>
    <p>Ask the engine for a move with
      <code>GET /solve/{rows joined by ';'}/{x|o}?num_try={budget}</code>.</p>
    <p>Example: <a href="/solve/.......;.......;.......;.......;.......;......./x?num_try=7">
      first move for x</a></p>
  </body>
</html>
"#;

/// Query string of `/solve`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveParams {
    /// Search budget, parsed and bounded by the handler.
    pub num_try: Option<String>,
}

/// Body of a successful `/solve` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// Board dump (rows joined by newlines) or a terminal sentinel.
    pub stdout: String,
    /// Oracle diagnostics.
    #[serde(default)]
    pub stderr: String,
}

/// Body of a failed `/solve` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Failure while serving `/solve`.
#[derive(Debug, Display, Error, From)]
pub enum GatewayError {
    /// Rejected before the oracle was started.
    #[display("{}", _0)]
    Format(FormatError),
    /// The oracle failed to produce output.
    #[display("{}", _0)]
    Process(ProcessError),
    /// The oracle's output could not be classified.
    #[display("{}", _0)]
    Parse(ParseError),
}

impl GatewayError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Format(_) => StatusCode::BAD_REQUEST,
            GatewayError::Process(_) | GatewayError::Parse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let error = match &self {
            GatewayError::Format(e) => e.message.clone(),
            GatewayError::Process(e) => e.message.clone(),
            GatewayError::Parse(e) => format!("{}: {:?}", e.message, e.reply),
        };
        (self.status(), Json(ErrorResponse { error })).into_response()
    }
}

/// Shared, read-only gateway state.
#[derive(Debug, Clone)]
pub struct GatewayState {
    oracle: Arc<ProcessOracle>,
    default_budget: SearchBudget,
}

/// Builds the gateway router.
///
/// Requests without `num_try` use the oracle's configured `default_budget`.
#[instrument(skip(oracle))]
pub fn router(oracle: ProcessOracle) -> Router {
    let default_budget = oracle.config().search_budget().unwrap_or_else(|e| {
        warn!(error = %e, "Invalid default budget, using {}", SearchBudget::DEFAULT);
        SearchBudget::default()
    });
    let state = GatewayState {
        oracle: Arc::new(oracle),
        default_budget,
    };
    Router::new()
        .route("/", get(index))
        .route("/solve/{game}/{next_player}", get(solve))
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[instrument(skip(state, params), fields(num_try = ?params.num_try))]
async fn solve(
    State(state): State<GatewayState>,
    Path((game, next_player)): Path<(String, String)>,
    Query(params): Query<SolveParams>,
) -> Result<Json<SolveResponse>, GatewayError> {
    let request = MoveRequest::from_wire_or(
        &game,
        &next_player,
        params.num_try.as_deref(),
        state.default_budget,
    )
    .inspect_err(|e| warn!(error = %e, "Rejected solve request"))?;

    let reply = state.oracle.run(&request).await?;
    let result = classify_reply(reply.stdout(), state.oracle.sentinels())?;
    info!(?result, "Solve completed");

    Ok(Json(SolveResponse {
        stdout: reply.stdout().clone(),
        stderr: reply.stderr().clone(),
    }))
}
