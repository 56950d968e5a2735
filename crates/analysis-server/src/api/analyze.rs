//! Position analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chess_analysis::{AnalysisError, AnalysisParams, AnalysisResult, EngineLauncher};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::error_response;
use crate::AppState;

/// Body of `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Position in FEN notation.
    pub fen: String,
    /// Search depth; the server default applies when absent.
    #[serde(default)]
    pub depth: Option<u32>,
    /// Requested playing strength, applied if the engine supports it.
    #[serde(default)]
    pub uci_elo: Option<u32>,
    /// Optional time budget in milliseconds.
    #[serde(default)]
    pub movetime_ms: Option<u64>,
}

impl AnalyzeRequest {
    pub fn params(&self, default_depth: u32) -> AnalysisParams {
        AnalysisParams {
            depth: Some(self.depth.unwrap_or(default_depth)),
            strength: self.uci_elo,
            movetime: self.movetime_ms.map(Duration::from_millis),
        }
    }
}

/// Analysis response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeResponse {
    /// Best move in UCI notation; null when the side to move has none.
    pub best_move: Option<String>,
    /// Centipawns from White's side; forced mates are +/-100000.
    pub score: Option<i32>,
    /// Deepest depth the engine reported.
    pub depth: u32,
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            best_move: result.best_move,
            score: result.score,
            depth: result.depth_used,
        }
    }
}

/// Failures of `POST /analyze`, rendered as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Analysis(AnalysisError::EngineUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "analysis request failed");
        }
        error_response(status, self.to_string())
    }
}

/// POST /analyze
///
/// # Errors
/// * 400 Bad Request - malformed body, invalid FEN or out-of-range parameters
/// * 503 Service Unavailable - the engine could not be started
/// * 500 Internal Server Error - the engine failed during analysis
pub async fn analyze<L: EngineLauncher + 'static>(
    State(state): State<AppState<L>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    let params = request.params(state.default_depth);
    let result = state.service.analyze(&request.fen, &params).await?;
    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorBody;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use chess_analysis::{AnalysisService, EngineConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_without_engine() -> Router {
        let service = AnalysisService::new(EngineConfig::new("/nonexistent/stockfish"));
        crate::app(AppState::new(service, 15))
    }

    async fn post(app: Router, body: &str) -> (StatusCode, ErrorBody) {
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_request_defaults() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"fen": "8/8/8/8/8/8/8/8 w - - 0 1"}"#).unwrap();
        assert_eq!(request.depth, None);
        assert_eq!(request.uci_elo, None);

        let params = request.params(15);
        assert_eq!(params.depth, Some(15));
        assert_eq!(params.strength, None);
        assert_eq!(params.movetime, None);
    }

    #[test]
    fn test_request_params() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"fen": "x", "depth": 8, "uci_elo": 1600, "movetime_ms": 250}"#).unwrap();
        let params = request.params(15);
        assert_eq!(params.depth, Some(8));
        assert_eq!(params.strength, Some(1600));
        assert_eq!(params.movetime, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_response_serialization() {
        let response = AnalyzeResponse::from(AnalysisResult {
            best_move: Some("e2e4".to_string()),
            score: Some(31),
            depth_used: 12,
        });
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"best_move":"e2e4","score":31,"depth":12}"#);

        let terminal = AnalyzeResponse::from(AnalysisResult {
            best_move: None,
            score: Some(-100_000),
            depth_used: 0,
        });
        let json = serde_json::to_string(&terminal).unwrap();
        assert!(json.contains(r#""best_move":null"#));
    }

    #[tokio::test]
    async fn test_invalid_fen_is_bad_request() {
        let (status, body) = post(app_without_engine(), r#"{"fen": "not a fen"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.detail.starts_with("invalid position"), "{}", body.detail);
    }

    #[tokio::test]
    async fn test_depth_out_of_range_is_bad_request() {
        let startpos = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        for depth in [0, 31] {
            let body = format!(r#"{{"fen": "{}", "depth": {}}}"#, startpos, depth);
            let (status, error) = post(app_without_engine(), &body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(error.detail.contains("depth"), "{}", error.detail);
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, _) = post(app_without_engine(), r#"{"depth": 10}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(app_without_engine(), "{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_engine_is_service_unavailable() {
        let startpos = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let body = format!(r#"{{"fen": "{}", "depth": 5}}"#, startpos);
        let (status, error) = post(app_without_engine(), &body).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!error.detail.is_empty());
    }
}
