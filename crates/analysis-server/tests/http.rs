//! End-to-end requests against a scripted engine executable.

#![cfg(unix)]

use analysis_server::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chess_analysis::{AnalysisService, EngineConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tower::ServiceExt;

/// A tiny UCI engine: always plays e2e4 unless the position is the
/// fool's-mate final position, where it reports checkmate.
const ENGINE_SCRIPT: &str = r#"#!/bin/sh
terminal=0
while read -r cmd; do
  case "$cmd" in
    uci)
      echo "id name Shellfish"
      echo "option name UCI_LimitStrength type check default false"
      echo "option name UCI_Elo type spin default 1320 min 1320 max 3190"
      echo "uciok" ;;
    isready) echo "readyok" ;;
    "position fen rnb1kbnr/"*) terminal=1 ;;
    position*) terminal=0 ;;
    go*)
      if [ "$terminal" = 1 ]; then
        echo "info depth 0 score mate 0"
        echo "bestmove (none)"
      else
        echo "info depth 1 seldepth 1 score cp 13 nodes 20 pv e2e4"
        echo "bestmove e2e4"
      fi ;;
    quit) exit 0 ;;
  esac
done
"#;

fn write_engine(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("shellfish");
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(ENGINE_SCRIPT.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

async fn post(app: axum::Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// One test per binary: a concurrently forked child could otherwise hold the
// script open for writing and make exec fail with ETXTBSY.
#[tokio::test]
async fn analyze_through_engine_process() {
    let dir = tempfile::tempdir().unwrap();
    let engine = write_engine(dir.path());
    let service = AnalysisService::new(EngineConfig::new(engine));
    let app = analysis_server::app(AppState::new(service, 15));

    let startpos = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let (status, body) = post(app.clone(), format!(r#"{{"fen": "{}", "depth": 1}}"#, startpos)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["best_move"], "e2e4");
    assert_eq!(body["score"], 13);
    assert_eq!(body["depth"], 1);

    let (status, body) = post(
        app.clone(),
        format!(r#"{{"fen": "{}", "uci_elo": 1500}}"#, startpos),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["best_move"], "e2e4");

    let fools_mate = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    let (status, body) = post(app, format!(r#"{{"fen": "{}", "depth": 10}}"#, fools_mate)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["best_move"], Value::Null);
    assert_eq!(body["score"], -100_000);
    assert_eq!(body["depth"], 0);
}
