//! Tests for the HTTP gateway and the client that talks to it.

#![cfg(unix)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{EMPTY_GAME, FIRST_X_DUMP, path_in, replying_oracle, script_oracle};
use http_body_util::BodyExt;
use std::time::Duration;
use strictly_connect_four::{
    Board, MoveRequest, MoveResult, Oracle, OracleError, SearchBudget, SentinelTable, Separator,
    Side, decode_with,
};
use strictly_connect_four_server::{
    ErrorResponse, HttpOracle, ProcessOracle, SolveResponse, router,
};
use tempfile::TempDir;
use tower::ServiceExt;

async fn get(oracle: ProcessOracle, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router(oracle)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("Valid request"))
        .await
        .expect("Router is infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Readable body")
        .to_bytes()
        .to_vec();
    (status, body)
}

#[tokio::test]
async fn test_index_page() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (status, body) = get(ProcessOracle::new(replying_oracle(&dir, "Draw")), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Connect-Four 6x7"));
}

#[tokio::test]
async fn test_first_move_adds_one_x() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let oracle = ProcessOracle::new(replying_oracle(&dir, FIRST_X_DUMP));

    let (status, body) = get(oracle, &format!("/solve/{}/x?num_try=7", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::OK);

    let reply: SolveResponse = serde_json::from_slice(&body).expect("JSON body");
    let board = decode_with(&reply.stdout, Separator::Newline).expect("Board dump");
    assert_eq!(board.count(Side::X), 1);
    assert_eq!(board.count(Side::O), 0);
    assert!(board.obeys_gravity());
}

#[tokio::test]
async fn test_sentinel_passes_through() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let oracle = ProcessOracle::new(replying_oracle(&dir, "O Win"));

    let (status, body) = get(oracle, &format!("/solve/{}/o", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::OK);

    let reply: SolveResponse = serde_json::from_slice(&body).expect("JSON body");
    assert_eq!(reply.stdout, "O Win");
}

#[tokio::test]
async fn test_shell_metacharacters_never_reach_oracle() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let marker = path_in(&dir, "spawned");
    let oracle = ProcessOracle::new(script_oracle(
        &dir,
        &format!("touch '{}'\nprintf 'Draw\\n'\n", marker.display()),
    ));
    let rejected = [
        "/solve/%27%3B%20touch%20pwned%3B%27/x".to_string(),
        "/solve/.......;.......;.......;.......;.......;......$/x".to_string(),
        format!("/solve/{}/x%3Brm", EMPTY_GAME),
        format!("/solve/{}/x?num_try=7%3Brm", EMPTY_GAME),
        format!("/solve/{}/x?num_try=0", EMPTY_GAME),
    ];

    for uri in rejected {
        let (status, body) = get(oracle.clone(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let error: ErrorResponse = serde_json::from_slice(&body).expect("JSON error");
        assert!(!error.error.is_empty());
    }
    assert!(!marker.exists(), "Oracle was spawned for a rejected request");
}

#[tokio::test]
async fn test_configured_default_budget_reaches_oracle() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let args_file = path_in(&dir, "args");
    let script = format!(
        "printf '%s\\n' \"$@\" > '{}'\ncat > /dev/null\nprintf 'Draw\\n'\n",
        args_file.display()
    );
    let oracle = ProcessOracle::new(script_oracle(&dir, &script).with_default_budget(5u32));

    let (status, _) = get(oracle.clone(), &format!("/solve/{}/x", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::OK);
    let args = std::fs::read_to_string(&args_file).expect("Script recorded args");
    assert_eq!(args, "--next\nx\n--num-try\n5\n");

    let (status, _) = get(oracle, &format!("/solve/{}/o?num_try=9", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::OK);
    let args = std::fs::read_to_string(&args_file).expect("Script recorded args");
    assert_eq!(args, "--next\no\n--num-try\n9\n");
}

#[tokio::test]
async fn test_garbage_reply_is_bad_gateway() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let oracle = ProcessOracle::new(replying_oracle(&dir, "thread main panicked"));

    let (status, body) = get(oracle, &format!("/solve/{}/x", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = serde_json::from_slice(&body).expect("JSON error");
    assert!(error.error.contains("panicked"));
}

#[tokio::test]
async fn test_crashed_oracle_is_bad_gateway() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let oracle = ProcessOracle::new(script_oracle(&dir, "exit 1\n"));

    let (status, _) = get(oracle, &format!("/solve/{}/x", EMPTY_GAME)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

async fn serve(oracle: ProcessOracle) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(oracle)).await;
    });
    format!("http://{}", addr)
}

fn first_move() -> MoveRequest {
    MoveRequest::new(Board::new(), Side::X, SearchBudget::new(7).expect("Valid budget"))
}

#[tokio::test]
async fn test_http_oracle_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let base_url = serve(ProcessOracle::new(replying_oracle(&dir, FIRST_X_DUMP))).await;
    let oracle = HttpOracle::new(&base_url, SentinelTable::default(), Duration::from_secs(10));

    let result = oracle.request(&first_move()).await.expect("Gateway reply");
    match result {
        MoveResult::BoardUpdate(board) => {
            assert_eq!(board.count(Side::X), 1);
            assert_eq!(board.column_height(3), 1);
        }
        other => panic!("Expected board update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_oracle_reports_gateway_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let base_url = serve(ProcessOracle::new(replying_oracle(&dir, "nonsense"))).await;
    let oracle = HttpOracle::new(&base_url, SentinelTable::default(), Duration::from_secs(10));

    let err = oracle.request(&first_move()).await.unwrap_err();
    match err {
        OracleError::Process(e) => assert!(e.message.contains("502"), "{}", e),
        other => panic!("Expected process error, got {}", other),
    }
}

#[tokio::test]
async fn test_http_oracle_maps_rejection_to_format_error() {
    let rejecting = axum::Router::new().route(
        "/solve/{game}/{next_player}",
        axum::routing::get(|| async {
            (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorResponse {
                    error: "side must be 'x' or 'o'".to_string(),
                }),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Bound address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, rejecting).await;
    });

    let oracle = HttpOracle::new(
        format!("http://{}", addr),
        SentinelTable::default(),
        Duration::from_secs(10),
    );
    let err = oracle.request(&first_move()).await.unwrap_err();
    match err {
        OracleError::Format(e) => assert!(e.message.contains("side must be"), "{}", e),
        other => panic!("Expected format error, got {}", other),
    }
}

#[test]
fn test_http_oracle_url() {
    let oracle = HttpOracle::new(
        "http://localhost:3000/",
        SentinelTable::default(),
        Duration::from_secs(1),
    );
    assert_eq!(
        oracle.solve_url(&first_move()),
        format!("http://localhost:3000/solve/{}/x?num_try=7", EMPTY_GAME)
    );
}
