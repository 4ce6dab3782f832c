//! End-to-end router tests: request/response shapes, session cookie flow,
//! validation errors, limit clamping, and degraded-service behavior.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use generation::UNCONFIGURED_REPLY;
use studyhub_server::routes::chat::UNKNOWN_QUICK_TYPE_REPLY;
use studyhub_server::routes::router;
use studyhub_server::session::SESSION_COOKIE;

fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.split(';').next())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, cookie, body)
}

#[tokio::test]
async fn chat_happy_path_increments_conversation_id() {
    let (state, _) = common::test_state("Practice a little every day.");
    let app = router(state);

    let (status, cookie, body) = send(
        &app,
        post_json(
            "/api/chat",
            json!({"message": "How do I study for a math test?"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["response"].as_str().unwrap().is_empty());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["conversation_id"], 0);

    // A fresh session gets its cookie; the second call on it moves to id 1.
    let cookie = cookie.expect("first response sets the session cookie");
    assert!(cookie.starts_with(SESSION_COOKIE));

    let (status, second_cookie, body) = send(
        &app,
        post_json("/api/chat", json!({"message": "And for biology?"}), Some(&cookie)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation_id"], 1);
    assert!(second_cookie.is_none(), "existing session is not re-issued");
}

#[tokio::test]
async fn chat_without_message_is_bad_request() {
    let (state, _) = common::test_state("irrelevant");
    let app = router(state);

    let (status, _, body) = send(&app, post_json("/api/chat", json!({}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn chat_with_blank_message_is_bad_request() {
    let (state, _) = common::test_state("irrelevant");
    let app = router(state);

    let (status, _, body) =
        send(&app, post_json("/api/chat", json!({"message": "   "}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unconfigured_generation_still_answers() {
    let app = router(common::unconfigured_state());

    let (status, _, body) = send(
        &app,
        post_json("/api/chat", json!({"message": "hello"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], UNCONFIGURED_REPLY);
}

#[tokio::test]
async fn history_returns_paired_summaries() {
    let (state, _) = common::test_state("Answer.");
    let app = router(state);

    let (_, cookie, _) = send(
        &app,
        post_json("/api/chat", json!({"message": "first question"}), None),
    )
    .await;
    let cookie = cookie.unwrap();
    send(
        &app,
        post_json("/api/chat", json!({"message": "second question"}), Some(&cookie)),
    )
    .await;

    let (status, _, body) = send(&app, get("/api/chat/history", Some(&cookie))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_conversations"], 2);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["user_message"], "first question");
    assert_eq!(history[0]["bot_response"], "Answer.");
    assert_eq!(history[0]["preview"], "first question");
    assert!(history[0]["timestamp"].is_string());
    assert_eq!(history[1]["id"], 1);
}

#[tokio::test]
async fn quick_response_known_type_echoes_type() {
    let (state, _) = common::test_state("Here are some tips.");
    let app = router(state);

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/chat/quick-response",
            json!({"type": "study_tips", "subject": "history"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Here are some tips.");
    assert_eq!(body["type"], "study_tips");
}

#[tokio::test]
async fn quick_response_unknown_type_uses_fallback() {
    let (state, _) = common::test_state("unused");
    let app = router(state);

    let (status, _, body) = send(
        &app,
        post_json("/api/chat/quick-response", json!({"type": "juggling"}), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], UNKNOWN_QUICK_TYPE_REPLY);
    assert_eq!(body["type"], "juggling");
}

#[tokio::test]
async fn quick_response_without_type_is_bad_request() {
    let (state, _) = common::test_state("unused");
    let app = router(state);

    let (status, _, _) = send(&app, post_json("/api/chat/quick-response", json!({}), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_knowledge_clamps_limit_to_ten() {
    let (state, retrieval) = common::test_state("unused");
    for i in 0..15 {
        assert!(retrieval
            .store_study_knowledge(
                &format!("Focus tip {i}"),
                "Remove distractions before studying.",
                "time_management",
                &["focus"],
            )
            .await
            .stored());
    }
    let app = router(state);

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/chat/search-knowledge",
            json!({"query": "focus", "limit": 20}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "focus");
    let results = body["results"].as_array().unwrap();
    assert!(results.len() <= 10);
    assert_eq!(body["total_found"], results.len());
}

#[tokio::test]
async fn search_knowledge_filters_category_and_shapes_results() {
    let (state, retrieval) = common::test_state("unused");
    retrieval
        .store_study_knowledge(
            "Pomodoro Technique for Students",
            "Work in 25-minute focused sessions.",
            "time_management",
            &["focus", "breaks"],
        )
        .await;
    retrieval
        .store_study_knowledge(
            "Growth Mindset",
            "Abilities can be developed.",
            "motivation",
            &["mindset"],
        )
        .await;
    let app = router(state);

    let (status, _, body) = send(
        &app,
        post_json(
            "/api/chat/search-knowledge",
            json!({"query": "focus", "category": "time_management"}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Pomodoro Technique for Students");
    assert_eq!(results[0]["category"], "time_management");
    assert_eq!(results[0]["tags"], json!(["focus", "breaks"]));
    // Fixed embeddings make the hit exact: similarity rounds to 1.0.
    assert_eq!(results[0]["similarity"], 1.0);
}

#[tokio::test]
async fn search_knowledge_without_query_is_bad_request() {
    let (state, _) = common::test_state("unused");
    let app = router(state);

    let (status, _, body) =
        send(&app, post_json("/api/chat/search-knowledge", json!({}), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn clear_history_resets_the_session() {
    let (state, _) = common::test_state("Answer.");
    let app = router(state);

    let (_, cookie, _) = send(
        &app,
        post_json("/api/chat", json!({"message": "remember me"}), None),
    )
    .await;
    let cookie = cookie.unwrap();

    let (status, _, body) = send(
        &app,
        post_json("/api/chat/clear-history", json!({}), Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("cleared"));

    let (_, _, body) = send(&app, get("/api/chat/history", Some(&cookie))).await;
    assert_eq!(body["total_conversations"], 0);

    // The next exchange starts counting from zero again.
    let (_, _, body) = send(
        &app,
        post_json("/api/chat", json!({"message": "fresh start"}), Some(&cookie)),
    )
    .await;
    assert_eq!(body["conversation_id"], 0);
}

#[tokio::test]
async fn status_reports_session_and_services() {
    let (state, _) = common::test_state("Answer.");
    let app = router(state);

    let (status, _, body) = send(&app, get("/api/chat/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gemini_configured"], true);
    assert_eq!(body["vector_db_available"], true);
    assert_eq!(body["session_active"], false);
    assert_eq!(body["conversation_count"], 0);

    let (_, cookie, _) = send(
        &app,
        post_json("/api/chat", json!({"message": "hello"}), None),
    )
    .await;
    let cookie = cookie.unwrap();

    let (_, _, body) = send(&app, get("/api/chat/status", Some(&cookie))).await;
    assert_eq!(body["session_active"], true);
    assert_eq!(body["conversation_count"], 1);
}

#[tokio::test]
async fn unconfigured_status_flags_degraded_generation() {
    let app = router(common::unconfigured_state());

    let (_, _, body) = send(&app, get("/api/chat/status", None)).await;
    assert_eq!(body["gemini_configured"], false);
}
