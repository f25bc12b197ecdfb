//! Integration tests for the generative review adapter against a mock server.

use httpmock::prelude::*;
use serde_json::json;

use codequal::ai::{AiCredentials, AiReview, AiReviewer};
use codequal::{AnalyzerConfig, CodeAnalyzer};

fn reviewer_for(server: &MockServer) -> AiReviewer {
    AiReviewer::new(AiCredentials {
        api_key: "test-key".to_string(),
        endpoint: server.url("/v1/models/review:generate"),
    })
}

/// A generative-endpoint reply carrying the given candidate text.
fn candidate_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}]}}
        ]
    })
}

#[tokio::test]
async fn test_missing_credential_makes_no_network_calls() {
    let server = MockServer::start_async().await;
    let catch_all = server.mock(|_when, then| {
        then.status(200);
    });

    let analyzer = CodeAnalyzer::new(AnalyzerConfig::default());
    let error = analyzer
        .analyze_with_ai("print('x')\n", "snippet.py")
        .await
        .expect_err("must fail without an API key");

    assert!(error.error.starts_with("API key is required"));
    assert_eq!(catch_all.hits_async().await, 0);
}

#[tokio::test]
async fn test_fenced_json_parsed_despite_trailing_prose() {
    let server = MockServer::start_async().await;

    let text = "Here is my review:\n```json\n{\"issues\": [{\"line\": 2, \"message\": \"use logging\", \"severity\": \"warning\", \"type\": \"code_smell\"}], \"suggestions\": [\"add tests\"], \"summary\": \"mostly fine\"}\n```\nHappy to elaborate on any point.";
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/models/review:generate")
            .query_param("key", "test-key");
        then.status(200).json_body(candidate_reply(text));
    });

    let review = reviewer_for(&server)
        .review("print('x')\n", "snippet.py")
        .await
        .expect("review should succeed");

    match review {
        AiReview::Structured(value) => {
            assert_eq!(value["issues"].as_array().unwrap().len(), 1);
            assert_eq!(value["summary"], "mostly fine");
        }
        AiReview::Raw(_) => panic!("expected structured review"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bare_issues_object_parsed() {
    let server = MockServer::start_async().await;

    let text = r#"{"issues": [], "suggestions": ["split the function"], "summary": "ok"}"#;
    server.mock(|when, then| {
        when.method(POST).path("/v1/models/review:generate");
        then.status(200).json_body(candidate_reply(text));
    });

    let review = reviewer_for(&server)
        .review("x = 1\n", "snippet.py")
        .await
        .expect("review should succeed");

    match review {
        AiReview::Structured(value) => assert_eq!(value["summary"], "ok"),
        AiReview::Raw(_) => panic!("expected structured review"),
    }
}

#[tokio::test]
async fn test_unstructured_reply_falls_back_to_raw() {
    let server = MockServer::start_async().await;

    let text = "The code generally looks clean and well organized.";
    server.mock(|when, then| {
        when.method(POST).path("/v1/models/review:generate");
        then.status(200).json_body(candidate_reply(text));
    });

    let review = reviewer_for(&server)
        .review("x = 1\n", "snippet.py")
        .await
        .expect("fallback is not a failure");

    match review {
        AiReview::Raw(raw) => {
            assert_eq!(raw.raw_response, text);
            assert!(raw.issues.is_empty());
            assert_eq!(
                raw.suggestions,
                vec!["Unable to parse AI response as JSON".to_string()]
            );
            assert_eq!(
                raw.summary,
                "AI analysis completed but results could not be structured properly."
            );
        }
        AiReview::Structured(_) => panic!("expected raw fallback"),
    }
}

#[tokio::test]
async fn test_api_error_status_surfaced() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(POST).path("/v1/models/review:generate");
        then.status(429).body("quota exceeded");
    });

    let analyzer = CodeAnalyzer::with_backends(None, Some(reviewer_for(&server)));
    let error = analyzer
        .analyze_with_ai("x = 1\n", "snippet.py")
        .await
        .expect_err("non-success status must be an error");

    assert_eq!(error.error, "API error: 429");
    assert_eq!(error.message, "quota exceeded");
}

#[tokio::test]
async fn test_empty_candidates_reported_as_ai_failure() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(POST).path("/v1/models/review:generate");
        then.status(200).json_body(json!({"candidates": []}));
    });

    let analyzer = CodeAnalyzer::with_backends(None, Some(reviewer_for(&server)));
    let error = analyzer
        .analyze_with_ai("x = 1\n", "snippet.py")
        .await
        .expect_err("empty reply must be an error");

    assert_eq!(error.error, "Failed to analyze with AI");
}

#[tokio::test]
async fn test_prompt_carries_source_and_schema() {
    let server = MockServer::start_async().await;

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/models/review:generate")
            .body_contains("print('needle')")
            .body_contains("suggestions");
        then.status(200)
            .json_body(candidate_reply("{\"issues\": [], \"summary\": \"ok\"}"));
    });

    reviewer_for(&server)
        .review("print('needle')\n", "snippet.py")
        .await
        .expect("review should succeed");

    mock.assert_async().await;
}
