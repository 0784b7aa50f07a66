//! Wiremock integration tests for HuggingFaceClassifier.
//!
//! These tests verify correct HTTP interaction and error handling using mocked responses.
#![cfg(feature = "huggingface")]

use huginn::providers::HuggingFaceClassifier;
use huginn::{HuginnError, SentimentClassifier, SentimentLabel};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "cardiffnlp/twitter-xlm-roberta-base-sentiment";

/// Test a batch request returning every label's score per input.
#[tokio::test]
async fn test_classify_batch_all_scores() {
    let mock_server = MockServer::start().await;

    let response = serde_json::json!([
        [
            {"label": "positive", "score": 0.91},
            {"label": "neutral", "score": 0.06},
            {"label": "negative", "score": 0.03}
        ],
        [
            {"label": "negative", "score": 0.88},
            {"label": "neutral", "score": 0.10},
            {"label": "positive", "score": 0.02}
        ],
        [
            {"label": "neutral", "score": 0.70},
            {"label": "positive", "score": 0.20},
            {"label": "negative", "score": 0.10}
        ]
    ]);

    Mock::given(method("POST"))
        .and(path(format!("/models/{}", MODEL)))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(serde_json::json!({
            "inputs": ["I love this!", "This is terrible", "It's okay I guess"],
            "parameters": {"truncation": true, "max_length": 512},
            "options": {"wait_for_model": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let results = classifier
        .classify_batch(&["I love this!", "This is terrible", "It's okay I guess"])
        .await
        .expect("classify_batch should succeed");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].label, SentimentLabel::Positive);
    assert_eq!(results[0].text, "I love this!");
    assert!((results[0].score - 0.91).abs() < 0.001);
    assert_eq!(results[1].label, SentimentLabel::Negative);
    assert_eq!(results[2].label, SentimentLabel::Neutral);
}

/// Test the top-label-only response shape and SST-2 style labels.
#[tokio::test]
async fn test_classify_top_only_labels() {
    let mock_server = MockServer::start().await;
    let model = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

    Mock::given(method("POST"))
        .and(path(format!("/models/{}", model)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"label": "NEGATIVE", "score": 0.99}])),
        )
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri())
        .unwrap()
        .model(model);
    let result = classifier.classify("worst video ever").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Negative);
    assert_eq!(classifier.model_id(), model);
}

/// Unrecognised label names fall back to neutral.
#[tokio::test]
async fn test_unknown_label_is_neutral() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}", MODEL)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([[{"label": "LABEL_2", "score": 0.8}]])),
        )
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = classifier.classify("hmm").await.unwrap();
    assert_eq!(result.label, SentimentLabel::Neutral);
}

/// Custom max_length is sent with the request.
#[tokio::test]
async fn test_max_length_is_forwarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "parameters": {"truncation": true, "max_length": 128}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([[{"label": "positive", "score": 0.6}]])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri())
        .unwrap()
        .max_length(128);
    classifier.classify("nice").await.unwrap();
}

/// Empty batches never hit the network.
#[tokio::test]
async fn test_empty_batch_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let results = classifier.classify_batch(&[]).await.unwrap();
    assert!(results.is_empty());
}

/// A response with the wrong number of rows is a data error.
#[tokio::test]
async fn test_length_mismatch_is_data_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([[{"label": "positive", "score": 0.6}]])),
        )
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = classifier.classify_batch(&["one", "two"]).await;
    assert!(matches!(result, Err(HuginnError::DataError(_))));
}

/// Test 401 Unauthorized returns AuthenticationFailed error.
#[tokio::test]
async fn test_error_401_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{}", MODEL)))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("bad_key", mock_server.uri()).unwrap();
    let result = classifier.classify("hello").await;

    assert!(
        matches!(result, Err(HuginnError::AuthenticationFailed)),
        "expected AuthenticationFailed, got {:?}",
        result
    );
}

/// Test 404 Not Found returns ModelNotFound error.
#[tokio::test]
async fn test_error_404_model_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri())
        .unwrap()
        .model("nonexistent/model");
    let result = classifier.classify("hello").await;

    match result {
        Err(HuginnError::ModelNotFound(model)) => assert_eq!(model, "nonexistent/model"),
        other => panic!("expected ModelNotFound, got {:?}", other),
    }
}

/// Test 429 Too Many Requests returns RateLimited error with retry-after.
#[tokio::test]
async fn test_error_429_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = classifier.classify("hello").await;

    match result {
        Err(HuginnError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(30)));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

/// Test 503 Service Unavailable reports a loading model.
#[tokio::test]
async fn test_error_503_model_loading() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = classifier.classify("hello").await;

    match result {
        Err(HuginnError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("loading"));
        }
        other => panic!("expected Api 503, got {:?}", other),
    }
}

/// Test other server errors surface their status code.
#[tokio::test]
async fn test_error_500_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let classifier = HuggingFaceClassifier::with_base_url("test_key", mock_server.uri()).unwrap();
    let result = classifier.classify("hello").await;

    assert!(matches!(result, Err(HuginnError::Api { status: 500, .. })));
}
