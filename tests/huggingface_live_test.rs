//! Live tests against the hosted inference API.
//!
//! Run with: `HF_API_KEY=hf_... cargo test --test huggingface_live_test -- --ignored`
#![cfg(feature = "huggingface")]

use huginn::providers::HuggingFaceClassifier;
use huginn::{SentimentClassifier, SentimentLabel};

fn api_key() -> String {
    std::env::var("HF_API_KEY").expect("HF_API_KEY must be set for live tests")
}

#[tokio::test]
#[ignore]
async fn live_classify_batch() {
    let classifier = HuggingFaceClassifier::new(api_key()).unwrap();

    let results = classifier
        .classify_batch(&["I absolutely love this video!", "This is the worst upload ever."])
        .await
        .expect("live classification should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label, SentimentLabel::Positive);
    assert_eq!(results[1].label, SentimentLabel::Negative);
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
}

#[tokio::test]
#[ignore]
async fn live_multilingual() {
    let classifier = HuggingFaceClassifier::new(api_key()).unwrap();

    let result = classifier
        .classify("Me encanta este video, es increíble")
        .await
        .expect("live classification should succeed");

    assert_eq!(result.label, SentimentLabel::Positive);
}
