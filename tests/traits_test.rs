use std::sync::Arc;

use huginn::providers::LexiconClassifier;
use huginn::{Classification, HuginnError, SentimentClassifier, SentimentLabel};

// Test that the trait can be implemented with only the required methods
struct LengthClassifier;

#[async_trait::async_trait]
impl SentimentClassifier for LengthClassifier {
    fn name(&self) -> &str {
        "length"
    }

    async fn classify(&self, text: &str) -> huginn::Result<Classification> {
        if text == "fail" {
            return Err(HuginnError::InvalidInput("fail".into()));
        }
        let label = if text.len() > 5 { "positive" } else { "negative" };
        Ok(Classification::from_model_output(text, label, 1.0))
    }
}

#[tokio::test]
async fn test_default_classify_batch_preserves_order() {
    let classifier = LengthClassifier;
    let results = classifier
        .classify_batch(&["long enough", "tiny", "also long"])
        .await
        .unwrap();

    let labels: Vec<_> = results.iter().map(|r| r.label).collect();
    assert_eq!(
        labels,
        vec![
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Positive
        ]
    );
}

#[tokio::test]
async fn test_default_classify_batch_stops_on_error() {
    let classifier = LengthClassifier;
    let result = classifier.classify_batch(&["fine text", "fail", "more"]).await;
    assert!(matches!(result, Err(HuginnError::InvalidInput(_))));
}

#[tokio::test]
async fn test_shared_trait_object() {
    let classifiers: Vec<Arc<dyn SentimentClassifier>> =
        vec![Arc::new(LengthClassifier), Arc::new(LexiconClassifier::new())];

    let names: Vec<_> = classifiers.iter().map(|c| c.name().to_string()).collect();
    assert_eq!(names, vec!["length", "lexicon"]);

    for classifier in &classifiers {
        let result = classifier.classify("wonderful video").await.unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
    }
}
