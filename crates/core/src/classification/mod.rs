//! Product category suggestions.
//!
//! A listing's title, description and image are sent to a generative model
//! that must pick one of the existing categories. Suggestions are advisory:
//! callers spawn the request and carry on, and failures only reach the log.

pub mod error;
pub mod gemini;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use error::ClassifierError;
pub use gemini::GeminiClassifier;
pub use prompt::{build_prompt, parse_category_response};

/// Product data offered to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    /// Listing title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Image bytes; empty when the listing has no image.
    pub image: Vec<u8>,
    /// MIME type of `image`.
    pub mime_type: String,
}

impl ProductListing {
    /// Creates a listing.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        image: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description,
            image,
            mime_type: mime_type.into(),
        }
    }
}

/// Picks one category for a listing out of `candidates`.
#[async_trait]
pub trait CategoryClassifier: Send + Sync {
    /// Returns the chosen category, spelled as in `candidates`.
    async fn classify(
        &self,
        listing: &ProductListing,
        candidates: &[String],
    ) -> Result<String, ClassifierError>;
}

/// Runs a classification on a background task.
///
/// The handle resolves to `None` when classification failed; the failure is logged.
pub fn spawn_classification(
    classifier: Arc<dyn CategoryClassifier>,
    listing: ProductListing,
    candidates: Vec<String>,
) -> JoinHandle<Option<String>> {
    tokio::spawn(async move {
        match classifier.classify(&listing, &candidates).await {
            Ok(category) => {
                debug!(title = %listing.title, %category, "category suggested");
                Some(category)
            }
            Err(e) => {
                warn!(title = %listing.title, error = %e, "classification failed");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(Option<&'static str>);

    #[async_trait]
    impl CategoryClassifier for FixedClassifier {
        async fn classify(
            &self,
            _listing: &ProductListing,
            candidates: &[String],
        ) -> Result<String, ClassifierError> {
            let answer = self.0.ok_or(ClassifierError::NotConfigured)?;
            parse_category_response(&format!(r#"{{"categoryName": "{answer}"}}"#), candidates)
        }
    }

    fn listing() -> ProductListing {
        ProductListing::new("Kettle", Some("1.7L".into()), vec![1, 2, 3], "image/jpeg")
    }

    #[tokio::test]
    async fn test_spawned_classification_returns_category() {
        let handle = spawn_classification(
            Arc::new(FixedClassifier(Some("Home"))),
            listing(),
            vec!["Home".into(), "Toys".into()],
        );
        assert_eq!(handle.await.unwrap(), Some("Home".to_string()));
    }

    #[tokio::test]
    async fn test_spawned_classification_swallows_failure() {
        let handle = spawn_classification(
            Arc::new(FixedClassifier(None)),
            listing(),
            vec!["Home".into()],
        );
        assert_eq!(handle.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_answer_outside_candidates_is_discarded() {
        let handle = spawn_classification(
            Arc::new(FixedClassifier(Some("Garden"))),
            listing(),
            vec!["Home".into()],
        );
        assert_eq!(handle.await.unwrap(), None);
    }
}
