//! The detection orchestrator.
//!
//! Sequences prompt → external call → extraction → validation. Each stage
//! failure short-circuits the rest and surfaces as exactly one error; no
//! retries happen here. The pipeline holds no cross-request state, so one
//! detector can serve any number of concurrent requests.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::extract::extract_json;
use crate::prompt::detection_prompt;
use crate::schema::CropDetectionResponse;
use crate::traits::VisionClient;
use crate::validate::validate;

/// Orchestrates one crop disease detection per call.
#[derive(Clone)]
pub struct CropDetector {
    client: Arc<dyn VisionClient>,
}

impl CropDetector {
    /// Create a detector around a vision client.
    pub fn new(client: Arc<dyn VisionClient>) -> Self {
        Self { client }
    }

    /// Run the full pipeline for one base64-encoded image.
    ///
    /// Empty input fails with [`Error::Input`] before the external model is
    /// ever called. "Not a crop" is not an error: it comes back as a valid
    /// result with `is_crop_image = false`.
    pub async fn detect(&self, image_base64: &str) -> Result<CropDetectionResponse> {
        if image_base64.trim().is_empty() {
            return Err(Error::input("image data cannot be empty"));
        }

        tracing::debug!(image_len = image_base64.len(), "Starting crop disease detection");

        let reply = self.client.analyze(image_base64, detection_prompt()).await?;
        tracing::debug!(reply_len = reply.len(), "Vision model replied");

        let payload = extract_json(&reply)?;
        let result = validate(&payload)?;

        tracing::info!(
            is_crop_image = result.is_crop_image,
            diseases = result.diseases.as_ref().map(Vec::len).unwrap_or(0),
            "Crop disease detection completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockVisionClient;

    const FULL_REPLY: &str = r#"```json
{
    "is_crop_image": true,
    "crop_info": {"crop_name": "Tomato"},
    "diseases": [{"disease_name": "Late Blight", "affected_areas": ["leaves"]}],
    "recommendations": {
        "immediate_actions": ["remove affected leaves"],
        "preventive_measures": ["improve spacing"],
        "treatment_methods": ["fungicide"]
    },
    "analysis_summary": "Late blight detected"
}
```"#;

    #[tokio::test]
    async fn test_empty_input_never_calls_the_model() {
        let mock = Arc::new(MockVisionClient::new(FULL_REPLY));
        let detector = CropDetector::new(mock.clone());

        let err = detector.detect("   ").await.unwrap_err();
        assert!(matches!(err, Error::Input(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_pipeline() {
        let detector = CropDetector::new(Arc::new(MockVisionClient::new(FULL_REPLY)));

        let result = detector.detect("aW1hZ2U=").await.unwrap();
        assert!(result.is_crop_image);
        assert_eq!(result.crop_info.unwrap().crop_name, "Tomato");
        assert_eq!(result.diseases.unwrap()[0].disease_name, "Late Blight");
        assert!(result.recommendations.is_some());
    }

    #[tokio::test]
    async fn test_rejection_reply_is_a_normal_result() {
        let reply = "```json\n{\"is_crop_image\": false, \"analysis_summary\": \"no plant visible\"}\n```";
        let detector = CropDetector::new(Arc::new(MockVisionClient::new(reply)));

        let result = detector.detect("aW1hZ2U=").await.unwrap();
        assert!(!result.is_crop_image);
        assert_eq!(result.analysis_summary, "no plant visible");
        assert!(result.crop_info.is_none());
        assert!(result.diseases.is_none());
        assert!(result.recommendations.is_none());
    }

    #[tokio::test]
    async fn test_external_failure_short_circuits() {
        let detector = CropDetector::new(Arc::new(MockVisionClient::failing(
            Error::connection_failed("timed out"),
        )));

        let err = detector.detect("aW1hZ2U=").await.unwrap_err();
        assert!(matches!(err, Error::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_prose_reply_is_an_extraction_error() {
        let detector = CropDetector::new(Arc::new(MockVisionClient::new(
            "I cannot analyze this image.",
        )));

        let err = detector.detect("aW1hZ2U=").await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_extraction_error() {
        let detector = CropDetector::new(Arc::new(MockVisionClient::new("")));

        let err = detector.detect("aW1hZ2U=").await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_validation_error() {
        let reply = r#"{"is_crop_image": true, "diseases": [{"affected_areas": ["stem"]}]}"#;
        let detector = CropDetector::new(Arc::new(MockVisionClient::new(reply)));

        let err = detector.detect("aW1hZ2U=").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { ref field, .. } if field == "diseases[0].disease_name"
        ));
    }
}
