//! Structured result schema for crop disease detection.
//!
//! These are the value records the validator guarantees on success. Optional
//! fields serialize as omitted rather than `null` so the HTTP response only
//! carries what the model actually supplied.

use serde::{Deserialize, Serialize};

/// Basic information about the identified crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropBasicInfo {
    /// Name of the crop identified in the image.
    pub crop_name: String,
    /// Type or category of the crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    /// Current growth stage, if visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<String>,
    /// Overall health status of the crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,
}

/// One detected disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    /// Name of the disease.
    pub disease_name: String,
    /// Parts of the plant affected by the disease.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_areas: Option<Vec<String>>,
}

/// Treatment recommendations for the analysis.
///
/// The three required lists may be empty; the two optional lists are absent
/// when the model supplied nothing for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecommendation {
    /// Immediate actions to take.
    pub immediate_actions: Vec<String>,
    /// Preventive measures to avoid further spread.
    pub preventive_measures: Vec<String>,
    /// Treatment methods for the disease.
    pub treatment_methods: Vec<String>,
    /// Chemical treatment options, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemical_treatments: Option<Vec<String>>,
    /// Organic treatment options, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organic_treatments: Option<Vec<String>>,
}

/// The root result returned to callers.
///
/// Invariant: when `is_crop_image` is false, `crop_info`, `diseases`, and
/// `recommendations` are absent regardless of what the model returned, and
/// `analysis_summary` explains the rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDetectionResponse {
    /// Whether the uploaded image contains a crop.
    pub is_crop_image: bool,
    /// Basic information about the crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_info: Option<CropBasicInfo>,
    /// Diseases detected on the crop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diseases: Option<Vec<DiseaseInfo>>,
    /// Treatment recommendations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<TreatmentRecommendation>,
    /// Narrative summary of the analysis; never empty.
    pub analysis_summary: String,
    /// Model-reported confidence, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let response = CropDetectionResponse {
            is_crop_image: false,
            crop_info: None,
            diseases: None,
            recommendations: None,
            analysis_summary: "No plant visible.".to_string(),
            confidence_score: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("crop_info"));
        assert!(!obj.contains_key("diseases"));
        assert!(!obj.contains_key("recommendations"));
        assert!(!obj.contains_key("confidence_score"));
        assert_eq!(obj["is_crop_image"], serde_json::json!(false));
    }

    #[test]
    fn test_present_fields_round_trip() {
        let response = CropDetectionResponse {
            is_crop_image: true,
            crop_info: Some(CropBasicInfo {
                crop_name: "Tomato".to_string(),
                crop_type: Some("Vegetable".to_string()),
                growth_stage: None,
                health_status: Some("Poor".to_string()),
            }),
            diseases: Some(vec![DiseaseInfo {
                disease_name: "Late Blight".to_string(),
                affected_areas: Some(vec!["leaves".to_string()]),
            }]),
            recommendations: None,
            analysis_summary: "Late blight detected".to_string(),
            confidence_score: Some(0.92),
        };

        let json = serde_json::to_string(&response).unwrap();
        let back: CropDetectionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}
