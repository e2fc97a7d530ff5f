//! Validation and normalization of untrusted model payloads.
//!
//! The source of the payload is a generative model, not a contract-bound API:
//! extra keys, missing keys, and wrong types are all expected. Validation is
//! a single pass of explicit per-field checks; on success the result is fully
//! schema-conformant, on failure the error names the exact field path. A
//! malformed required field anywhere fails the whole response rather than
//! being dropped per sub-object.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::extract::{json_type_name, JsonMap};
use crate::schema::{CropBasicInfo, CropDetectionResponse, DiseaseInfo, TreatmentRecommendation};

/// Summary substituted when the model rejects the image without explanation.
const NOT_CROP_SUMMARY: &str = "Image does not appear to contain crops.";
/// Summary substituted when the model analyzes a crop but omits the narrative.
const DEFAULT_SUMMARY: &str = "Analysis completed successfully.";

/// Validate a parsed payload into a [`CropDetectionResponse`].
///
/// `is_crop_image` defaults to false when absent or not a boolean; the false
/// branch returns immediately without looking at the crop, disease, or
/// recommendation sections, so garbage there cannot leak into a rejection
/// result.
pub fn validate(payload: &JsonMap) -> Result<CropDetectionResponse> {
    let is_crop_image = payload
        .get("is_crop_image")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let confidence_score = optional_number(payload, "confidence_score")?;

    if !is_crop_image {
        return Ok(CropDetectionResponse {
            is_crop_image: false,
            crop_info: None,
            diseases: None,
            recommendations: None,
            analysis_summary: summary_or(payload, NOT_CROP_SUMMARY)?,
            confidence_score,
        });
    }

    let crop_info = match payload.get("crop_info") {
        Some(Value::Object(map)) if !map.is_empty() => Some(parse_crop_info(map)?),
        Some(Value::Object(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            return Err(Error::validation(
                "crop_info",
                format!("expected an object, got {}", json_type_name(other)),
            ))
        }
    };

    let diseases = match payload.get("diseases") {
        Some(Value::Array(entries)) if !entries.is_empty() => {
            let mut parsed = Vec::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                parsed.push(parse_disease(index, entry)?);
            }
            Some(parsed)
        }
        Some(Value::Array(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            return Err(Error::validation(
                "diseases",
                format!("expected an array, got {}", json_type_name(other)),
            ))
        }
    };

    let recommendations = match payload.get("recommendations") {
        Some(Value::Object(map)) if !map.is_empty() => Some(parse_recommendations(map)?),
        Some(Value::Object(_)) | Some(Value::Null) | None => None,
        Some(other) => {
            return Err(Error::validation(
                "recommendations",
                format!("expected an object, got {}", json_type_name(other)),
            ))
        }
    };

    Ok(CropDetectionResponse {
        is_crop_image: true,
        crop_info,
        diseases,
        recommendations,
        analysis_summary: summary_or(payload, DEFAULT_SUMMARY)?,
        confidence_score,
    })
}

fn parse_crop_info(map: &JsonMap) -> Result<CropBasicInfo> {
    Ok(CropBasicInfo {
        crop_name: required_string(map, "crop_info", "crop_name")?,
        crop_type: optional_string(map, "crop_info", "crop_type")?,
        growth_stage: optional_string(map, "crop_info", "growth_stage")?,
        health_status: optional_string(map, "crop_info", "health_status")?,
    })
}

fn parse_disease(index: usize, entry: &Value) -> Result<DiseaseInfo> {
    let path = format!("diseases[{}]", index);
    let map = entry.as_object().ok_or_else(|| {
        Error::validation(&path, format!("expected an object, got {}", json_type_name(entry)))
    })?;

    Ok(DiseaseInfo {
        disease_name: required_string(map, &path, "disease_name")?,
        affected_areas: optional_string_list(map, &path, "affected_areas")?,
    })
}

fn parse_recommendations(map: &JsonMap) -> Result<TreatmentRecommendation> {
    let path = "recommendations";
    Ok(TreatmentRecommendation {
        immediate_actions: required_string_list(map, path, "immediate_actions")?,
        preventive_measures: required_string_list(map, path, "preventive_measures")?,
        treatment_methods: required_string_list(map, path, "treatment_methods")?,
        chemical_treatments: optional_string_list(map, path, "chemical_treatments")?,
        organic_treatments: optional_string_list(map, path, "organic_treatments")?,
    })
}

fn summary_or(payload: &JsonMap, fallback: &str) -> Result<String> {
    match payload.get("analysis_summary") {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => Ok(fallback.to_string()),
        Some(other) => Err(Error::validation(
            "analysis_summary",
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn optional_number(map: &JsonMap, key: &str) -> Result<Option<f64>> {
    match map.get(key) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or_else(|| {
            Error::validation(key, format!("expected a number, got {}", json_type_name(value)))
        }),
    }
}

fn required_string(map: &JsonMap, path: &str, key: &str) -> Result<String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(Error::validation(
            format!("{}.{}", path, key),
            "missing required field",
        )),
        Some(other) => Err(Error::validation(
            format!("{}.{}", path, key),
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn optional_string(map: &JsonMap, path: &str, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Error::validation(
            format!("{}.{}", path, key),
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn string_list(list: &[Value], field: &str) -> Result<Vec<String>> {
    list.iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::validation(
                format!("{}[{}]", field, i),
                format!("expected a string, got {}", json_type_name(other)),
            )),
        })
        .collect()
}

fn required_string_list(map: &JsonMap, path: &str, key: &str) -> Result<Vec<String>> {
    let field = format!("{}.{}", path, key);
    match map.get(key) {
        Some(Value::Array(list)) => string_list(list, &field),
        Some(Value::Null) | None => Err(Error::validation(field, "missing required field")),
        Some(other) => Err(Error::validation(
            field,
            format!("expected a list, got {}", json_type_name(other)),
        )),
    }
}

/// Optional list fields normalize an empty list to absent: the model makes no
/// reliable distinction between "no data" and "empty".
fn optional_string_list(map: &JsonMap, path: &str, key: &str) -> Result<Option<Vec<String>>> {
    let field = format!("{}.{}", path, key);
    match map.get(key) {
        Some(Value::Array(list)) if list.is_empty() => Ok(None),
        Some(Value::Array(list)) => string_list(list, &field).map(Some),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Error::validation(
            field,
            format!("expected a list, got {}", json_type_name(other)),
        )),
    }
}
