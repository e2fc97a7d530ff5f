//! The instruction text sent alongside every image.
//!
//! This is a contract with the external model, not a UI string: the extractor
//! and validator are written against the JSON shape requested here, so
//! changing its structure changes what they must handle.

const DETECTION_PROMPT: &str = r#"Analyze the uploaded image and determine the following:

1. Is this image related to crops or agriculture?
2. If yes, identify the basic information about the crop:
   - Crop name
   - Crop type
   - Growth stage (if visible)
   - Overall health status

3. Detect any diseases present on the crop:
   - Disease name
   - Affected plant areas

4. Provide recommendations to save the crop:
   - Immediate actions needed
   - Preventive measures
   - Treatment methods (both chemical and organic)

Please provide a comprehensive analysis in JSON format with the
following structure:
{
    "is_crop_image": boolean,
    "crop_info": {
        "crop_name": string,
        "crop_type": string,
        "growth_stage": string,
        "health_status": string
    },
    "diseases": [
        {
            "disease_name": string,
            "affected_areas": [string]
        }
    ],
    "recommendations": {
        "immediate_actions": [string],
        "preventive_measures": [string],
        "treatment_methods": [string],
        "chemical_treatments": [string],
        "organic_treatments": [string]
    },
    "analysis_summary": string,
    "confidence_score": number
}

If the image is not crop-related, set "is_crop_image" to false and
provide an explanation in "analysis_summary"; do not include the
crop_info, diseases, or recommendations fields in that case."#;

/// The fixed detection prompt. Stateless and deterministic: every request
/// sends exactly this text.
pub fn detection_prompt() -> &'static str {
    DETECTION_PROMPT
}
