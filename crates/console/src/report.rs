//! Plain-text rendering of a detection result.

use cropsight_core::CropDetectionResponse;

/// Render a detection result as a terminal report.
pub fn render(result: &CropDetectionResponse) -> String {
    let mut out = String::new();

    if !result.is_crop_image {
        out.push_str("No crop detected.\n\n");
        out.push_str(&result.analysis_summary);
        out.push('\n');
        return out;
    }

    if let Some(info) = &result.crop_info {
        out.push_str("Crop Information\n");
        out.push_str(&format!("  Name:         {}\n", info.crop_name));
        if let Some(crop_type) = &info.crop_type {
            out.push_str(&format!("  Type:         {}\n", crop_type));
        }
        if let Some(stage) = &info.growth_stage {
            out.push_str(&format!("  Growth stage: {}\n", stage));
        }
        if let Some(status) = &info.health_status {
            out.push_str(&format!("  Health:       {}\n", status));
        }
        out.push('\n');
    }

    match result.diseases.as_deref() {
        Some(diseases) if !diseases.is_empty() => {
            out.push_str("Detected Diseases\n");
            for (i, disease) in diseases.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, disease.disease_name));
                if let Some(areas) = &disease.affected_areas {
                    out.push_str(&format!("     Affected areas: {}\n", areas.join(", ")));
                }
            }
            out.push('\n');
        }
        _ => {
            out.push_str("No diseases detected.\n\n");
        }
    }

    if let Some(rec) = &result.recommendations {
        out.push_str("Recommendations\n");
        push_list(&mut out, "Immediate actions", &rec.immediate_actions);
        push_list(&mut out, "Preventive measures", &rec.preventive_measures);
        push_list(&mut out, "Treatment methods", &rec.treatment_methods);
        if let Some(chemical) = &rec.chemical_treatments {
            push_list(&mut out, "Chemical treatments", chemical);
        }
        if let Some(organic) = &rec.organic_treatments {
            push_list(&mut out, "Organic treatments", organic);
        }
        out.push('\n');
    }

    out.push_str("Summary\n");
    out.push_str(&format!("  {}\n", result.analysis_summary));

    if let Some(score) = result.confidence_score {
        out.push_str(&format!("\nConfidence: {:.0}%\n", score * 100.0));
    }

    out
}

fn push_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("  {}:\n", title));
    for item in items {
        out.push_str(&format!("    - {}\n", item));
    }
}
