use crate::common::Species;

/// Confidence above which a non-healthy finding is escalated to urgent.
pub const CONFIDENT_THRESHOLD: f32 = 0.8;

const HEALTHY: &str = "healthy";

fn base_recommendation(condition: &str, species: Species) -> String {
    match condition {
        HEALTHY => "No issues detected. Continue regular care.".to_string(),
        "allergies" => format!("Consider {} allergy testing and environmental changes.", species),
        "ringworm" => "Highly contagious! Isolate pet and seek veterinary treatment.".to_string(),
        "fleas" => "Start flea treatment immediately and treat environment.".to_string(),
        "miliary" => "Veterinary attention needed for this dermatitis condition.".to_string(),
        _ => "Consult your veterinarian.".to_string(),
    }
}

pub fn recommendation(condition: &str, confidence: f32, species: Species) -> String {
    let base = base_recommendation(condition, species);

    if condition == HEALTHY {
        base
    } else if confidence > CONFIDENT_THRESHOLD {
        format!("Urgent: {} Schedule vet visit within 24 hours.", base)
    } else {
        format!("Recommended: {} Monitor closely.", base)
    }
}
