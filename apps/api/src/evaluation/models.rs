use serde::{Deserialize, Deserializer, Serialize};

/// Resume text and job description for a single evaluation attempt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

/// Structured verdict parsed from the model reply.
///
/// List and text fields the model leaves out come back empty; `score` is
/// required and must lie in 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub strong_areas: Vec<String>,
    #[serde(default)]
    pub missing_areas: Vec<String>,
    #[serde(default)]
    pub updated_resume: String,
    #[serde(default)]
    pub updated_points: Vec<String>,
    /// Attached locally after parsing, never requested from the model.
    pub original_resume: String,
}

/// Accepts integers and integral floats (`68`, `68.0`) within 0–100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw.fract() != 0.0 {
        return Err(D::Error::custom(format!("score must be a whole number, got {raw}")));
    }
    if !(0.0..=100.0).contains(&raw) {
        return Err(D::Error::custom(format!("score must be between 0 and 100, got {raw}")));
    }
    Ok(raw as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_deserializes_full_reply() {
        let json = r#"{
            "score": 68,
            "strongAreas": ["JavaScript"],
            "missingAreas": ["React", "TypeScript"],
            "updatedResume": "John Doe",
            "updatedPoints": ["Added keywords"],
            "originalResume": "john doe"
        }"#;
        let result: EvaluationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 68);
        assert_eq!(result.missing_areas, vec!["React", "TypeScript"]);
        assert_eq!(result.original_resume, "john doe");
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let json = r#"{"score": 91, "originalResume": "x"}"#;
        let result: EvaluationResult = serde_json::from_str(json).unwrap();
        assert!(result.strong_areas.is_empty());
        assert!(result.updated_resume.is_empty());
        assert!(result.updated_points.is_empty());
    }

    #[test]
    fn test_integral_float_score_is_accepted() {
        let json = r#"{"score": 75.0, "originalResume": "x"}"#;
        let result: EvaluationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 75);
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        for score in ["101", "-1", "72.5", "\"80\""] {
            let json = format!(r#"{{"score": {score}, "originalResume": "x"}}"#);
            assert!(
                serde_json::from_str::<EvaluationResult>(&json).is_err(),
                "score {score} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_score_is_rejected() {
        let json = r#"{"strongAreas": [], "originalResume": "x"}"#;
        assert!(serde_json::from_str::<EvaluationResult>(json).is_err());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = EvaluationResult {
            score: 90,
            strong_areas: vec!["Rust".to_string()],
            missing_areas: vec![],
            updated_resume: "new".to_string(),
            updated_points: vec![],
            original_resume: "old".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["strongAreas"][0], "Rust");
        assert_eq!(value["originalResume"], "old");
        assert_eq!(value["updatedResume"], "new");
    }

    #[test]
    fn test_request_missing_fields_are_empty() {
        let request: EvaluationRequest =
            serde_json::from_str(r#"{"resumeText": "hi"}"#).unwrap();
        assert_eq!(request.resume_text, "hi");
        assert!(request.job_description.is_empty());
    }
}
