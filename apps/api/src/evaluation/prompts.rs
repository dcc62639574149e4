// Prompt text for the match evaluation call.

const EVALUATION_PREAMBLE: &str = "You are an expert resume analyzer. Compare the RESUME with the JOB DESCRIPTION and return ONLY a valid JSON object (no markdown, no explanations).

Return JSON with exactly these keys:
- score: number between 0-100 representing match percentage
- strongAreas: array of 3-5 strings describing strengths that match the job
- missingAreas: array of 3-5 strings describing gaps compared to the job
- updatedResume: string containing an improved version of the resume
- updatedPoints: array of 3-5 strings describing improvements made";

const EVALUATION_CLOSING: &str = "Return ONLY the JSON object, starting with { and ending with }. No markdown formatting, no explanations.";

/// Builds the evaluation prompt. Both texts are embedded verbatim.
pub fn build_evaluation_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "{EVALUATION_PREAMBLE}\n\nRESUME:\n{resume_text}\n\nJOB DESCRIPTION:\n{job_description}\n\n{EVALUATION_CLOSING}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts_in_order() {
        let prompt = build_evaluation_prompt("Built features using JavaScript", "Senior React Developer");
        let resume_at = prompt.find("RESUME:\nBuilt features using JavaScript").unwrap();
        let jd_at = prompt.find("JOB DESCRIPTION:\nSenior React Developer").unwrap();
        assert!(resume_at < jd_at);
    }

    #[test]
    fn test_prompt_names_all_five_fields() {
        let prompt = build_evaluation_prompt("r", "j");
        for field in ["score", "strongAreas", "missingAreas", "updatedResume", "updatedPoints"] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
        assert!(!prompt.contains("originalResume"));
    }

    #[test]
    fn test_placeholder_like_input_is_left_alone() {
        let prompt = build_evaluation_prompt("{job_description}", "{resume_text}");
        assert!(prompt.contains("RESUME:\n{job_description}"));
        assert!(prompt.contains("JOB DESCRIPTION:\n{resume_text}"));
    }
}
