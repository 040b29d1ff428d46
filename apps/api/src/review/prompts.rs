// Prompt constants for résumé review.
// Reuses the JSON-only fragment from llm_client::prompts.

/// Placeholder replaced by the full extracted résumé text.
pub const DOCUMENT_PLACEHOLDER: &str = "{{DOCUMENT_TEXT}}";

/// Persona for the system message. `JSON_ONLY_SYSTEM` is appended at call time.
pub const REVIEW_SYSTEM: &str = "You are an expert resume reviewer and career coach \
    with deep knowledge of applicant tracking systems (ATS) and technical hiring.";

/// Review prompt template. Replace `{{DOCUMENT_TEXT}}` before sending.
pub const ANALYZE_RESUME_PROMPT: &str = r#"Review the following resume and return a JSON object with this EXACT schema:
{
  "overallScore": 7,
  "strengths": ["Clear, consistent formatting"],
  "improvements": ["Quantify the impact of the payments migration"],
  "summary": "Two to three sentence overall assessment.",
  "performanceMetrics": {
    "formatting": 8,
    "contentQuality": 6,
    "keywordUsage": 5,
    "atsCompatibility": 7,
    "quantifiableAchievements": 4
  },
  "keywords": ["Kubernetes", "CI/CD"],
  "actionItems": ["Add a skills section near the top"],
  "proTips": ["Mirror the wording of the job posting"]
}

Rules:
- Every score is an integer from 0 to 10.
- "keywords" lists relevant terms the resume is missing.
- List 3 to 5 strengths and 3 to 5 improvements.
- If the text below is empty or is clearly not a resume, return {"error": "<short reason>"} instead.

Resume:
"""
{{DOCUMENT_TEXT}}
""""#;
