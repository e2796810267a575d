// src/core/prompt.rs
//! Analysis prompt sent to the model

/// The JSON shape the model must reply with. Kept in sync with `AnalysisReport`.
const RESPONSE_SHAPE: &str = r#"{
    "overall_score": 0,
    "score_reason": "",
    "summary_rewrite": "",
    "key_skills": [],
    "ats_risks": [],
    "ats_improvements": [],
    "predicted_roles": [
        {"title": "", "explanation": ""},
        {"title": "", "explanation": ""},
        {"title": "", "explanation": ""}
    ],
    "detailed_suggestions": ""
}"#;

pub fn build_analysis_prompt(resume_text: &str) -> String {
    format!(
        r#"Analyze the following resume text. Output your response as a single, valid, raw JSON object, and nothing else.

The JSON structure MUST be exactly this. Provide an explanation for every list item.
{shape}

For "overall_score", rate the resume out of 100 based on quality and best practices.
For "summary_rewrite", write a concise, high-impact professional summary (4-5 sentences max).
For "ats_risks" and "ats_improvements", use objects of the form {{"risk": "", "explanation": ""}}.

Resume Text:
{text}
"#,
        shape = RESPONSE_SHAPE,
        text = resume_text.trim()
    )
}
