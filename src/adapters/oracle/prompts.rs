//! Prompt text and response schemas for the Gemini adapters.

use serde_json::{json, Value};

use crate::domain::patient::Language;

/// Patient line used when the caller supplies none.
pub const DEFAULT_PATIENT_CONTEXT: &str = "Adult (Standard)";

/// User text for guide requests; the instruction carries the emergency.
pub const GUIDE_USER_TEXT: &str = "Generate guide.";

pub fn assessment_instruction(patient_context: &str, language: &Language) -> String {
    let patient = if patient_context.trim().is_empty() {
        DEFAULT_PATIENT_CONTEXT
    } else {
        patient_context.trim()
    };

    format!(
        r#"You are Care Sherpa, an expert medical diagnostic assistant.
Your goal is to conduct a thorough triage assessment and provide detailed, educational medical guidance.

PATIENT CONTEXT: {patient}.

PROTOCOL:
1. Act as a doctor conducting an interview. Ask one follow-up question at a time until you have enough information.
2. IMAGE INPUT: If an image is provided, prioritize visual analysis. Describe color, texture, shape and location in detail.
3. TEXT INPUT: Analyze the user's description deeply.

OUTPUT REQUIREMENTS:
1. LANGUAGE: Every JSON value MUST be in {language}.
2. While interviewing, answer with status "in_progress" and a nextQuestion only.
3. When done, answer with status "complete":
   - 'detailedAnalysis': a long, multi-paragraph explanation of the medical reasoning, likely causes, anatomy involved and specific care advice.
   - 'visualAnalysis': detailed findings when an image was provided.
   - 'differentialDiagnosis': detailed 'reasoning' for each condition.
   - 'recommendedSpecialist': the kind of doctor to see, if any.

RISK STRATIFICATION:
- Clearly state if home care is appropriate or if a doctor visit is required.
- Be conservative with safety.

JSON FORMAT ONLY."#,
        patient = patient,
        language = language.display_name(),
    )
}

pub fn assessment_prompt(history: &[String], prompt: &str, language: &Language) -> String {
    format!(
        "Conversation History:\n{}\n\nUser Input: {}\n\nIMPORTANT: Provide a very detailed, long response in {}.",
        history.join("\n"),
        prompt,
        language.display_name()
    )
}

pub fn assessment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": { "type": "STRING", "enum": ["in_progress", "complete"] },
            "nextQuestion": {
                "type": "STRING",
                "description": "Follow up question in the target language if status is in_progress"
            },
            "summary": {
                "type": "STRING",
                "description": "A short title for the condition in the target language"
            },
            "recommendedSpecialist": {
                "type": "STRING",
                "description": "Specialty to consult, in the target language"
            },
            "visualAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "color": { "type": "STRING" },
                    "texture": { "type": "STRING" },
                    "shape": { "type": "STRING" },
                    "location": { "type": "STRING" },
                    "findings": { "type": "STRING", "description": "Detailed visual findings" }
                }
            },
            "differentialDiagnosis": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "condition": { "type": "STRING" },
                        "likelihood": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
                        "reasoning": { "type": "STRING" },
                        "severity": { "type": "STRING", "enum": ["Emergency", "High", "Moderate", "Low"] },
                        "action": { "type": "STRING" }
                    }
                }
            },
            "detailedAnalysis": {
                "type": "STRING",
                "description": "Multi-paragraph medical explanation in markdown"
            },
            "triageLevel": { "type": "STRING", "enum": ["Low", "Medium", "High", "Emergency"] },
            "confidenceScore": { "type": "NUMBER" },
            "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } },
            "disclaimer": { "type": "STRING", "description": "Medical disclaimer in the target language" }
        },
        "required": ["status", "disclaimer"]
    })
}

pub fn guide_instruction(emergency: &str, language: &Language) -> String {
    format!(
        r#"You are a First Aid Expert. Provide a structured, step-by-step guide for the emergency: "{emergency}".

GUIDELINES:
- Be clear, concise, and life-saving focused.
- Break down into simple steps.
- Indicate if a step requires timing (e.g., CPR rate).

LANGUAGE: The ENTIRE output must be in {language}.
Return JSON only."#,
        emergency = emergency,
        language = language.display_name(),
    )
}

pub fn guide_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "severity": { "type": "STRING", "enum": ["Critical", "Urgent", "Moderate"] },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "instruction": { "type": "STRING" },
                        "hasTimer": { "type": "BOOLEAN" },
                        "timerSeconds": { "type": "NUMBER" },
                        "warning": { "type": "STRING" }
                    }
                }
            },
            "postEmergency": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "severity", "steps", "postEmergency"]
    })
}

pub fn lookup_instruction(language: &Language) -> String {
    format!(
        r#"You are a healthcare directory assistant. List real clinics or doctors matching the requested specialty near the given location, best match first.
Include name, address, rating (e.g. "4.5", if known), phone (if known) and approximate lat/lng coordinates.
Return at most 5 entries. LANGUAGE: addresses and names as used locally, other text in {}.
Return JSON only."#,
        language.display_name()
    )
}

/// `location` is a place name, "lat,lng" pair, or "me".
pub fn lookup_prompt(specialty: &str, location: &str) -> String {
    format!("Find {} near {}.", specialty, location)
}

pub fn lookup_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "address": { "type": "STRING" },
                "rating": { "type": "STRING" },
                "phone": { "type": "STRING" },
                "lat": { "type": "NUMBER" },
                "lng": { "type": "NUMBER" }
            },
            "required": ["name", "address"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_patient_context_uses_default() {
        let text = assessment_instruction("  ", &Language::ENGLISH);
        assert!(text.contains("PATIENT CONTEXT: Adult (Standard)."));
    }

    #[test]
    fn instruction_names_target_language() {
        let text = assessment_instruction("self (34)", &Language::resolve("es"));
        assert!(text.contains("MUST be in Español"));
        assert!(text.contains("PATIENT CONTEXT: self (34)."));
    }

    #[test]
    fn prompt_joins_history_lines() {
        let history = vec!["Patient: rash".to_string(), "Doctor: Itchy?".to_string()];
        let text = assessment_prompt(&history, "yes", &Language::ENGLISH);
        assert_eq!(
            text,
            "Conversation History:\nPatient: rash\nDoctor: Itchy?\n\nUser Input: yes\n\nIMPORTANT: Provide a very detailed, long response in English."
        );
    }

    #[test]
    fn assessment_schema_requires_status_and_disclaimer() {
        assert_eq!(
            assessment_schema()["required"],
            json!(["status", "disclaimer"])
        );
    }

    #[test]
    fn guide_instruction_quotes_emergency() {
        let text = guide_instruction("Burns", &Language::ENGLISH);
        assert!(text.contains("for the emergency: \"Burns\"."));
    }

    #[test]
    fn lookup_prompt_names_location() {
        assert_eq!(lookup_prompt("Dermatologist", "me"), "Find Dermatologist near me.");
        assert_eq!(
            lookup_prompt("Dermatologist", "Lisbon"),
            "Find Dermatologist near Lisbon."
        );
    }
}
