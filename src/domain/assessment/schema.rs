//! Contract validation for oracle assessment payloads.
//!
//! The payload is a tagged union on `status`. The discriminant is checked
//! first, then the fields allowed for that variant. A payload mixing the
//! two shapes is a contract violation, not something to guess at.

use serde::Deserialize;
use thiserror::Error;

use super::result::{AssessmentReport, AssessmentResult, Diagnosis, VisualAnalysis};
use crate::domain::foundation::Percentage;
use crate::domain::triage::{DiagnosisSeverity, Likelihood, TriageLevel};

/// Minimum number of non-whitespace characters in a diagnosis rationale.
pub const MIN_REASONING_CHARS: usize = 10;

/// Ways an oracle payload can break the assessment contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload is missing 'status'")]
    MissingStatus,

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("complete payload is missing 'disclaimer'")]
    MissingDisclaimer,

    #[error("'{field}' is not allowed when status is '{status}'")]
    MixedPayload { status: &'static str, field: &'static str },

    #[error("invalid '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl SchemaViolation {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaViolation::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    status: Option<String>,
    next_question: Option<String>,
    summary: Option<String>,
    recommended_specialist: Option<String>,
    visual_analysis: Option<RawVisualAnalysis>,
    differential_diagnosis: Option<Vec<RawDiagnosis>>,
    detailed_analysis: Option<String>,
    triage_level: Option<String>,
    confidence_score: Option<f64>,
    recommendations: Option<Vec<String>>,
    disclaimer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVisualAnalysis {
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    texture: Option<String>,
    #[serde(default)]
    shape: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    findings: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDiagnosis {
    condition: Option<String>,
    likelihood: Option<String>,
    reasoning: Option<String>,
    severity: Option<String>,
    action: Option<String>,
}

/// Returns the trimmed string if it carries any content.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_empty<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().map_or(false, |v| !v.is_empty())
}

/// Validates a parsed oracle payload into an [`AssessmentResult`].
pub fn parse_assessment(value: serde_json::Value) -> Result<AssessmentResult, SchemaViolation> {
    if !value.is_object() {
        return Err(SchemaViolation::NotAnObject);
    }

    let raw: RawAssessment =
        serde_json::from_value(value).map_err(|e| SchemaViolation::Malformed(e.to_string()))?;

    let status = present(&raw.status)
        .ok_or(SchemaViolation::MissingStatus)?
        .to_string();
    match status.as_str() {
        "in_progress" => parse_in_progress(&raw),
        "complete" => parse_complete(raw),
        other => Err(SchemaViolation::UnknownStatus(other.to_string())),
    }
}

fn parse_in_progress(raw: &RawAssessment) -> Result<AssessmentResult, SchemaViolation> {
    let status = "in_progress";
    let terminal_fields: [(&'static str, bool); 8] = [
        ("summary", present(&raw.summary).is_some()),
        (
            "recommendedSpecialist",
            present(&raw.recommended_specialist).is_some(),
        ),
        (
            "visualAnalysis",
            raw.visual_analysis
                .as_ref()
                .map_or(false, |v| !visual_from_raw(v).is_empty()),
        ),
        (
            "differentialDiagnosis",
            non_empty(&raw.differential_diagnosis),
        ),
        ("detailedAnalysis", present(&raw.detailed_analysis).is_some()),
        ("triageLevel", present(&raw.triage_level).is_some()),
        // Schema-constrained models fill numeric defaults; zero is a placeholder.
        (
            "confidenceScore",
            raw.confidence_score.map_or(false, |c| c != 0.0),
        ),
        ("recommendations", non_empty(&raw.recommendations)),
    ];

    if let Some((field, _)) = terminal_fields.iter().find(|(_, set)| *set) {
        return Err(SchemaViolation::MixedPayload {
            status,
            field: *field,
        });
    }

    Ok(AssessmentResult::InProgress {
        next_question: present(&raw.next_question).map(str::to_string),
    })
}

fn parse_complete(raw: RawAssessment) -> Result<AssessmentResult, SchemaViolation> {
    if present(&raw.next_question).is_some() {
        return Err(SchemaViolation::MixedPayload {
            status: "complete",
            field: "nextQuestion",
        });
    }

    let disclaimer = present(&raw.disclaimer)
        .ok_or(SchemaViolation::MissingDisclaimer)?
        .to_string();

    let differential = raw
        .differential_diagnosis
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, d)| parse_diagnosis(i, d))
        .collect::<Result<Vec<_>, _>>()?;

    let triage_level = present(&raw.triage_level)
        .map(|s| {
            s.parse::<TriageLevel>()
                .map_err(|e| SchemaViolation::invalid("triageLevel", e.to_string()))
        })
        .transpose()?;

    let confidence = raw
        .confidence_score
        .map(|c| {
            Percentage::from_f64(c)
                .map_err(|e| SchemaViolation::invalid("confidenceScore", e.to_string()))
        })
        .transpose()?;

    let visual_analysis = raw
        .visual_analysis
        .as_ref()
        .map(visual_from_raw)
        .filter(|v| !v.is_empty());

    let recommendations = raw
        .recommendations
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    Ok(AssessmentResult::Complete(AssessmentReport {
        summary: present(&raw.summary).map(str::to_string),
        recommended_specialist: present(&raw.recommended_specialist).map(str::to_string),
        visual_analysis,
        differential,
        detailed_analysis: present(&raw.detailed_analysis).map(str::to_string),
        triage_level,
        confidence,
        recommendations,
        disclaimer,
    }))
}

fn parse_diagnosis(index: usize, raw: RawDiagnosis) -> Result<Diagnosis, SchemaViolation> {
    let field = |name: &str| format!("differentialDiagnosis[{}].{}", index, name);

    let condition = present(&raw.condition)
        .ok_or_else(|| SchemaViolation::invalid(field("condition"), "must not be empty"))?
        .to_string();

    let likelihood = present(&raw.likelihood)
        .ok_or_else(|| SchemaViolation::invalid(field("likelihood"), "must not be empty"))?
        .parse::<Likelihood>()
        .map_err(|e| SchemaViolation::invalid(field("likelihood"), e.to_string()))?;

    let severity = present(&raw.severity)
        .ok_or_else(|| SchemaViolation::invalid(field("severity"), "must not be empty"))?
        .parse::<DiagnosisSeverity>()
        .map_err(|e| SchemaViolation::invalid(field("severity"), e.to_string()))?;

    let reasoning = present(&raw.reasoning).unwrap_or_default();
    let meaningful = reasoning.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_REASONING_CHARS {
        return Err(SchemaViolation::invalid(
            field("reasoning"),
            format!("needs at least {} characters", MIN_REASONING_CHARS),
        ));
    }

    Ok(Diagnosis {
        condition,
        likelihood,
        reasoning: reasoning.to_string(),
        severity,
        action: present(&raw.action).unwrap_or_default().to_string(),
    })
}

fn visual_from_raw(raw: &RawVisualAnalysis) -> VisualAnalysis {
    let text = |v: &Option<String>| present(v).unwrap_or_default().to_string();
    VisualAnalysis {
        color: text(&raw.color),
        texture: text(&raw.texture),
        shape: text(&raw.shape),
        location: text(&raw.location),
        findings: text(&raw.findings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_payload() -> serde_json::Value {
        json!({
            "status": "complete",
            "summary": "Migraine",
            "recommendedSpecialist": "Neurologist",
            "differentialDiagnosis": [{
                "condition": "Migraine",
                "likelihood": "High",
                "reasoning": "Unilateral throbbing pain with photophobia.",
                "severity": "Moderate",
                "action": "Rest in a dark room"
            }],
            "detailedAnalysis": "Symptoms are typical of migraine.",
            "triageLevel": "Medium",
            "confidenceScore": 82.4,
            "recommendations": ["Hydrate", "  "],
            "disclaimer": "This is not a diagnosis."
        })
    }

    mod discriminant {
        use super::*;

        #[test]
        fn rejects_non_object() {
            assert_eq!(
                parse_assessment(json!(["complete"])),
                Err(SchemaViolation::NotAnObject)
            );
        }

        #[test]
        fn rejects_missing_status() {
            assert_eq!(
                parse_assessment(json!({"disclaimer": "d"})),
                Err(SchemaViolation::MissingStatus)
            );
        }

        #[test]
        fn rejects_unknown_status() {
            assert_eq!(
                parse_assessment(json!({"status": "done", "disclaimer": "d"})),
                Err(SchemaViolation::UnknownStatus("done".to_string()))
            );
        }

        #[test]
        fn rejects_wrongly_typed_fields() {
            let result = parse_assessment(json!({"status": "complete", "confidenceScore": "high"}));
            assert!(matches!(result, Err(SchemaViolation::Malformed(_))));
        }
    }

    mod in_progress {
        use super::*;

        #[test]
        fn accepts_question_without_disclaimer() {
            let result =
                parse_assessment(json!({"status": "in_progress", "nextQuestion": "Any fever?"}))
                    .unwrap();
            assert_eq!(
                result,
                AssessmentResult::InProgress {
                    next_question: Some("Any fever?".to_string())
                }
            );
        }

        #[test]
        fn blank_question_becomes_none() {
            let result =
                parse_assessment(json!({"status": "in_progress", "nextQuestion": " "})).unwrap();
            assert_eq!(result, AssessmentResult::InProgress { next_question: None });
        }

        #[test]
        fn tolerates_empty_terminal_fields() {
            let result = parse_assessment(json!({
                "status": "in_progress",
                "nextQuestion": "Where does it hurt?",
                "summary": "",
                "differentialDiagnosis": [],
                "disclaimer": "Not advice"
            }));
            assert!(result.is_ok());
        }

        #[test]
        fn zero_confidence_is_a_placeholder() {
            let result = parse_assessment(json!({
                "status": "in_progress",
                "nextQuestion": "Any fever?",
                "summary": "",
                "recommendations": [],
                "confidenceScore": 0
            }));
            assert_eq!(
                result,
                Ok(AssessmentResult::InProgress {
                    next_question: Some("Any fever?".to_string())
                })
            );
        }

        #[test]
        fn nonzero_confidence_is_mixed() {
            let result = parse_assessment(json!({
                "status": "in_progress",
                "nextQuestion": "Any fever?",
                "confidenceScore": 40
            }));
            assert_eq!(
                result,
                Err(SchemaViolation::MixedPayload {
                    status: "in_progress",
                    field: "confidenceScore"
                })
            );
        }

        #[test]
        fn rejects_terminal_fields() {
            let result = parse_assessment(json!({
                "status": "in_progress",
                "nextQuestion": "Where?",
                "triageLevel": "High"
            }));
            assert_eq!(
                result,
                Err(SchemaViolation::MixedPayload {
                    status: "in_progress",
                    field: "triageLevel"
                })
            );
        }
    }

    mod complete {
        use super::*;

        #[test]
        fn parses_full_payload() {
            let AssessmentResult::Complete(report) = parse_assessment(complete_payload()).unwrap()
            else {
                panic!("expected complete");
            };
            assert_eq!(report.summary.as_deref(), Some("Migraine"));
            assert_eq!(report.recommended_specialist.as_deref(), Some("Neurologist"));
            assert_eq!(report.differential.len(), 1);
            assert_eq!(report.differential[0].likelihood, Likelihood::High);
            assert_eq!(report.triage_level, Some(TriageLevel::Medium));
            assert_eq!(report.confidence, Some(Percentage::new(82)));
            assert_eq!(report.recommendations, vec!["Hydrate".to_string()]);
            assert!(report.visual_analysis.is_none());
        }

        #[test]
        fn rejects_missing_disclaimer() {
            let mut payload = complete_payload();
            payload["disclaimer"] = json!("  ");
            assert_eq!(
                parse_assessment(payload),
                Err(SchemaViolation::MissingDisclaimer)
            );
        }

        #[test]
        fn rejects_next_question() {
            let mut payload = complete_payload();
            payload["nextQuestion"] = json!("Anything else?");
            assert!(matches!(
                parse_assessment(payload),
                Err(SchemaViolation::MixedPayload { field: "nextQuestion", .. })
            ));
        }

        #[test]
        fn rejects_out_of_range_confidence() {
            let mut payload = complete_payload();
            payload["confidenceScore"] = json!(140);
            assert!(matches!(
                parse_assessment(payload),
                Err(SchemaViolation::InvalidField { ref field, .. }) if field == "confidenceScore"
            ));
        }

        #[test]
        fn rejects_unknown_triage_level() {
            let mut payload = complete_payload();
            payload["triageLevel"] = json!("Critical");
            assert!(matches!(
                parse_assessment(payload),
                Err(SchemaViolation::InvalidField { .. })
            ));
        }

        #[test]
        fn rejects_short_reasoning() {
            let mut payload = complete_payload();
            payload["differentialDiagnosis"][0]["reasoning"] = json!("pain");
            let err = parse_assessment(payload).unwrap_err();
            assert_eq!(
                err,
                SchemaViolation::InvalidField {
                    field: "differentialDiagnosis[0].reasoning".to_string(),
                    reason: format!("needs at least {} characters", MIN_REASONING_CHARS),
                }
            );
        }

        #[test]
        fn rejects_unknown_likelihood() {
            let mut payload = complete_payload();
            payload["differentialDiagnosis"][0]["likelihood"] = json!("Certain");
            assert!(parse_assessment(payload).is_err());
        }

        #[test]
        fn accepts_missing_summary() {
            let mut payload = complete_payload();
            payload.as_object_mut().unwrap().remove("summary");
            let AssessmentResult::Complete(report) = parse_assessment(payload).unwrap() else {
                panic!("expected complete");
            };
            assert!(report.summary.is_none());
        }

        #[test]
        fn keeps_visual_analysis_with_content() {
            let mut payload = complete_payload();
            payload["visualAnalysis"] = json!({"color": "red", "findings": "Raised rash"});
            let AssessmentResult::Complete(report) = parse_assessment(payload).unwrap() else {
                panic!("expected complete");
            };
            let visual = report.visual_analysis.unwrap();
            assert_eq!(visual.color, "red");
            assert_eq!(visual.texture, "");
        }
    }
}
