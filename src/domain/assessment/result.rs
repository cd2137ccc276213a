//! Validated oracle assessment results.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;
use crate::domain::triage::{DiagnosisSeverity, Likelihood, TriageLevel};

/// Breakdown of what the oracle saw in attached images.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub color: String,
    pub texture: String,
    pub shape: String,
    pub location: String,
    pub findings: String,
}

impl VisualAnalysis {
    /// True when every field is blank.
    pub fn is_empty(&self) -> bool {
        [
            &self.color,
            &self.texture,
            &self.shape,
            &self.location,
            &self.findings,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// One entry of the differential diagnosis, most likely first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub condition: String,
    pub likelihood: Likelihood,
    pub reasoning: String,
    pub severity: DiagnosisSeverity,
    pub action: String,
}

/// Terminal oracle payload, before summary substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub summary: Option<String>,
    pub recommended_specialist: Option<String>,
    pub visual_analysis: Option<VisualAnalysis>,
    pub differential: Vec<Diagnosis>,
    pub detailed_analysis: Option<String>,
    pub triage_level: Option<TriageLevel>,
    pub confidence: Option<Percentage>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}

impl AssessmentReport {
    /// Fills in a missing summary from the top differential.
    ///
    /// Returns the report unchanged in `Err` when neither a summary nor a
    /// differential is available; such a report cannot become a record.
    pub fn finalize(self) -> Result<FinalAssessment, AssessmentReport> {
        let summary = self
            .summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.differential.first().map(|d| d.condition.clone()));
        let Some(summary) = summary else {
            return Err(self);
        };

        Ok(FinalAssessment {
            summary,
            recommended_specialist: self
                .recommended_specialist
                .filter(|s| !s.trim().is_empty()),
            visual_analysis: self.visual_analysis,
            differential: self.differential,
            detailed_analysis: self.detailed_analysis.unwrap_or_default(),
            triage_level: self.triage_level.unwrap_or_default(),
            confidence: self.confidence,
            recommendations: self.recommendations,
            disclaimer: self.disclaimer,
        })
    }
}

/// Oracle answer for one interview round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentResult {
    /// The oracle wants more information.
    InProgress { next_question: Option<String> },
    /// The oracle has enough to conclude.
    Complete(AssessmentReport),
}

impl AssessmentResult {
    pub fn is_complete(&self) -> bool {
        matches!(self, AssessmentResult::Complete(_))
    }
}

/// A complete assessment whose summary and disclaimer are guaranteed
/// present. This is what the session stores and records are built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAssessment {
    pub summary: String,
    pub recommended_specialist: Option<String>,
    pub visual_analysis: Option<VisualAnalysis>,
    pub differential: Vec<Diagnosis>,
    pub detailed_analysis: String,
    pub triage_level: TriageLevel,
    pub confidence: Option<Percentage>,
    pub recommendations: Vec<String>,
    pub disclaimer: String,
}

impl FinalAssessment {
    /// Renders the Markdown detail body stored on the health record:
    /// narrative, then differential bullets, then visual findings.
    pub fn to_markdown(&self) -> String {
        let mut md = self.detailed_analysis.clone();

        if !self.differential.is_empty() {
            md.push_str("\n\n### Differential Diagnosis\n");
            for d in &self.differential {
                md.push_str(&format!(
                    "- **{}** ({}): {}\n",
                    d.condition, d.likelihood, d.reasoning
                ));
            }
        }

        if let Some(findings) = self
            .visual_analysis
            .as_ref()
            .map(|v| v.findings.trim())
            .filter(|f| !f.is_empty())
        {
            md.push_str("\n\n### Visual Analysis\n");
            md.push_str(findings);
        }

        md
    }
}
