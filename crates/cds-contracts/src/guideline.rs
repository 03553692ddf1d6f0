//! Clinical practice guideline shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::levels::EvidenceLevel;

/// Search-result view of a guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub publication_year: i32,
    pub evidence_level: EvidenceLevel,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// A single graded recommendation inside a guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRecommendation {
    pub recommendation: String,
    /// Recommendation class, e.g. "I", "IIa", "Strong".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Detail view returned by `GET /guidelines/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedGuideline {
    #[serde(flatten)]
    pub guideline: Guideline,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key_recommendations: Vec<KeyRecommendation>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub monitoring_requirements: Vec<String>,
    #[serde(default)]
    pub patient_populations: Vec<String>,
    #[serde(default)]
    pub clinical_scenarios: Vec<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// Body of `POST /guidelines/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    pub max_results: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    #[serde(default)]
    pub most_covered_specialty: Option<String>,
    #[serde(default)]
    pub newest_guideline_year: Option<i32>,
    #[serde(default)]
    pub oldest_guideline_year: Option<i32>,
    #[serde(default)]
    pub year_range: i32,
}

/// `GET /guidelines/stats/database` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    #[serde(default)]
    pub total_guidelines: u32,
    #[serde(default)]
    pub specialties: BTreeMap<String, u32>,
    #[serde(default)]
    pub organizations: BTreeMap<String, u32>,
    /// Keys are years; JSON object keys arrive as strings.
    #[serde(default)]
    pub publication_years: BTreeMap<String, u32>,
    #[serde(default)]
    pub evidence_levels: BTreeMap<String, u32>,
    #[serde(default)]
    pub latest_year: Option<i32>,
    #[serde(default)]
    pub oldest_year: Option<i32>,
    #[serde(default)]
    pub available_specialties: Vec<String>,
    #[serde(default)]
    pub available_organizations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_summary: Option<CoverageSummary>,
}

// ── Specialty alerts ─────────────────────────────────────────────────────────

/// A strong (class I / "Strong") recommendation surfaced as an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineAlert {
    #[serde(default)]
    pub alert_type: String,
    pub recommendation: String,
    #[serde(default)]
    pub evidence_level: String,
    #[serde(default)]
    pub source_guideline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedContraindication {
    pub contraindication: String,
    #[serde(default)]
    pub source_guideline: String,
    #[serde(default)]
    pub organization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedMonitoring {
    pub monitoring: String,
    #[serde(default)]
    pub source_guideline: String,
    #[serde(default)]
    pub organization: String,
}

/// `GET /guidelines/clinical-alerts/{specialty}` payload. The backend caps
/// each list at ten entries; `summary` carries the uncapped counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialtyAlerts {
    pub specialty: String,
    #[serde(default)]
    pub total_guidelines: u32,
    #[serde(default)]
    pub clinical_alerts: Vec<GuidelineAlert>,
    #[serde(default)]
    pub contraindications: Vec<SourcedContraindication>,
    #[serde(default)]
    pub monitoring_requirements: Vec<SourcedMonitoring>,
    #[serde(default)]
    pub summary: String,
}

impl SpecialtyAlerts {
    pub fn is_empty(&self) -> bool {
        self.clinical_alerts.is_empty()
            && self.contraindications.is_empty()
            && self.monitoring_requirements.is_empty()
    }
}
