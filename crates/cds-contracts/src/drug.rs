//! Drug interaction shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::levels::Severity;

/// One drug-drug interaction reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugInteraction {
    pub drug1: String,
    pub drug2: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<String>,
    #[serde(default)]
    pub management: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// One interacting partner within a `DrugSummary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugSummaryEntry {
    pub interacting_drug: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

/// Interaction profile of a single drug, `GET /drugs/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugSummary {
    pub drug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<String>,
    #[serde(default)]
    pub total_interactions: u32,
    /// Keyed by the severity wire value.
    #[serde(default)]
    pub by_severity: BTreeMap<String, Vec<DrugSummaryEntry>>,
    #[serde(default)]
    pub all_interactions: Vec<DrugSummaryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DrugSummary {
    /// Number of partners at `severity`, falling back to counting
    /// `all_interactions` when the grouped map is absent.
    pub fn count_at(&self, severity: &Severity) -> usize {
        match self.by_severity.get(severity.as_str()) {
            Some(entries) => entries.len(),
            None => self
                .all_interactions
                .iter()
                .filter(|e| &e.severity == severity)
                .count(),
        }
    }
}

// ── Patient-specific check ───────────────────────────────────────────────────

/// Patient factors sent with `POST /drugs/patient-specific-check`.
///
/// Organ function is free text on the wire; the backend treats anything
/// other than "normal" as impaired.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFactors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kidney_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liver_function: Option<String>,
}

impl PatientFactors {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.kidney_function.is_none() && self.liver_function.is_none()
    }
}

/// An interaction annotated with the patient-specific cautions that apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSpecificInteraction {
    #[serde(flatten)]
    pub interaction: DrugInteraction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geriatric_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pediatric_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renal_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hepatic_considerations: Option<String>,
}

impl PatientSpecificInteraction {
    /// Non-empty cautions in display order: age, then kidney, then liver.
    pub fn considerations(&self) -> Vec<&str> {
        [
            &self.geriatric_considerations,
            &self.pediatric_considerations,
            &self.renal_considerations,
            &self.hepatic_considerations,
        ]
        .into_iter()
        .filter_map(|c| c.as_deref())
        .filter(|c| !c.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSpecificCheck {
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub patient_factors: PatientFactors,
    #[serde(default)]
    pub interactions_found: u32,
    #[serde(default)]
    pub interactions: Vec<PatientSpecificInteraction>,
}

// ── Clinical alerts ──────────────────────────────────────────────────────────

/// One alert from `GET /drugs/clinical-alerts/{drug}`. `level` is
/// "CRITICAL" for contraindicated partners and "WARNING" for major ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugAlert {
    pub level: String,
    pub message: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action_required: String,
}

impl DrugAlert {
    pub fn is_critical(&self) -> bool {
        self.level.eq_ignore_ascii_case("critical")
    }
}

/// A drug with no interactions comes back with only `message` set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugAlerts {
    pub drug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_alerts: Option<u32>,
    #[serde(default)]
    pub alerts: Vec<DrugAlert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
