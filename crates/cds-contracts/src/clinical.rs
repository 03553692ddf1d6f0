//! Clinical query request and response shapes.
//!
//! A `ClinicalQuery` is built from the query form on submit and consumed once
//! by the API call. The `ClinicalResponse` is produced wholesale by the
//! backend. Every list field defaults to empty so a sparse response still
//! decodes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drug::DrugInteraction;
use crate::levels::EvidenceLevel;

/// What kind of question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    #[default]
    General,
    Diagnosis,
    Treatment,
    DrugInteraction,
    Dosing,
    Monitoring,
}

impl QueryType {
    pub const ALL: [QueryType; 6] = [
        QueryType::General,
        QueryType::Diagnosis,
        QueryType::Treatment,
        QueryType::DrugInteraction,
        QueryType::Dosing,
        QueryType::Monitoring,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QueryType::General => "General",
            QueryType::Diagnosis => "Diagnosis",
            QueryType::Treatment => "Treatment",
            QueryType::DrugInteraction => "Drug interaction",
            QueryType::Dosing => "Dosing",
            QueryType::Monitoring => "Monitoring",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Routine,
    Urgent,
    Emergent,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Routine, Urgency::Urgent, Urgency::Emergent];

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Routine => "Routine",
            Urgency::Urgent => "Urgent",
            Urgency::Emergent => "Emergent",
        }
    }
}

/// One entry of `GET /clinical/query-types`. `query_type` is the wire value
/// of a `QueryType`, kept as text so new server-side kinds still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTypeInfo {
    #[serde(rename = "type")]
    pub query_type: String,
    #[serde(default)]
    pub description: String,
}

impl QueryTypeInfo {
    /// The matching local `QueryType`, if the backend names one we know.
    pub fn known(&self) -> Option<QueryType> {
        serde_json::from_value(serde_json::Value::String(self.query_type.clone())).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTypeCatalog {
    #[serde(default)]
    pub query_types: Vec<QueryTypeInfo>,
}

/// Optional demographic and medication data attached to a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Ordered and index-addressed. Duplicate names are allowed.
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub lab_values: BTreeMap<String, serde_json::Value>,
}

impl PatientContext {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.gender.as_deref().map_or(true, |g| g.trim().is_empty())
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.allergies.is_empty()
            && self.current_medications.is_empty()
            && self.medical_conditions.is_empty()
            && self.lab_values.is_empty()
    }

    pub fn add_medication(&mut self, name: impl Into<String>) {
        self.current_medications.push(name.into());
    }

    /// Replace the medication at `index`. Returns false if out of range.
    pub fn update_medication(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.current_medications.get_mut(index) {
            Some(slot) => {
                *slot = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove and return the medication at `index`, if any.
    pub fn remove_medication(&mut self, index: usize) -> Option<String> {
        if index < self.current_medications.len() {
            Some(self.current_medications.remove(index))
        } else {
            None
        }
    }

    /// A copy with blank list entries and blank gender dropped, ready to send.
    pub fn normalized(&self) -> Self {
        fn clean(items: &[String]) -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }

        Self {
            age: self.age,
            gender: self
                .gender
                .as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            allergies: clean(&self.allergies),
            current_medications: clean(&self.current_medications),
            medical_conditions: clean(&self.medical_conditions),
            lab_values: self.lab_values.clone(),
        }
    }
}

/// A clinical question submitted to `POST /clinical/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_context: Option<PatientContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
}

impl ClinicalQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            patient_context: None,
            query_type: None,
            urgency: None,
        }
    }
}

/// A cited evidence source backing a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// "guideline", "study", "textbook", ...
    #[serde(rename = "type", default)]
    pub source_type: String,
    pub evidence_level: EvidenceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub recommendation: String,
    /// Model confidence in [0, 1].
    pub confidence_score: f64,
    pub evidence_level: EvidenceLevel,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub considerations: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// The backend's answer to a clinical query. Immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalResponse {
    #[serde(default)]
    pub query_id: String,
    #[serde(default)]
    pub recommendations: Vec<ClinicalRecommendation>,
    #[serde(default)]
    pub drug_interactions: Vec<DrugInteraction>,
    #[serde(default)]
    pub differential_diagnoses: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

/// `GET /health` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok" | "OK")
    }
}
