//! Knowledge repository shapes: document search, statistics, quality report,
//! bibliography export.
//!
//! These are display data. Where the backend returns free-form sections the
//! fields stay as `serde_json::Value` maps rather than inventing structure.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::levels::EvidenceLevel;

/// Body of `POST /knowledge-repository/search`.
///
/// Blank optional filters are omitted from the serialized body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSearchFilters {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<String>,
    #[serde(
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub document_type: String,
    pub evidence_level: EvidenceLevel,
    #[serde(
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub journal: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Quality in [0, 1].
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub citation_count: u32,
    #[serde(default)]
    pub access_level: String,
}

/// `GET /knowledge-repository/document/{id}` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub citation: serde_json::Map<String, serde_json::Value>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub full_text_available: bool,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub mesh_terms: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub evidence_level: EvidenceLevel,
    #[serde(default)]
    pub publication_status: String,
    #[serde(default)]
    pub access_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub quality_metrics: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_metadata: Option<serde_json::Value>,
}

/// `GET /knowledge-repository/` overview payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryStats {
    #[serde(default)]
    pub total_documents: u32,
    #[serde(default)]
    pub document_types: BTreeMap<String, u32>,
    #[serde(default)]
    pub evidence_levels: BTreeMap<String, u32>,
    #[serde(default)]
    pub access_levels: BTreeMap<String, u32>,
    /// Mixes 0–1 scores and 0–100 percentages; normalize before display.
    #[serde(default)]
    pub quality_metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub content_coverage: serde_json::Value,
    #[serde(default)]
    pub processing_status: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    #[serde(default)]
    pub overall_quality_score: f64,
    #[serde(default)]
    pub evidence_quality_score: f64,
    #[serde(default)]
    pub content_freshness: BTreeMap<String, f64>,
    #[serde(default)]
    pub source_diversity: BTreeMap<String, f64>,
    #[serde(default)]
    pub access_quality: BTreeMap<String, f64>,
    #[serde(default)]
    pub processing_quality: BTreeMap<String, f64>,
    #[serde(default)]
    pub coverage_analysis: serde_json::Value,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    #[serde(default)]
    pub overall_grade: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
}

/// `GET /knowledge-repository/quality/report` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(
        default,
        with = "crate::timestamp::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub report_generated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quality_assessment: QualityAssessment,
    #[serde(default)]
    pub summary: QualitySummary,
}

/// `GET /knowledge-repository/export/bibliography` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bibliography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_entries: Option<u32>,
    #[serde(default)]
    pub bibliography: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl Bibliography {
    /// Entries joined into the text written to the download file.
    pub fn to_text(&self) -> String {
        let mut text = self.bibliography.join("\n\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Entries the backend says it produced, falling back to the entries
    /// actually present. Documents the backend cannot find are skipped, so
    /// this can be lower than the number requested.
    pub fn entry_count(&self) -> usize {
        self.total_entries
            .map_or(self.bibliography.len(), |n| n as usize)
    }
}

/// `GET /knowledge-repository/analytics/usage` payload. Free-form.
pub type UsageAnalytics = serde_json::Value;
