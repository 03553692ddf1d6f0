//! Recording `ClinicalApi` used by the unit tests in this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cds_contracts::{
    clinical::{ClinicalQuery, ClinicalResponse, HealthStatus, QueryTypeInfo},
    drug::{
        DrugAlert, DrugAlerts, DrugInteraction, DrugSummary, PatientFactors,
        PatientSpecificCheck, PatientSpecificInteraction,
    },
    error::{CdsError, CdsResult},
    guideline::{
        DatabaseStats, DetailedGuideline, Guideline, GuidelineAlert, GuidelineSearchRequest,
        SpecialtyAlerts,
    },
    levels::{EvidenceLevel, Severity},
    repository::{
        Bibliography, DocumentDetail, DocumentSearchFilters, DocumentSummary, QualityReport,
        RepositoryStats, UsageAnalytics,
    },
};

use crate::traits::ClinicalApi;

/// One recorded call, with the arguments that matter to assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SubmitQuery(ClinicalQuery),
    Specialties,
    QueryTypes,
    Health,
    CheckInteractions(Vec<String>),
    DrugSummary(String),
    PatientSpecificCheck(Vec<String>, PatientFactors),
    DrugAlerts(String),
    SearchGuidelines(GuidelineSearchRequest),
    GetGuideline(String),
    GuidelinesBySpecialty(String),
    GuidelineStats,
    GuidelineAlerts(String),
    SearchDocuments(DocumentSearchFilters),
    RepositoryOverview,
    GetDocument(String),
    QualityReport,
    ExportBibliography(Vec<String>, String),
    UsageAnalytics,
}

/// A canned backend. Methods listed in `failing` answer with a 500;
/// `drug_summary` also fails for any drug listed in `failing_drugs`.
pub struct MockApi {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub response: ClinicalResponse,
    pub interactions: Vec<DrugInteraction>,
    pub guidelines: Vec<Guideline>,
    pub documents: Vec<DocumentSummary>,
    pub failing: Vec<&'static str>,
    pub failing_drugs: Vec<String>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(vec![])),
            response: ClinicalResponse::default(),
            interactions: vec![],
            guidelines: vec![],
            documents: vec![],
            failing: vec![],
            failing_drugs: vec![],
        }
    }

    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.push(method);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, call: Call) -> CdsResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&method) {
            return Err(CdsError::Status {
                status: 500,
                body: format!("{} failed", method),
            });
        }
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn interaction(drug1: &str, drug2: &str, severity: Severity) -> DrugInteraction {
    DrugInteraction {
        drug1: drug1.to_string(),
        drug2: drug2.to_string(),
        severity,
        description: format!("{} interacts with {}", drug1, drug2),
        mechanism: None,
        management: "Monitor closely".to_string(),
        sources: vec![],
    }
}

pub fn guideline(id: &str, specialty: &str) -> Guideline {
    Guideline {
        id: id.to_string(),
        title: format!("Guideline {}", id),
        organization: "AHA".to_string(),
        specialty: specialty.to_string(),
        publication_year: 2023,
        evidence_level: EvidenceLevel::A,
        last_updated: "2023-06-01".to_string(),
        summary: "Summary".to_string(),
        url: None,
        doi: None,
    }
}

pub fn document(id: &str) -> DocumentSummary {
    DocumentSummary {
        document_id: id.to_string(),
        title: format!("Document {}", id),
        document_type: "clinical_trial".to_string(),
        evidence_level: EvidenceLevel::B,
        publication_date: None,
        authors: vec!["Smith J".to_string()],
        journal: "NEJM".to_string(),
        abstract_text: "Abstract".to_string(),
        specialties: vec!["cardiology".to_string()],
        quality_score: 0.85,
        citation_count: 12,
        access_level: "public".to_string(),
    }
}

#[async_trait]
impl ClinicalApi for MockApi {
    async fn submit_query(&self, query: &ClinicalQuery) -> CdsResult<ClinicalResponse> {
        self.record("submit_query", Call::SubmitQuery(query.clone()))?;
        Ok(self.response.clone())
    }

    async fn specialties(&self) -> CdsResult<Vec<String>> {
        self.record("specialties", Call::Specialties)?;
        Ok(vec!["cardiology".to_string(), "endocrinology".to_string()])
    }

    async fn query_types(&self) -> CdsResult<Vec<QueryTypeInfo>> {
        self.record("query_types", Call::QueryTypes)?;
        Ok(vec![QueryTypeInfo {
            query_type: "diagnosis".to_string(),
            description: "Differential diagnosis assistance".to_string(),
        }])
    }

    async fn health(&self) -> CdsResult<HealthStatus> {
        self.record("health", Call::Health)?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: None,
            version: None,
            timestamp: None,
        })
    }

    async fn check_drug_interactions(
        &self,
        medications: &[String],
    ) -> CdsResult<Vec<DrugInteraction>> {
        self.record(
            "check_drug_interactions",
            Call::CheckInteractions(medications.to_vec()),
        )?;
        Ok(self.interactions.clone())
    }

    async fn drug_summary(&self, drug_name: &str) -> CdsResult<DrugSummary> {
        self.record("drug_summary", Call::DrugSummary(drug_name.to_string()))?;
        if self.failing_drugs.iter().any(|d| d == drug_name) {
            return Err(CdsError::Status {
                status: 404,
                body: format!("unknown drug {}", drug_name),
            });
        }
        Ok(DrugSummary {
            drug: drug_name.to_string(),
            total_interactions: 1,
            ..DrugSummary::default()
        })
    }

    /// Echoes `interactions`, adding a renal caution when kidney function is
    /// impaired.
    async fn patient_specific_check(
        &self,
        medications: &[String],
        factors: &PatientFactors,
    ) -> CdsResult<PatientSpecificCheck> {
        self.record(
            "patient_specific_check",
            Call::PatientSpecificCheck(medications.to_vec(), factors.clone()),
        )?;
        let renal = factors
            .kidney_function
            .as_deref()
            .filter(|k| *k != "normal")
            .map(|k| format!("Use caution with {} kidney function", k));
        let interactions: Vec<PatientSpecificInteraction> = self
            .interactions
            .iter()
            .map(|i| PatientSpecificInteraction {
                interaction: i.clone(),
                geriatric_considerations: None,
                pediatric_considerations: None,
                renal_considerations: renal.clone(),
                hepatic_considerations: None,
            })
            .collect();
        Ok(PatientSpecificCheck {
            medications: medications.to_vec(),
            patient_factors: factors.clone(),
            interactions_found: interactions.len() as u32,
            interactions,
        })
    }

    async fn drug_clinical_alerts(&self, drug_name: &str) -> CdsResult<DrugAlerts> {
        self.record("drug_clinical_alerts", Call::DrugAlerts(drug_name.to_string()))?;
        Ok(DrugAlerts {
            drug: drug_name.to_string(),
            total_alerts: Some(1),
            alerts: vec![DrugAlert {
                level: "WARNING".to_string(),
                message: format!("MAJOR interaction with aspirin ({})", drug_name),
                description: "Bleeding risk".to_string(),
                action_required: "Close monitoring required".to_string(),
            }],
            summary: Some("0 contraindicated, 1 major interactions".to_string()),
            message: None,
        })
    }

    async fn search_guidelines(
        &self,
        request: &GuidelineSearchRequest,
    ) -> CdsResult<Vec<Guideline>> {
        self.record("search_guidelines", Call::SearchGuidelines(request.clone()))?;
        Ok(self.guidelines.clone())
    }

    async fn get_guideline(&self, id: &str) -> CdsResult<DetailedGuideline> {
        self.record("get_guideline", Call::GetGuideline(id.to_string()))?;
        Ok(DetailedGuideline {
            guideline: guideline(id, "cardiology"),
            content: "Full text".to_string(),
            key_recommendations: vec![],
            contraindications: vec![],
            monitoring_requirements: vec![],
            patient_populations: vec![],
            clinical_scenarios: vec![],
            references: vec![],
        })
    }

    async fn guidelines_by_specialty(&self, specialty: &str) -> CdsResult<Vec<Guideline>> {
        self.record(
            "guidelines_by_specialty",
            Call::GuidelinesBySpecialty(specialty.to_string()),
        )?;
        Ok(self.guidelines.clone())
    }

    async fn guideline_database_stats(&self) -> CdsResult<DatabaseStats> {
        self.record("guideline_database_stats", Call::GuidelineStats)?;
        Ok(DatabaseStats {
            total_guidelines: self.guidelines.len() as u32,
            ..DatabaseStats::default()
        })
    }

    async fn guideline_clinical_alerts(&self, specialty: &str) -> CdsResult<SpecialtyAlerts> {
        self.record(
            "guideline_clinical_alerts",
            Call::GuidelineAlerts(specialty.to_string()),
        )?;
        Ok(SpecialtyAlerts {
            specialty: specialty.to_string(),
            total_guidelines: self.guidelines.len() as u32,
            clinical_alerts: vec![GuidelineAlert {
                alert_type: "STRONG_RECOMMENDATION".to_string(),
                recommendation: "Start guideline-directed medical therapy".to_string(),
                evidence_level: "A".to_string(),
                source_guideline: "Guideline hf-1".to_string(),
            }],
            contraindications: vec![],
            monitoring_requirements: vec![],
            summary: "Found 1 strong recommendations, 0 contraindications, 0 monitoring requirements"
                .to_string(),
        })
    }

    async fn search_documents(
        &self,
        filters: &DocumentSearchFilters,
    ) -> CdsResult<Vec<DocumentSummary>> {
        self.record("search_documents", Call::SearchDocuments(filters.clone()))?;
        Ok(self.documents.clone())
    }

    async fn repository_overview(&self) -> CdsResult<RepositoryStats> {
        self.record("repository_overview", Call::RepositoryOverview)?;
        Ok(RepositoryStats {
            total_documents: self.documents.len() as u32,
            ..RepositoryStats::default()
        })
    }

    async fn get_document(&self, document_id: &str) -> CdsResult<DocumentDetail> {
        self.record("get_document", Call::GetDocument(document_id.to_string()))?;
        Ok(DocumentDetail {
            document_id: document_id.to_string(),
            title: format!("Document {}", document_id),
            document_type: "clinical_trial".to_string(),
            citation: serde_json::Map::new(),
            abstract_text: String::new(),
            full_text_available: false,
            keywords: vec![],
            mesh_terms: vec![],
            specialties: vec![],
            evidence_level: EvidenceLevel::B,
            publication_status: "published".to_string(),
            access_level: "public".to_string(),
            source_url: None,
            pdf_url: None,
            quality_metrics: Default::default(),
            processing_metadata: None,
        })
    }

    async fn quality_report(&self) -> CdsResult<QualityReport> {
        self.record("quality_report", Call::QualityReport)?;
        Ok(QualityReport::default())
    }

    async fn export_bibliography(
        &self,
        document_ids: &[String],
        format: &str,
    ) -> CdsResult<Bibliography> {
        self.record(
            "export_bibliography",
            Call::ExportBibliography(document_ids.to_vec(), format.to_string()),
        )?;
        Ok(Bibliography {
            format: Some(format.to_string()),
            total_entries: Some(document_ids.len() as u32),
            bibliography: document_ids
                .iter()
                .map(|id| format!("@article{{{}}}", id))
                .collect(),
            generated_at: None,
        })
    }

    async fn usage_analytics(&self) -> CdsResult<UsageAnalytics> {
        self.record("usage_analytics", Call::UsageAnalytics)?;
        Ok(serde_json::json!({ "total_searches": 3 }))
    }
}
