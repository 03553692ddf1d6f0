//! The API seam between the view flows and the backend.
//!
//! `ClinicalApi` is the only way any flow in this crate reaches the network.
//! The HTTP implementation lives in `cds-client`; tests substitute recording
//! mocks. Implementations are stateless request translators: no retries, no
//! caching, no client-side validation beyond what the type system enforces.
//! Business rules such as "at least two medications" belong to the callers.

use async_trait::async_trait;

use cds_contracts::{
    clinical::{ClinicalQuery, ClinicalResponse, HealthStatus, QueryTypeInfo},
    drug::{DrugAlerts, DrugInteraction, DrugSummary, PatientFactors, PatientSpecificCheck},
    error::CdsResult,
    guideline::{
        DatabaseStats, DetailedGuideline, Guideline, GuidelineSearchRequest, SpecialtyAlerts,
    },
    repository::{
        Bibliography, DocumentDetail, DocumentSearchFilters, DocumentSummary, QualityReport,
        RepositoryStats, UsageAnalytics,
    },
};

/// Typed access to the clinical decision support backend.
///
/// Every method issues exactly one request. Failures are reported as
/// `CdsError::Transport`, `CdsError::Status` or `CdsError::Decode`.
#[async_trait]
pub trait ClinicalApi: Send + Sync {
    // ── Clinical ─────────────────────────────────────────────────────────────

    /// Submit a clinical question. `POST /clinical/query`.
    async fn submit_query(&self, query: &ClinicalQuery) -> CdsResult<ClinicalResponse>;

    /// List the specialties the backend knows about. `GET /clinical/specialties`.
    async fn specialties(&self) -> CdsResult<Vec<String>>;

    /// The query kinds the backend accepts. `GET /clinical/query-types`.
    async fn query_types(&self) -> CdsResult<Vec<QueryTypeInfo>>;

    /// Backend liveness. `GET /health`.
    async fn health(&self) -> CdsResult<HealthStatus>;

    // ── Drugs ────────────────────────────────────────────────────────────────

    /// Pairwise interactions among `medications`. `POST /drugs/interactions`.
    ///
    /// Sends whatever it is given; the two-medication minimum is enforced by
    /// the interaction checker before this is called.
    async fn check_drug_interactions(
        &self,
        medications: &[String],
    ) -> CdsResult<Vec<DrugInteraction>>;

    /// Interaction profile of one drug. `GET /drugs/summary?drug_name=`.
    async fn drug_summary(&self, drug_name: &str) -> CdsResult<DrugSummary>;

    /// Interactions among `medications`, annotated for the patient's age and
    /// organ function. `POST /drugs/patient-specific-check`; factors travel
    /// as query parameters and unset ones are omitted.
    async fn patient_specific_check(
        &self,
        medications: &[String],
        factors: &PatientFactors,
    ) -> CdsResult<PatientSpecificCheck>;

    /// Critical and warning alerts for one drug.
    /// `GET /drugs/clinical-alerts/{drug}`.
    async fn drug_clinical_alerts(&self, drug_name: &str) -> CdsResult<DrugAlerts>;

    // ── Guidelines ───────────────────────────────────────────────────────────

    async fn search_guidelines(
        &self,
        request: &GuidelineSearchRequest,
    ) -> CdsResult<Vec<Guideline>>;

    async fn get_guideline(&self, id: &str) -> CdsResult<DetailedGuideline>;

    /// Specialty-scoped listing, used when there is no free-text query.
    async fn guidelines_by_specialty(&self, specialty: &str) -> CdsResult<Vec<Guideline>>;

    async fn guideline_database_stats(&self) -> CdsResult<DatabaseStats>;

    /// Strong recommendations, contraindications and monitoring for a
    /// specialty. `GET /guidelines/clinical-alerts/{specialty}`.
    async fn guideline_clinical_alerts(&self, specialty: &str) -> CdsResult<SpecialtyAlerts>;

    // ── Knowledge repository ─────────────────────────────────────────────────

    async fn search_documents(
        &self,
        filters: &DocumentSearchFilters,
    ) -> CdsResult<Vec<DocumentSummary>>;

    async fn repository_overview(&self) -> CdsResult<RepositoryStats>;

    async fn get_document(&self, document_id: &str) -> CdsResult<DocumentDetail>;

    async fn quality_report(&self) -> CdsResult<QualityReport>;

    /// Export citations for exactly `document_ids`, in `format`.
    ///
    /// The format string is passed through unvalidated.
    async fn export_bibliography(
        &self,
        document_ids: &[String],
        format: &str,
    ) -> CdsResult<Bibliography>;

    async fn usage_analytics(&self) -> CdsResult<UsageAnalytics>;
}
