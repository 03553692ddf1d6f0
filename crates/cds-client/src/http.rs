//! `ClinicalApi` over HTTP with `reqwest`.
//!
//! Every call builds one request against the configured base URL, tags it
//! with a fresh `X-Request-ID`, sends it, and decodes the body. No retries
//! and no timeouts beyond the transport defaults.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use cds_config::ClientConfig;
use cds_contracts::{
    clinical::{ClinicalQuery, ClinicalResponse, HealthStatus, QueryTypeCatalog, QueryTypeInfo},
    drug::{DrugAlerts, DrugInteraction, DrugSummary, PatientFactors, PatientSpecificCheck},
    error::{CdsError, CdsResult},
    guideline::{
        DatabaseStats, DetailedGuideline, Guideline, GuidelineSearchRequest, SpecialtyAlerts,
    },
    repository::{
        Bibliography, DocumentDetail, DocumentSearchFilters, DocumentSummary, QualityReport,
        RepositoryStats, UsageAnalytics,
    },
};
use cds_core::traits::ClinicalApi;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// `GET /clinical/specialties` answers with either shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum SpecialtiesPayload {
    Bare(Vec<String>),
    Wrapped { specialties: Vec<String> },
}

impl From<SpecialtiesPayload> for Vec<String> {
    fn from(payload: SpecialtiesPayload) -> Self {
        match payload {
            SpecialtiesPayload::Bare(list) => list,
            SpecialtiesPayload::Wrapped { specialties } => specialties,
        }
    }
}

/// HTTP client for the clinical decision support backend.
#[derive(Debug, Clone)]
pub struct HttpClinicalApi {
    client: Client,
    base: Url,
}

impl HttpClinicalApi {
    /// Build a client for `base_url`. Only http and https are accepted.
    pub fn new(base_url: &str) -> CdsResult<Self> {
        let base = Url::parse(base_url.trim()).map_err(|e| CdsError::Config {
            reason: format!("invalid base URL '{}': {}", base_url, e),
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(CdsError::Config {
                reason: format!("base URL '{}' must be an http(s) URL", base_url),
            });
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn from_config(config: &ClientConfig) -> CdsResult<Self> {
        Self::new(&config.api.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> CdsResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| CdsError::Config {
                reason: format!("base URL '{}' cannot carry a path", self.base),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> CdsResult<RequestBuilder> {
        Ok(self.client.get(self.endpoint(segments)?))
    }

    fn post(&self, segments: &[&str]) -> CdsResult<RequestBuilder> {
        Ok(self.client.post(self.endpoint(segments)?))
    }

    // ── Request construction ─────────────────────────────────────────────────

    fn submit_query_request(&self, query: &ClinicalQuery) -> CdsResult<RequestBuilder> {
        Ok(self.post(&["clinical", "query"])?.json(query))
    }

    fn specialties_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["clinical", "specialties"])
    }

    fn query_types_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["clinical", "query-types"])
    }

    fn health_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["health"])
    }

    fn interactions_request(&self, medications: &[String]) -> CdsResult<RequestBuilder> {
        Ok(self.post(&["drugs", "interactions"])?.json(medications))
    }

    fn drug_summary_request(&self, drug_name: &str) -> CdsResult<RequestBuilder> {
        Ok(self
            .get(&["drugs", "summary"])?
            .query(&[("drug_name", drug_name)]))
    }

    fn patient_specific_request(
        &self,
        medications: &[String],
        factors: &PatientFactors,
    ) -> CdsResult<RequestBuilder> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(age) = factors.age {
            params.push(("patient_age", age.to_string()));
        }
        if let Some(kidney) = &factors.kidney_function {
            params.push(("kidney_function", kidney.clone()));
        }
        if let Some(liver) = &factors.liver_function {
            params.push(("liver_function", liver.clone()));
        }
        Ok(self
            .post(&["drugs", "patient-specific-check"])?
            .query(&params)
            .json(medications))
    }

    fn drug_alerts_request(&self, drug_name: &str) -> CdsResult<RequestBuilder> {
        self.get(&["drugs", "clinical-alerts", drug_name])
    }

    fn search_guidelines_request(
        &self,
        request: &GuidelineSearchRequest,
    ) -> CdsResult<RequestBuilder> {
        Ok(self.post(&["guidelines", "search"])?.json(request))
    }

    fn guideline_request(&self, id: &str) -> CdsResult<RequestBuilder> {
        self.get(&["guidelines", id])
    }

    fn guidelines_by_specialty_request(&self, specialty: &str) -> CdsResult<RequestBuilder> {
        self.get(&["guidelines", "specialty", specialty])
    }

    fn guideline_stats_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["guidelines", "stats", "database"])
    }

    fn guideline_alerts_request(&self, specialty: &str) -> CdsResult<RequestBuilder> {
        self.get(&["guidelines", "clinical-alerts", specialty])
    }

    fn search_documents_request(
        &self,
        filters: &DocumentSearchFilters,
    ) -> CdsResult<RequestBuilder> {
        Ok(self.post(&["knowledge-repository", "search"])?.json(filters))
    }

    fn repository_overview_request(&self) -> CdsResult<RequestBuilder> {
        // Trailing slash is part of the route.
        self.get(&["knowledge-repository", ""])
    }

    fn document_request(&self, document_id: &str) -> CdsResult<RequestBuilder> {
        self.get(&["knowledge-repository", "document", document_id])
    }

    fn quality_report_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["knowledge-repository", "quality", "report"])
    }

    fn export_request(&self, document_ids: &[String], format: &str) -> CdsResult<RequestBuilder> {
        let mut params: Vec<(&str, &str)> = document_ids
            .iter()
            .map(|id| ("document_ids", id.as_str()))
            .collect();
        params.push(("format", format));
        Ok(self
            .get(&["knowledge-repository", "export", "bibliography"])?
            .query(&params))
    }

    fn usage_request(&self) -> CdsResult<RequestBuilder> {
        self.get(&["knowledge-repository", "analytics", "usage"])
    }

    // ── Transport ────────────────────────────────────────────────────────────

    /// Send `builder` and decode a 2xx JSON body into `T`.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> CdsResult<T> {
        let request_id = Uuid::new_v4();
        let request = builder
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .build()
            .map_err(|e| CdsError::Transport {
                reason: format!("failed to build request: {}", e),
            })?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(request_id = %request_id, method = %method, path = %path, "sending request");

        let started = Instant::now();
        let response = self.client.execute(request).await.map_err(|e| {
            error!(request_id = %request_id, path = %path, error = %e, "request failed");
            CdsError::Transport {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CdsError::Transport {
            reason: format!("failed to read response body: {}", e),
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(
                request_id = %request_id,
                path = %path,
                status = status.as_u16(),
                elapsed_ms,
                "backend returned error status"
            );
            return Err(CdsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "request completed"
        );

        serde_json::from_str(&body).map_err(|e| {
            warn!(request_id = %request_id, path = %path, error = %e, "response did not decode");
            CdsError::Decode {
                reason: format!("{} {}: {}", method, path, e),
            }
        })
    }
}

#[async_trait]
impl ClinicalApi for HttpClinicalApi {
    async fn submit_query(&self, query: &ClinicalQuery) -> CdsResult<ClinicalResponse> {
        self.send(self.submit_query_request(query)?).await
    }

    async fn specialties(&self) -> CdsResult<Vec<String>> {
        let payload: SpecialtiesPayload = self.send(self.specialties_request()?).await?;
        Ok(payload.into())
    }

    async fn query_types(&self) -> CdsResult<Vec<QueryTypeInfo>> {
        let catalog: QueryTypeCatalog = self.send(self.query_types_request()?).await?;
        Ok(catalog.query_types)
    }

    async fn health(&self) -> CdsResult<HealthStatus> {
        self.send(self.health_request()?).await
    }

    async fn check_drug_interactions(
        &self,
        medications: &[String],
    ) -> CdsResult<Vec<DrugInteraction>> {
        self.send(self.interactions_request(medications)?).await
    }

    async fn drug_summary(&self, drug_name: &str) -> CdsResult<DrugSummary> {
        self.send(self.drug_summary_request(drug_name)?).await
    }

    async fn patient_specific_check(
        &self,
        medications: &[String],
        factors: &PatientFactors,
    ) -> CdsResult<PatientSpecificCheck> {
        self.send(self.patient_specific_request(medications, factors)?)
            .await
    }

    async fn drug_clinical_alerts(&self, drug_name: &str) -> CdsResult<DrugAlerts> {
        self.send(self.drug_alerts_request(drug_name)?).await
    }

    async fn search_guidelines(
        &self,
        request: &GuidelineSearchRequest,
    ) -> CdsResult<Vec<Guideline>> {
        self.send(self.search_guidelines_request(request)?).await
    }

    async fn get_guideline(&self, id: &str) -> CdsResult<DetailedGuideline> {
        self.send(self.guideline_request(id)?).await
    }

    async fn guidelines_by_specialty(&self, specialty: &str) -> CdsResult<Vec<Guideline>> {
        self.send(self.guidelines_by_specialty_request(specialty)?).await
    }

    async fn guideline_database_stats(&self) -> CdsResult<DatabaseStats> {
        self.send(self.guideline_stats_request()?).await
    }

    async fn guideline_clinical_alerts(&self, specialty: &str) -> CdsResult<SpecialtyAlerts> {
        self.send(self.guideline_alerts_request(specialty)?).await
    }

    async fn search_documents(
        &self,
        filters: &DocumentSearchFilters,
    ) -> CdsResult<Vec<DocumentSummary>> {
        self.send(self.search_documents_request(filters)?).await
    }

    async fn repository_overview(&self) -> CdsResult<RepositoryStats> {
        self.send(self.repository_overview_request()?).await
    }

    async fn get_document(&self, document_id: &str) -> CdsResult<DocumentDetail> {
        self.send(self.document_request(document_id)?).await
    }

    async fn quality_report(&self) -> CdsResult<QualityReport> {
        self.send(self.quality_report_request()?).await
    }

    async fn export_bibliography(
        &self,
        document_ids: &[String],
        format: &str,
    ) -> CdsResult<Bibliography> {
        self.send(self.export_request(document_ids, format)?).await
    }

    async fn usage_analytics(&self) -> CdsResult<UsageAnalytics> {
        self.send(self.usage_request()?).await
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
