//! Knowledge repository explorer.
//!
//! Filters are combined client-side into one `DocumentSearchFilters` body with
//! a fixed result ceiling. Documents picked from the result list form an
//! ordered selection; a bibliography export sends exactly that selection.

use tracing::info;

use cds_contracts::{
    error::{CdsError, CdsResult},
    repository::{
        Bibliography, DocumentDetail, DocumentSearchFilters, DocumentSummary, QualityReport,
        RepositoryStats, UsageAnalytics,
    },
};

use crate::generation::{Completion, Slot, Ticket};
use crate::traits::ClinicalApi;

pub const DEFAULT_MAX_RESULTS: u32 = 50;
pub const DEFAULT_BIBLIOGRAPHY_FORMAT: &str = "bibtex";
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one document to export";

// ── Filters ──────────────────────────────────────────────────────────────────

/// Raw filter inputs as typed. Blank fields mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryFilters {
    pub query: String,
    pub specialty: String,
    pub document_type: String,
    pub evidence_level: String,
    pub access_level: String,
}

impl RepositoryFilters {
    pub fn to_search(&self, max_results: u32) -> DocumentSearchFilters {
        fn non_blank(s: &str) -> Option<String> {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }

        DocumentSearchFilters {
            query: self.query.trim().to_string(),
            specialty: non_blank(&self.specialty),
            document_type: non_blank(&self.document_type),
            evidence_level: non_blank(&self.evidence_level),
            access_level: non_blank(&self.access_level),
            start_date: None,
            end_date: None,
            max_results,
        }
    }
}

// ── Selection ────────────────────────────────────────────────────────────────

/// Ordered set of selected document identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSelection {
    ids: Vec<String>,
}

impl DocumentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|s| s == id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(id.to_string());
                true
            }
        }
    }

    /// Add every id not already selected, keeping first-seen order.
    pub fn select_all<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if !self.contains(id) {
                self.ids.push(id.to_string());
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ── Explorer ─────────────────────────────────────────────────────────────────

/// A search waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: Ticket,
    pub filters: DocumentSearchFilters,
}

/// An export waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingExport {
    pub ticket: Ticket,
    pub document_ids: Vec<String>,
    pub format: String,
}

/// State holder for the knowledge repository page.
#[derive(Debug, Clone)]
pub struct RepositoryExplorer {
    pub filters: RepositoryFilters,
    pub selection: DocumentSelection,
    max_results: u32,
    format: String,
    documents: Slot<Vec<DocumentSummary>>,
    overview: Slot<RepositoryStats>,
    detail: Slot<DocumentDetail>,
    quality: Slot<QualityReport>,
    usage: Slot<UsageAnalytics>,
    export: Slot<Bibliography>,
    validation: Option<String>,
}

impl RepositoryExplorer {
    pub fn new(max_results: u32, bibliography_format: impl Into<String>) -> Self {
        Self {
            filters: RepositoryFilters::default(),
            selection: DocumentSelection::new(),
            max_results,
            format: bibliography_format.into(),
            documents: Slot::new("repository_search"),
            overview: Slot::new("repository_overview"),
            detail: Slot::new("repository_document"),
            quality: Slot::new("repository_quality"),
            usage: Slot::new("repository_usage"),
            export: Slot::new("bibliography_export"),
            validation: None,
        }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn bibliography_format(&self) -> &str {
        &self.format
    }

    pub fn set_bibliography_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    pub fn documents(&self) -> &Slot<Vec<DocumentSummary>> {
        &self.documents
    }

    pub fn overview(&self) -> &Slot<RepositoryStats> {
        &self.overview
    }

    pub fn detail(&self) -> &Slot<DocumentDetail> {
        &self.detail
    }

    pub fn quality(&self) -> &Slot<QualityReport> {
        &self.quality
    }

    pub fn usage(&self) -> &Slot<UsageAnalytics> {
        &self.usage
    }

    pub fn export(&self) -> &Slot<Bibliography> {
        &self.export
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Select every document in the current result list.
    pub fn select_all_results(&mut self) {
        if let Some(docs) = self.documents.value() {
            self.selection
                .select_all(docs.iter().map(|d| d.document_id.as_str()));
        }
    }

    // ── Search ───────────────────────────────────────────────────────────────

    pub fn begin_search(&mut self) -> PendingSearch {
        let filters = self.filters.to_search(self.max_results);
        let ticket = self.documents.begin();
        info!(ticket = %ticket, query = %filters.query, "repository search");
        PendingSearch { ticket, filters }
    }

    pub fn complete_search(
        &mut self,
        ticket: Ticket,
        result: CdsResult<Vec<DocumentSummary>>,
    ) -> Completion {
        self.documents.complete(ticket, result)
    }

    pub async fn search(&mut self, api: &dyn ClinicalApi) -> CdsResult<&[DocumentSummary]> {
        let pending = self.begin_search();
        let result = api.search_documents(&pending.filters).await;
        let failure = result.as_ref().err().cloned();
        self.complete_search(pending.ticket, result);
        match failure {
            Some(e) => Err(e),
            None => Ok(self.documents.value().map(Vec::as_slice).unwrap_or(&[])),
        }
    }

    // ── Export ───────────────────────────────────────────────────────────────

    /// Validate the selection and start an export of exactly those ids.
    pub fn begin_export(&mut self) -> CdsResult<PendingExport> {
        if self.selection.is_empty() {
            self.validation = Some(EMPTY_SELECTION_MESSAGE.to_string());
            return Err(CdsError::validation(EMPTY_SELECTION_MESSAGE));
        }
        self.validation = None;
        let ticket = self.export.begin();
        info!(
            ticket = %ticket,
            documents = self.selection.len(),
            format = %self.format,
            "bibliography export"
        );
        Ok(PendingExport {
            ticket,
            document_ids: self.selection.ids().to_vec(),
            format: self.format.clone(),
        })
    }

    pub fn complete_export(&mut self, ticket: Ticket, result: CdsResult<Bibliography>) -> Completion {
        self.export.complete(ticket, result)
    }

    /// Export the selection and return the bibliography text.
    pub async fn export_bibliography(&mut self, api: &dyn ClinicalApi) -> CdsResult<Bibliography> {
        let pending = self.begin_export()?;
        let result = api
            .export_bibliography(&pending.document_ids, &pending.format)
            .await;
        let outcome = result.clone();
        self.complete_export(pending.ticket, result);
        outcome
    }

    // ── Single-shot loads ────────────────────────────────────────────────────

    pub fn begin_overview(&mut self) -> Ticket {
        self.overview.begin()
    }

    pub fn complete_overview(&mut self, ticket: Ticket, result: CdsResult<RepositoryStats>) -> Completion {
        self.overview.complete(ticket, result)
    }

    pub async fn load_overview(&mut self, api: &dyn ClinicalApi) -> CdsResult<()> {
        let ticket = self.begin_overview();
        let result = api.repository_overview().await;
        let failure = result.as_ref().err().cloned();
        self.complete_overview(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    pub fn begin_detail(&mut self) -> Ticket {
        self.detail.begin()
    }

    pub fn complete_detail(&mut self, ticket: Ticket, result: CdsResult<DocumentDetail>) -> Completion {
        self.detail.complete(ticket, result)
    }

    pub async fn open(&mut self, api: &dyn ClinicalApi, document_id: &str) -> CdsResult<()> {
        let ticket = self.begin_detail();
        let result = api.get_document(document_id).await;
        let failure = result.as_ref().err().cloned();
        self.complete_detail(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    pub fn close_detail(&mut self) {
        self.detail.reset();
    }

    pub fn begin_quality(&mut self) -> Ticket {
        self.quality.begin()
    }

    pub fn complete_quality(&mut self, ticket: Ticket, result: CdsResult<QualityReport>) -> Completion {
        self.quality.complete(ticket, result)
    }

    pub async fn load_quality(&mut self, api: &dyn ClinicalApi) -> CdsResult<()> {
        let ticket = self.begin_quality();
        let result = api.quality_report().await;
        let failure = result.as_ref().err().cloned();
        self.complete_quality(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    pub fn begin_usage(&mut self) -> Ticket {
        self.usage.begin()
    }

    pub fn complete_usage(&mut self, ticket: Ticket, result: CdsResult<UsageAnalytics>) -> Completion {
        self.usage.complete(ticket, result)
    }

    pub async fn load_usage(&mut self, api: &dyn ClinicalApi) -> CdsResult<()> {
        let ticket = self.begin_usage();
        let result = api.usage_analytics().await;
        let failure = result.as_ref().err().cloned();
        self.complete_usage(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    /// Clear filters, results, selection, and detail. Overview, quality and
    /// usage are left loaded.
    pub fn reset(&mut self) {
        self.filters = RepositoryFilters::default();
        self.selection.clear();
        self.documents.reset();
        self.detail.reset();
        self.export.reset();
        self.validation = None;
    }
}

impl Default for RepositoryExplorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS, DEFAULT_BIBLIOGRAPHY_FORMAT)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
