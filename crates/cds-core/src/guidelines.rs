//! Guideline explorer: search, then open one guideline in detail.
//!
//! The request plan depends on which filters are filled in:
//!
//! | query     | specialty | request                              |
//! |-----------|-----------|--------------------------------------|
//! | non-blank | any       | `POST /guidelines/search`            |
//! | blank     | set       | `GET /guidelines/specialty/{name}`   |
//! | blank     | unset     | none, validation message             |

use tracing::info;

use cds_contracts::{
    error::{CdsError, CdsResult},
    guideline::{DatabaseStats, DetailedGuideline, Guideline, GuidelineSearchRequest},
};

use crate::generation::{Completion, Slot, Ticket};
use crate::traits::ClinicalApi;

pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a search term or select a specialty";

/// Which request a guideline search turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidelineRequest {
    Search(GuidelineSearchRequest),
    BySpecialty(String),
}

impl GuidelineRequest {
    /// Decide the request for the given filters.
    pub fn plan(query: &str, specialty: Option<&str>, max_results: u32) -> CdsResult<Self> {
        let query = query.trim();
        let specialty = specialty.map(str::trim).filter(|s| !s.is_empty());

        match (query.is_empty(), specialty) {
            (false, specialty) => Ok(GuidelineRequest::Search(GuidelineSearchRequest {
                query: query.to_string(),
                specialty: specialty.map(str::to_string),
                organization: None,
                min_year: None,
                max_results,
            })),
            (true, Some(specialty)) => Ok(GuidelineRequest::BySpecialty(specialty.to_string())),
            (true, None) => Err(CdsError::validation(EMPTY_SEARCH_MESSAGE)),
        }
    }

    pub async fn send(&self, api: &dyn ClinicalApi) -> CdsResult<Vec<Guideline>> {
        match self {
            GuidelineRequest::Search(request) => api.search_guidelines(request).await,
            GuidelineRequest::BySpecialty(specialty) => {
                api.guidelines_by_specialty(specialty).await
            }
        }
    }
}

/// A planned search waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: Ticket,
    pub request: GuidelineRequest,
}

/// State holder for the guidelines page.
#[derive(Debug, Clone)]
pub struct GuidelineExplorer {
    pub query: String,
    pub specialty: Option<String>,
    max_results: u32,
    results: Slot<Vec<Guideline>>,
    detail: Slot<DetailedGuideline>,
    stats: Slot<DatabaseStats>,
    validation: Option<String>,
}

impl GuidelineExplorer {
    pub fn new(max_results: u32) -> Self {
        Self {
            query: String::new(),
            specialty: None,
            max_results,
            results: Slot::new("guideline_search"),
            detail: Slot::new("guideline_detail"),
            stats: Slot::new("guideline_stats"),
            validation: None,
        }
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn results(&self) -> &Slot<Vec<Guideline>> {
        &self.results
    }

    pub fn detail(&self) -> &Slot<DetailedGuideline> {
        &self.detail
    }

    pub fn stats(&self) -> &Slot<DatabaseStats> {
        &self.stats
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// True once a search completed with nothing in it.
    pub fn shows_no_results(&self) -> bool {
        !self.results.is_loading() && self.results.value().is_some_and(|r| r.is_empty())
    }

    // ── Search ───────────────────────────────────────────────────────────────

    pub fn begin_search(&mut self) -> CdsResult<PendingSearch> {
        let request =
            match GuidelineRequest::plan(&self.query, self.specialty.as_deref(), self.max_results) {
                Ok(r) => r,
                Err(e) => {
                    self.validation = Some(e.user_message());
                    return Err(e);
                }
            };
        self.validation = None;
        let ticket = self.results.begin();
        info!(ticket = %ticket, request = ?request, "guideline search");
        Ok(PendingSearch { ticket, request })
    }

    pub fn complete_search(&mut self, ticket: Ticket, result: CdsResult<Vec<Guideline>>) -> Completion {
        self.results.complete(ticket, result)
    }

    pub async fn search(&mut self, api: &dyn ClinicalApi) -> CdsResult<&[Guideline]> {
        let pending = self.begin_search()?;
        let result = pending.request.send(api).await;
        let failure = result.as_ref().err().cloned();
        self.complete_search(pending.ticket, result);
        match failure {
            Some(e) => Err(e),
            None => Ok(self.results.value().map(Vec::as_slice).unwrap_or(&[])),
        }
    }

    // ── Detail ───────────────────────────────────────────────────────────────

    pub fn begin_detail(&mut self) -> Ticket {
        self.detail.begin()
    }

    pub fn complete_detail(
        &mut self,
        ticket: Ticket,
        result: CdsResult<DetailedGuideline>,
    ) -> Completion {
        self.detail.complete(ticket, result)
    }

    /// Fetch and show the detail view of `id`.
    pub async fn open(&mut self, api: &dyn ClinicalApi, id: &str) -> CdsResult<&DetailedGuideline> {
        let ticket = self.begin_detail();
        let result = api.get_guideline(id).await;
        let failure = result.as_ref().err().cloned();
        self.complete_detail(ticket, result);
        match failure {
            Some(e) => Err(e),
            None => self
                .detail
                .value()
                .ok_or_else(|| CdsError::Decode { reason: format!("guideline '{}' missing", id) }),
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.reset();
    }

    // ── Stats ────────────────────────────────────────────────────────────────

    pub fn begin_stats(&mut self) -> Ticket {
        self.stats.begin()
    }

    pub fn complete_stats(&mut self, ticket: Ticket, result: CdsResult<DatabaseStats>) -> Completion {
        self.stats.complete(ticket, result)
    }

    pub async fn load_stats(&mut self, api: &dyn ClinicalApi) -> CdsResult<()> {
        let ticket = self.begin_stats();
        let result = api.guideline_database_stats().await;
        let failure = result.as_ref().err().cloned();
        self.complete_stats(ticket, result);
        failure.map_or(Ok(()), Err)
    }

    /// Clear filters, results, and any open detail.
    pub fn reset(&mut self) {
        self.query.clear();
        self.specialty = None;
        self.results.reset();
        self.detail.reset();
        self.validation = None;
    }
}

impl Default for GuidelineExplorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
