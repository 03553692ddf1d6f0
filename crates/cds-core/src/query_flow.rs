//! Clinical query submission flow.
//!
//! ```text
//!   Idle ──submit──▶ Submitting ──ok──▶ Success
//!     ▲                  │
//!     │                  └──err──▶ Error
//!     └──────── clear_form ◀──────────┘
//! ```
//!
//! Submission is guarded by non-blank query text. A validation failure issues
//! no request and leaves the state unchanged. A failed request keeps the last
//! good response on screen next to the error banner.

use std::collections::VecDeque;

use tracing::{debug, info};

use cds_contracts::{
    clinical::{ClinicalQuery, ClinicalResponse, PatientContext, QueryType, Urgency},
    error::{CdsError, CdsResult},
};

use crate::generation::{Completion, Slot, Ticket};
use crate::traits::ClinicalApi;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a clinical question";
pub const QUERY_IN_FLIGHT_MESSAGE: &str = "A query is already being processed";

// ── History ──────────────────────────────────────────────────────────────────

/// Recently submitted query texts, most recent first.
///
/// Bounded and free of duplicates. Re-submitting an entry moves it to the
/// front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl QueryHistory {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.entries.retain(|e| e != &text);
        self.entries.push_front(text);
        self.entries.truncate(self.capacity);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

// ── Form ─────────────────────────────────────────────────────────────────────

/// Everything the user has typed into the query page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryForm {
    pub query: String,
    pub patient_context: PatientContext,
    pub query_type: QueryType,
    pub urgency: Urgency,
}

impl QueryForm {
    /// Build the request body, or a validation error for blank text.
    ///
    /// An all-empty patient context is left out of the request.
    pub fn to_query(&self) -> CdsResult<ClinicalQuery> {
        let text = self.query.trim();
        if text.is_empty() {
            return Err(CdsError::validation(EMPTY_QUERY_MESSAGE));
        }

        let context = self.patient_context.normalized();
        Ok(ClinicalQuery {
            query: text.to_string(),
            patient_context: (!context.is_empty()).then_some(context),
            query_type: Some(self.query_type),
            urgency: Some(self.urgency),
        })
    }
}

// ── Flow ─────────────────────────────────────────────────────────────────────

/// The externally visible state of the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Idle,
    Submitting,
    Success,
    /// Carries the user-facing message.
    Error(String),
}

/// A submission that has passed validation and is waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub query: ClinicalQuery,
}

/// State holder for the clinical query page.
#[derive(Debug, Clone)]
pub struct QueryFlow {
    pub form: QueryForm,
    result: Slot<ClinicalResponse>,
    history: QueryHistory,
    validation: Option<String>,
    in_flight: Option<String>,
}

impl QueryFlow {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            form: QueryForm::default(),
            result: Slot::new("clinical_query"),
            history: QueryHistory::new(history_capacity),
            validation: None,
            in_flight: None,
        }
    }

    pub fn state(&self) -> QueryState {
        if self.result.is_loading() {
            QueryState::Submitting
        } else if let Some(message) = self.result.error() {
            QueryState::Error(message.to_string())
        } else if self.result.value().is_some() {
            QueryState::Success
        } else {
            QueryState::Idle
        }
    }

    /// The last good response, kept even when a later submit failed.
    pub fn response(&self) -> Option<&ClinicalResponse> {
        self.result.value()
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Inline validation message from the last rejected submit.
    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Validate the form and move to `Submitting`.
    ///
    /// Rejected while another submission is in flight.
    pub fn begin_submit(&mut self) -> CdsResult<PendingQuery> {
        if self.result.is_loading() {
            debug!("submit ignored, query already in flight");
            return Err(CdsError::validation(QUERY_IN_FLIGHT_MESSAGE));
        }

        let query = match self.form.to_query() {
            Ok(q) => q,
            Err(e) => {
                self.validation = Some(e.user_message());
                return Err(e);
            }
        };

        self.validation = None;
        self.in_flight = Some(query.query.clone());
        let ticket = self.result.begin();
        info!(
            ticket = %ticket,
            query_type = ?query.query_type,
            has_patient_context = query.patient_context.is_some(),
            "submitting clinical query"
        );
        Ok(PendingQuery { ticket, query })
    }

    /// Apply the outcome of a submission. Success records the query text in
    /// the history.
    pub fn complete(&mut self, ticket: Ticket, result: CdsResult<ClinicalResponse>) -> Completion {
        let succeeded = result.is_ok();
        let completion = self.result.complete(ticket, result);
        if completion.is_applied() {
            if let Some(text) = self.in_flight.take() {
                if succeeded {
                    self.history.push(text);
                }
            }
        }
        completion
    }

    /// Submit through `api` and wait for the result. The caller gets the
    /// backend's outcome as-is; the flow keeps its own copy.
    pub async fn submit(&mut self, api: &dyn ClinicalApi) -> CdsResult<ClinicalResponse> {
        let pending = self.begin_submit()?;
        let result = api.submit_query(&pending.query).await;
        let outcome = result.clone();
        self.complete(pending.ticket, result);
        outcome
    }

    /// Put a history entry back into the query box.
    pub fn recall(&mut self, index: usize) -> bool {
        match self.history.get(index) {
            Some(text) => {
                self.form.query = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Reset the form, response, and error. History is kept, and an in-flight
    /// submission is orphaned.
    pub fn clear_form(&mut self) {
        self.form = QueryForm::default();
        self.result.reset();
        self.validation = None;
        self.in_flight = None;
    }
}

impl Default for QueryFlow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
