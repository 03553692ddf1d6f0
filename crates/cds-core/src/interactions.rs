//! Drug interaction checker.
//!
//! A check sends exactly one interactions request with the trimmed non-blank
//! medication names. If that succeeds, one summary request per medication is
//! issued concurrently and every one of them is awaited. Individual summary
//! failures are kept as `SummaryOutcome::Failed` so the UI can flag a partial
//! result.

use std::cmp::Reverse;

use futures::future::join_all;
use tracing::{info, warn};

use cds_contracts::{
    drug::{DrugInteraction, DrugSummary, PatientFactors, PatientSpecificCheck},
    error::{CdsError, CdsResult},
};

use crate::generation::{Completion, Slot, Ticket};
use crate::traits::ClinicalApi;

pub const MIN_MEDICATIONS: usize = 2;
pub const TOO_FEW_MEDICATIONS_MESSAGE: &str =
    "Please enter at least 2 medications to check interactions";

// ── Medication inputs ────────────────────────────────────────────────────────

/// Ordered medication input rows. Never shorter than one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationList {
    rows: Vec<String>,
}

impl MedicationList {
    pub fn new() -> Self {
        Self {
            rows: vec![String::new()],
        }
    }

    /// Build from existing names. An empty input yields a single blank row.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<String> = names.into_iter().map(Into::into).collect();
        if rows.is_empty() {
            rows.push(String::new());
        }
        Self { rows }
    }

    /// Append a blank row and return its index.
    pub fn add(&mut self) -> usize {
        self.rows.push(String::new());
        self.rows.len() - 1
    }

    pub fn update(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove a row. Refused for the last remaining row.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(String::as_str)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut String> {
        self.rows.get_mut(index)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed, non-blank names in row order.
    pub fn valid(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn can_check(&self) -> bool {
        self.valid().len() >= MIN_MEDICATIONS
    }
}

impl Default for MedicationList {
    fn default() -> Self {
        Self::new()
    }
}

// ── Results ──────────────────────────────────────────────────────────────────

/// Result of one per-drug summary lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Ok(DrugSummary),
    Failed { drug: String, reason: String },
}

impl SummaryOutcome {
    pub fn drug(&self) -> &str {
        match self {
            SummaryOutcome::Ok(summary) => &summary.drug,
            SummaryOutcome::Failed { drug, .. } => drug,
        }
    }

    pub fn summary(&self) -> Option<&DrugSummary> {
        match self {
            SummaryOutcome::Ok(summary) => Some(summary),
            SummaryOutcome::Failed { .. } => None,
        }
    }
}

/// Everything one check produced, ready to be rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    /// Most severe first.
    pub interactions: Vec<DrugInteraction>,
    /// In medication order.
    pub summaries: Vec<SummaryOutcome>,
}

impl CheckReport {
    pub fn failed_summaries(&self) -> impl Iterator<Item = &SummaryOutcome> {
        self.summaries
            .iter()
            .filter(|s| matches!(s, SummaryOutcome::Failed { .. }))
    }

    pub fn is_partial(&self) -> bool {
        self.failed_summaries().next().is_some()
    }
}

/// Order interactions most severe first. Unrecognized severities go last;
/// ties keep their original order.
pub fn sort_by_severity(interactions: &mut [DrugInteraction]) {
    interactions.sort_by_key(|i| Reverse(i.severity.rank()));
}

/// Run one check against `api`: the interactions request, then the summary
/// fan-out.
///
/// Only a failed interactions request fails the whole check.
pub async fn run_check(api: &dyn ClinicalApi, medications: &[String]) -> CdsResult<CheckReport> {
    let mut interactions = api.check_drug_interactions(medications).await?;
    sort_by_severity(&mut interactions);

    let lookups = medications.iter().map(|drug| async move {
        match api.drug_summary(drug).await {
            Ok(summary) => SummaryOutcome::Ok(summary),
            Err(e) => {
                warn!(drug = %drug, error = %e, "drug summary lookup failed");
                SummaryOutcome::Failed {
                    drug: drug.clone(),
                    reason: e.to_string(),
                }
            }
        }
    });
    let summaries = join_all(lookups).await;

    info!(
        medications = medications.len(),
        interactions = interactions.len(),
        failed_summaries = summaries
            .iter()
            .filter(|s| matches!(s, SummaryOutcome::Failed { .. }))
            .count(),
        "interaction check finished"
    );

    Ok(CheckReport {
        interactions,
        summaries,
    })
}

// ── Patient-specific check ───────────────────────────────────────────────────

/// Interactions among the valid rows of `medications`, annotated for the
/// patient's age and organ function. Same two-medication minimum as the
/// checker; no per-drug summaries are fetched.
pub async fn run_patient_check(
    api: &dyn ClinicalApi,
    medications: &MedicationList,
    factors: &PatientFactors,
) -> CdsResult<PatientSpecificCheck> {
    let names = medications.valid();
    if names.len() < MIN_MEDICATIONS {
        return Err(CdsError::validation(TOO_FEW_MEDICATIONS_MESSAGE));
    }

    let mut check = api.patient_specific_check(&names, factors).await?;
    check
        .interactions
        .sort_by_key(|i| Reverse(i.interaction.severity.rank()));
    info!(
        medications = names.len(),
        interactions = check.interactions.len(),
        age = ?factors.age,
        "patient-specific check finished"
    );
    Ok(check)
}

// ── Checker ──────────────────────────────────────────────────────────────────

/// A validated check waiting to be sent.
#[derive(Debug, Clone)]
pub struct PendingCheck {
    pub ticket: Ticket,
    pub medications: Vec<String>,
}

/// State holder for the drug interactions page.
#[derive(Debug, Clone)]
pub struct DrugInteractionChecker {
    pub medications: MedicationList,
    report: Slot<CheckReport>,
    validation: Option<String>,
    checked: bool,
}

impl DrugInteractionChecker {
    pub fn new() -> Self {
        Self {
            medications: MedicationList::new(),
            report: Slot::new("drug_interactions"),
            validation: None,
            checked: false,
        }
    }

    pub fn report(&self) -> Option<&CheckReport> {
        self.report.value()
    }

    pub fn interactions(&self) -> &[DrugInteraction] {
        self.report
            .value()
            .map(|r| r.interactions.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.report.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.report.error()
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    /// Whether to show "no interactions found".
    ///
    /// True only when a check has completed, nothing is loading, the current
    /// inputs hold at least two medications, and the list is empty.
    pub fn shows_no_interactions(&self) -> bool {
        self.checked
            && !self.is_loading()
            && self.error().is_none()
            && self.medications.can_check()
            && self.interactions().is_empty()
    }

    /// Validate inputs and start a check.
    pub fn begin_check(&mut self) -> CdsResult<PendingCheck> {
        let medications = self.medications.valid();
        if medications.len() < MIN_MEDICATIONS {
            self.validation = Some(TOO_FEW_MEDICATIONS_MESSAGE.to_string());
            return Err(CdsError::validation(TOO_FEW_MEDICATIONS_MESSAGE));
        }

        self.validation = None;
        let ticket = self.report.begin();
        Ok(PendingCheck {
            ticket,
            medications,
        })
    }

    pub fn complete(&mut self, ticket: Ticket, result: CdsResult<CheckReport>) -> Completion {
        let succeeded = result.is_ok();
        let completion = self.report.complete(ticket, result);
        if completion.is_applied() && succeeded {
            self.checked = true;
        }
        completion
    }

    /// Validate, run the check through `api`, and apply the result.
    pub async fn check(&mut self, api: &dyn ClinicalApi) -> CdsResult<()> {
        let pending = self.begin_check()?;
        let result = run_check(api, &pending.medications).await;
        let failure = result.as_ref().err().cloned();
        self.complete(pending.ticket, result);
        failure.map_or(Ok(()), Err)
    }

    /// Back to a single blank row with no results.
    pub fn reset(&mut self) {
        self.medications = MedicationList::new();
        self.report.reset();
        self.validation = None;
        self.checked = false;
    }
}

impl Default for DrugInteractionChecker {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
