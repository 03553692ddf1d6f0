//! Clinical alert lookups for a single drug or a single specialty.
//!
//! One request each, no state. Blank input is rejected before anything is
//! sent.

use tracing::info;

use cds_contracts::{
    drug::DrugAlerts,
    error::{CdsError, CdsResult},
    guideline::SpecialtyAlerts,
};

use crate::traits::ClinicalApi;

pub const EMPTY_DRUG_MESSAGE: &str = "Please enter a drug name";
pub const EMPTY_SPECIALTY_MESSAGE: &str = "Please enter a specialty";

/// Alerts for `drug`, critical ones first.
pub async fn drug_alerts(api: &dyn ClinicalApi, drug: &str) -> CdsResult<DrugAlerts> {
    let drug = drug.trim();
    if drug.is_empty() {
        return Err(CdsError::validation(EMPTY_DRUG_MESSAGE));
    }

    let mut alerts = api.drug_clinical_alerts(drug).await?;
    alerts.alerts.sort_by_key(|a| !a.is_critical());
    info!(
        drug,
        critical = alerts.alerts.iter().filter(|a| a.is_critical()).count(),
        total = alerts.alerts.len(),
        "drug alerts loaded"
    );
    Ok(alerts)
}

pub async fn specialty_alerts(api: &dyn ClinicalApi, specialty: &str) -> CdsResult<SpecialtyAlerts> {
    let specialty = specialty.trim();
    if specialty.is_empty() {
        return Err(CdsError::validation(EMPTY_SPECIALTY_MESSAGE));
    }

    let alerts = api.guideline_clinical_alerts(specialty).await?;
    info!(
        specialty,
        guidelines = alerts.total_guidelines,
        alerts = alerts.clinical_alerts.len(),
        "specialty alerts loaded"
    );
    Ok(alerts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, MockApi};

    #[tokio::test]
    async fn drug_name_is_trimmed_before_sending() {
        let api = MockApi::new();
        let alerts = drug_alerts(&api, "  warfarin ").await.unwrap();
        assert_eq!(api.calls(), vec![Call::DrugAlerts("warfarin".to_string())]);
        assert_eq!(alerts.drug, "warfarin");
    }

    #[tokio::test]
    async fn blank_inputs_issue_no_request() {
        let api = MockApi::new();
        let err = drug_alerts(&api, "   ").await.unwrap_err();
        assert_eq!(err.user_message(), EMPTY_DRUG_MESSAGE);
        let err = specialty_alerts(&api, "").await.unwrap_err();
        assert_eq!(err.user_message(), EMPTY_SPECIALTY_MESSAGE);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn specialty_alerts_pass_backend_failure_through() {
        let api = MockApi::new().failing("guideline_clinical_alerts");
        let err = specialty_alerts(&api, "cardiology").await.unwrap_err();
        assert!(matches!(err, CdsError::Status { status: 500, .. }));
        assert_eq!(api.calls(), vec![Call::GuidelineAlerts("cardiology".to_string())]);
    }
}
