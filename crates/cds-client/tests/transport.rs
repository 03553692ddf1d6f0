//! Error mapping when the backend cannot be reached.

use cds_client::HttpClinicalApi;
use cds_contracts::error::{CdsError, GENERIC_ERROR_MESSAGE};
use cds_core::{traits::ClinicalApi, DrugInteractionChecker, QueryFlow};

// Nothing listens on the discard port in the test environment.
const UNREACHABLE: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let api = HttpClinicalApi::new(UNREACHABLE).unwrap();
    match api.health().await {
        Err(CdsError::Transport { reason }) => assert!(!reason.is_empty()),
        other => panic!("expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn query_flow_shows_generic_message_on_transport_failure() {
    let api = HttpClinicalApi::new(UNREACHABLE).unwrap();
    let mut flow = QueryFlow::default();
    flow.form.query = "65-year-old male with chest pain, elevated troponins".to_string();

    assert!(flow.submit(&api).await.is_err());

    assert_eq!(
        flow.state(),
        cds_core::query_flow::QueryState::Error(GENERIC_ERROR_MESSAGE.to_string())
    );
    assert!(flow.history().is_empty());
}

#[tokio::test]
async fn checker_validation_runs_before_any_connection() {
    let api = HttpClinicalApi::new(UNREACHABLE).unwrap();
    let mut checker = DrugInteractionChecker::new();
    checker.medications.update(0, "Warfarin");

    // A validation error, not a transport error, proves no request was made.
    let err = checker.check(&api).await.unwrap_err();
    assert!(err.is_validation());
}
