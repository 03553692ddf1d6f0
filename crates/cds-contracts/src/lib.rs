//! # cds-contracts
//!
//! Shared request/response shapes and error types for the clinical decision
//! support client.
//!
//! Every other crate in the workspace imports from here. No I/O and no
//! business logic lives in this crate: only data definitions, the fixed
//! clinical enumerations, and `CdsError`.

pub mod clinical;
pub mod drug;
pub mod error;
pub mod guideline;
pub mod levels;
pub mod repository;
pub mod timestamp;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use clinical::{ClinicalQuery, ClinicalResponse, PatientContext, QueryType, Urgency};
    use drug::{DrugAlerts, DrugInteraction, DrugSummary, PatientFactors, PatientSpecificCheck};
    use error::{CdsError, GENERIC_ERROR_MESSAGE};
    use guideline::{DatabaseStats, DetailedGuideline, SpecialtyAlerts};
    use levels::{EvidenceLevel, Severity};
    use repository::{Bibliography, DocumentSearchFilters, DocumentSummary, QualityReport};

    // ── Enumerations ─────────────────────────────────────────────────────────

    #[test]
    fn severity_parses_known_values_case_insensitively() {
        assert_eq!(Severity::parse("MAJOR"), Severity::Major);
        assert_eq!(Severity::parse(" contraindicated "), Severity::Contraindicated);
        assert_eq!(Severity::parse("minor"), Severity::Minor);
    }

    #[test]
    fn severity_keeps_unknown_values_instead_of_failing() {
        let s: Severity = serde_json::from_value(json!("catastrophic")).unwrap();
        assert_eq!(s, Severity::Other("catastrophic".to_string()));
        assert_eq!(s.rank(), None);
        assert_eq!(serde_json::to_value(&s).unwrap(), json!("catastrophic"));
    }

    #[test]
    fn severity_ranks_are_ordinal() {
        let ranks: Vec<u8> = [
            Severity::Minor,
            Severity::Moderate,
            Severity::Major,
            Severity::Contraindicated,
        ]
        .iter()
        .filter_map(Severity::rank)
        .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn evidence_level_accepts_a_through_d_and_preserves_others() {
        let levels: Vec<EvidenceLevel> =
            serde_json::from_value(json!(["A", "b", "C", "D", "Level 1"])).unwrap();
        assert_eq!(
            levels,
            vec![
                EvidenceLevel::A,
                EvidenceLevel::B,
                EvidenceLevel::C,
                EvidenceLevel::D,
                EvidenceLevel::Other("Level 1".to_string()),
            ]
        );
    }

    // ── ClinicalQuery ────────────────────────────────────────────────────────

    #[test]
    fn bare_query_serializes_without_optional_fields() {
        let q = ClinicalQuery::new("65-year-old male with chest pain, elevated troponins");
        let body = serde_json::to_value(&q).unwrap();
        assert_eq!(
            body,
            json!({ "query": "65-year-old male with chest pain, elevated troponins" })
        );
    }

    #[test]
    fn query_type_and_urgency_use_snake_case() {
        let mut q = ClinicalQuery::new("dose adjustment for renal impairment");
        q.query_type = Some(QueryType::DrugInteraction);
        q.urgency = Some(Urgency::Emergent);
        let body = serde_json::to_value(&q).unwrap();
        assert_eq!(body["query_type"], "drug_interaction");
        assert_eq!(body["urgency"], "emergent");
    }

    #[test]
    fn patient_context_medications_are_index_addressed() {
        let mut ctx = PatientContext::default();
        ctx.add_medication("Warfarin");
        ctx.add_medication("Warfarin");
        ctx.add_medication("Aspirin");

        // Duplicate text is allowed.
        assert_eq!(ctx.current_medications.len(), 3);

        assert!(ctx.update_medication(1, "Metformin"));
        assert!(!ctx.update_medication(7, "Nope"));
        assert_eq!(ctx.remove_medication(0).as_deref(), Some("Warfarin"));
        assert_eq!(ctx.current_medications, vec!["Metformin", "Aspirin"]);
        assert_eq!(ctx.remove_medication(5), None);
    }

    #[test]
    fn query_type_catalog_maps_known_kinds() {
        let catalog: clinical::QueryTypeCatalog = serde_json::from_value(json!({
            "query_types": [
                { "type": "drug_interaction", "description": "Drug interaction checking" },
                { "type": "imaging", "description": "Not a local kind" }
            ]
        }))
        .unwrap();
        assert_eq!(catalog.query_types[0].known(), Some(QueryType::DrugInteraction));
        assert_eq!(catalog.query_types[1].known(), None);
    }

    #[test]
    fn patient_context_normalized_drops_blank_entries() {
        let ctx = PatientContext {
            gender: Some("  ".to_string()),
            current_medications: vec!["".into(), " Lisinopril ".into()],
            allergies: vec!["penicillin".into(), "   ".into()],
            ..PatientContext::default()
        };
        let clean = ctx.normalized();
        assert_eq!(clean.gender, None);
        assert_eq!(clean.current_medications, vec!["Lisinopril"]);
        assert_eq!(clean.allergies, vec!["penicillin"]);
        assert!(PatientContext::default().is_empty());
        assert!(!clean.is_empty());
    }

    // ── ClinicalResponse ─────────────────────────────────────────────────────

    #[test]
    fn sparse_response_decodes_with_empty_lists() {
        let resp: ClinicalResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.recommendations.is_empty());
        assert!(resp.drug_interactions.is_empty());
        assert!(resp.differential_diagnoses.is_empty());
        assert!(resp.red_flags.is_empty());
        assert!(resp.next_steps.is_empty());
        assert!(resp.timestamp.is_none());
        assert!(resp.processing_time_ms.is_none());
    }

    #[test]
    fn full_response_decodes_naive_timestamp() {
        let resp: ClinicalResponse = serde_json::from_value(json!({
            "query_id": "9b1f",
            "recommendations": [{
                "recommendation": "Obtain ECG and serial troponins",
                "confidence_score": 0.85,
                "evidence_level": "A",
                "reasoning": "Classic presentation",
                "sources": [{ "title": "2020 AHA/ACC", "type": "guideline", "evidence_level": "A" }]
            }],
            "drug_interactions": [{
                "drug1": "warfarin", "drug2": "aspirin", "severity": "major",
                "description": "Bleeding risk", "management": "Monitor INR"
            }],
            "red_flags": ["Hemodynamic instability"],
            "timestamp": "2024-01-01T12:30:00.123456",
            "processing_time_ms": 12.5
        }))
        .unwrap();

        assert_eq!(resp.recommendations[0].evidence_level, EvidenceLevel::A);
        assert_eq!(resp.recommendations[0].sources[0].source_type, "guideline");
        assert_eq!(resp.drug_interactions[0].severity, Severity::Major);
        assert_eq!(
            resp.timestamp.unwrap().to_rfc3339(),
            "2024-01-01T12:30:00.123456+00:00"
        );
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let resp: ClinicalResponse =
            serde_json::from_value(json!({ "timestamp": "2024-01-01T00:00:00Z" })).unwrap();
        assert!(resp.timestamp.is_some());
    }

    #[test]
    fn garbage_timestamp_is_a_decode_error() {
        let result: Result<ClinicalResponse, _> =
            serde_json::from_value(json!({ "timestamp": "yesterday" }));
        assert!(result.is_err());
    }

    // ── Drugs ────────────────────────────────────────────────────────────────

    #[test]
    fn interaction_with_unknown_severity_still_decodes() {
        let i: DrugInteraction = serde_json::from_value(json!({
            "drug1": "a", "drug2": "b", "severity": "severe",
            "description": "", "management": ""
        }))
        .unwrap();
        assert_eq!(i.severity, Severity::Other("severe".to_string()));
    }

    #[test]
    fn drug_summary_counts_by_severity() {
        let summary: DrugSummary = serde_json::from_value(json!({
            "drug": "Warfarin",
            "normalized_name": "warfarin",
            "total_interactions": 3,
            "by_severity": {
                "major": [
                    { "interacting_drug": "aspirin", "severity": "major", "description": "" },
                    { "interacting_drug": "ibuprofen", "severity": "major", "description": "" }
                ]
            },
            "all_interactions": [
                { "interacting_drug": "aspirin", "severity": "major", "description": "" },
                { "interacting_drug": "ibuprofen", "severity": "major", "description": "" },
                { "interacting_drug": "amiodarone", "severity": "moderate", "description": "" }
            ]
        }))
        .unwrap();
        assert_eq!(summary.count_at(&Severity::Major), 2);
        assert_eq!(summary.count_at(&Severity::Minor), 0);
    }

    #[test]
    fn patient_specific_interactions_keep_base_fields_and_cautions() {
        let check: PatientSpecificCheck = serde_json::from_value(json!({
            "medications": ["warfarin", "amiodarone"],
            "patient_factors": { "age": 78, "kidney_function": "moderate", "liver_function": null },
            "interactions_found": 1,
            "interactions": [{
                "drug1": "warfarin", "drug2": "amiodarone", "severity": "major",
                "description": "Increased INR", "management": "Reduce warfarin dose",
                "geriatric_considerations": "Elderly patients may be at higher risk for adverse effects",
                "renal_considerations": "Use caution with moderate kidney function"
            }]
        }))
        .unwrap();

        assert_eq!(
            check.patient_factors,
            PatientFactors {
                age: Some(78),
                kidney_function: Some("moderate".into()),
                liver_function: None,
            }
        );
        let entry = &check.interactions[0];
        assert_eq!(entry.interaction.severity, Severity::Major);
        assert_eq!(entry.considerations().len(), 2);
        assert!(entry.considerations()[1].contains("kidney"));
    }

    #[test]
    fn patient_factors_serialize_only_what_is_set() {
        assert!(PatientFactors::default().is_empty());
        let f = PatientFactors { age: Some(12), ..PatientFactors::default() };
        assert_eq!(serde_json::to_value(&f).unwrap(), json!({ "age": 12 }));
    }

    #[test]
    fn drug_without_alerts_decodes_message_only_shape() {
        let alerts: DrugAlerts = serde_json::from_value(json!({
            "drug": "acetaminophen",
            "alerts": [],
            "message": "No clinical alerts found"
        }))
        .unwrap();
        assert!(alerts.alerts.is_empty());
        assert_eq!(alerts.total_alerts, None);
        assert_eq!(alerts.message.as_deref(), Some("No clinical alerts found"));

        let alerts: DrugAlerts = serde_json::from_value(json!({
            "drug": "warfarin",
            "total_alerts": 1,
            "alerts": [{
                "level": "CRITICAL",
                "message": "CONTRAINDICATED with MIFEPRISTONE",
                "description": "Bleeding",
                "action_required": "Do not use together"
            }],
            "summary": "1 contraindicated, 0 major interactions"
        }))
        .unwrap();
        assert!(alerts.alerts[0].is_critical());
    }

    // ── Guidelines ───────────────────────────────────────────────────────────

    #[test]
    fn specialty_alerts_decode_sourced_entries() {
        let alerts: SpecialtyAlerts = serde_json::from_value(json!({
            "specialty": "cardiology",
            "total_guidelines": 2,
            "clinical_alerts": [{
                "alert_type": "STRONG_RECOMMENDATION",
                "recommendation": "Beta-blocker after MI",
                "evidence_level": "A",
                "source_guideline": "2023 ACC/AHA"
            }],
            "contraindications": [
                { "contraindication": "Nitrates with PDE5 inhibitors", "source_guideline": "2023 ACC/AHA", "organization": "ACC" }
            ],
            "monitoring_requirements": [],
            "summary": "Found 1 strong recommendations, 1 contraindications, 0 monitoring requirements"
        }))
        .unwrap();
        assert_eq!(alerts.clinical_alerts[0].evidence_level, "A");
        assert_eq!(alerts.contraindications[0].organization, "ACC");
        assert!(!alerts.is_empty());
    }

    #[test]
    fn detailed_guideline_flattens_the_summary_fields() {
        let g: DetailedGuideline = serde_json::from_value(json!({
            "id": "ada_2024_diabetes",
            "title": "Standards of Care in Diabetes",
            "organization": "ADA",
            "specialty": "endocrinology",
            "publication_year": 2024,
            "evidence_level": "A",
            "last_updated": "2024-01-01",
            "summary": "…",
            "content": "…",
            "key_recommendations": [
                { "recommendation": "Metformin first line", "class": "I", "level_of_evidence": "A" }
            ],
            "references": ["Diabetes Care 2024;47:S1"]
        }))
        .unwrap();
        assert_eq!(g.guideline.id, "ada_2024_diabetes");
        assert_eq!(g.key_recommendations[0].class.as_deref(), Some("I"));
        assert!(g.contraindications.is_empty());
    }

    #[test]
    fn database_stats_accepts_string_year_keys() {
        let stats: DatabaseStats = serde_json::from_value(json!({
            "total_guidelines": 2,
            "publication_years": { "2023": 1, "2024": 1 },
            "latest_year": 2024,
            "oldest_year": 2023
        }))
        .unwrap();
        assert_eq!(stats.publication_years.len(), 2);
        assert!(stats.coverage_summary.is_none());
    }

    // ── Repository ───────────────────────────────────────────────────────────

    #[test]
    fn search_filters_omit_blank_optionals() {
        let f = DocumentSearchFilters {
            query: "sepsis".to_string(),
            specialty: Some("infectious_disease".to_string()),
            document_type: None,
            evidence_level: None,
            access_level: None,
            start_date: None,
            end_date: None,
            max_results: 50,
        };
        assert_eq!(
            serde_json::to_value(&f).unwrap(),
            json!({ "query": "sepsis", "specialty": "infectious_disease", "max_results": 50 })
        );
    }

    #[test]
    fn document_summary_maps_abstract_field() {
        let d: DocumentSummary = serde_json::from_value(json!({
            "document_id": "doc-1",
            "title": "SGLT2 inhibitors in HFrEF",
            "evidence_level": "B",
            "publication_date": "2023-05-01T00:00:00",
            "abstract": "Background…",
            "quality_score": 0.91
        }))
        .unwrap();
        assert_eq!(d.abstract_text, "Background…");
        assert!(d.publication_date.is_some());
    }

    #[test]
    fn quality_report_tolerates_missing_sections() {
        let r: QualityReport = serde_json::from_value(json!({
            "summary": { "overall_grade": "B" }
        }))
        .unwrap();
        assert_eq!(r.summary.overall_grade, "B");
        assert!(r.quality_assessment.recommendations.is_empty());
    }

    #[test]
    fn bibliography_text_joins_entries() {
        let b = Bibliography {
            bibliography: vec!["@article{a}".into(), "@article{b}".into()],
            ..Bibliography::default()
        };
        assert_eq!(b.to_text(), "@article{a}\n\n@article{b}\n");
        assert_eq!(Bibliography::default().to_text(), "");
    }

    #[test]
    fn entry_count_prefers_the_backend_total() {
        // Two documents requested, one unknown to the backend.
        let b: Bibliography = serde_json::from_value(json!({
            "format": "bibtex",
            "total_entries": 1,
            "bibliography": ["@article{a}"]
        }))
        .unwrap();
        assert_eq!(b.entry_count(), 1);

        let untallied = Bibliography {
            bibliography: vec!["A.".into(), "B.".into(), "C.".into()],
            ..Bibliography::default()
        };
        assert_eq!(untallied.entry_count(), 3);
    }

    // ── CdsError ─────────────────────────────────────────────────────────────

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = CdsError::validation("Please enter a clinical question");
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Please enter a clinical question");
    }

    #[test]
    fn non_validation_errors_collapse_to_generic_message() {
        let errors = [
            CdsError::Transport { reason: "connection refused".into() },
            CdsError::Status { status: 500, body: "{\"detail\":\"boom\"}".into() },
            CdsError::Decode { reason: "missing field".into() },
            CdsError::Config { reason: "bad url".into() },
            CdsError::Io { reason: "refs.bib: permission denied".into() },
        ];
        for err in &errors {
            assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
        }
    }

    #[test]
    fn io_error_names_the_path_and_is_not_a_config_error() {
        let err = CdsError::io(
            "/tmp/refs.bib",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(matches!(err, CdsError::Io { .. }));
        let msg = err.to_string();
        assert!(msg.starts_with("i/o error: /tmp/refs.bib"));
        assert!(msg.contains("permission denied"));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn status_error_display_includes_code() {
        let err = CdsError::Status { status: 404, body: "not found".into() };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
    }
}
