//! Plain-text rendering of backend results.

use std::collections::BTreeMap;

use cds_contracts::{
    clinical::{ClinicalResponse, HealthStatus, QueryTypeInfo},
    drug::{DrugAlerts, PatientSpecificCheck},
    guideline::{DatabaseStats, DetailedGuideline, Guideline, SpecialtyAlerts},
    repository::{DocumentDetail, DocumentSummary, QualityReport, RepositoryStats, UsageAnalytics},
};
use cds_core::{
    interactions::SummaryOutcome,
    present::{self, Section},
    DrugInteractionChecker,
};

const ABSTRACT_WIDTH: usize = 160;

fn heading(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
}

fn bullets(items: &[String]) {
    for item in items {
        println!("  - {}", item);
    }
}

fn counts(title: &str, map: &BTreeMap<String, u32>) {
    if map.is_empty() {
        return;
    }
    println!("  {}:", title);
    for (key, count) in map {
        println!("    {:<28} {}", key, count);
    }
}

pub fn print_health(status: &HealthStatus) {
    let marker = if status.is_healthy() { "OK" } else { "DEGRADED" };
    println!(
        "{} {} {}",
        marker,
        status.service.as_deref().unwrap_or("backend"),
        status.version.as_deref().unwrap_or("")
    );
}

pub fn print_query_types(query_types: &[QueryTypeInfo]) {
    for info in query_types {
        println!("{:<20} {}", info.query_type, info.description);
    }
}

// ── Clinical query ───────────────────────────────────────────────────────────

pub fn print_response(response: &ClinicalResponse) {
    let sections = present::sections(response);
    if sections.is_empty() {
        println!("The backend returned no recommendations for this query.");
    }

    for section in sections {
        heading(section.title());
        match section {
            Section::RedFlags => bullets(&response.red_flags),
            Section::Recommendations => {
                for (i, rec) in response.recommendations.iter().enumerate() {
                    println!(
                        "  {}. {}  [evidence {}, confidence {}]",
                        i + 1,
                        rec.recommendation,
                        rec.evidence_level,
                        present::format_percent(rec.confidence_score)
                    );
                    if !rec.reasoning.is_empty() {
                        println!("     Reasoning: {}", rec.reasoning);
                    }
                    for c in &rec.contraindications {
                        println!("     Contraindication: {}", c);
                    }
                    for m in &rec.monitoring {
                        println!("     Monitor: {}", m);
                    }
                    for source in &rec.sources {
                        println!("     Source: {} ({})", source.title, source.evidence_level);
                    }
                }
            }
            Section::DrugInteractions => {
                for i in &response.drug_interactions {
                    println!(
                        "  [{}] {} + {}: {}",
                        present::severity_badge(&i.severity),
                        i.drug1,
                        i.drug2,
                        i.description
                    );
                }
            }
            Section::DifferentialDiagnoses => bullets(&response.differential_diagnoses),
            Section::NextSteps => bullets(&response.next_steps),
        }
    }

    if let Some(note) = present::processing_note(response) {
        println!();
        println!("{}", note);
    }
}

// ── Drug interactions ────────────────────────────────────────────────────────

pub fn print_check(checker: &DrugInteractionChecker) {
    if checker.shows_no_interactions() {
        println!("No interactions found between the entered medications.");
    }

    let interactions = checker.interactions();
    if !interactions.is_empty() {
        heading("Interactions");
        for i in interactions {
            println!(
                "  [{}] {} + {}",
                present::severity_badge(&i.severity),
                i.drug1,
                i.drug2
            );
            println!("      {}", i.description);
            if let Some(mechanism) = &i.mechanism {
                println!("      Mechanism:  {}", mechanism);
            }
            if !i.management.is_empty() {
                println!("      Management: {}", i.management);
            }
        }
    }

    let Some(report) = checker.report() else {
        return;
    };
    if report.summaries.is_empty() {
        return;
    }
    heading("Per-drug profiles");
    for outcome in &report.summaries {
        match outcome {
            SummaryOutcome::Ok(summary) => println!(
                "  {:<24} {} known interactions",
                summary.drug, summary.total_interactions
            ),
            SummaryOutcome::Failed { drug, .. } => {
                println!("  {:<24} profile unavailable", drug)
            }
        }
    }
    if report.is_partial() {
        println!();
        println!("Some drug profiles could not be loaded; results are partial.");
    }
}

pub fn print_patient_check(check: &PatientSpecificCheck) {
    let factors = &check.patient_factors;
    let mut described = Vec::new();
    if let Some(age) = factors.age {
        described.push(format!("age {}", age));
    }
    if let Some(kidney) = &factors.kidney_function {
        described.push(format!("kidney {}", kidney));
    }
    if let Some(liver) = &factors.liver_function {
        described.push(format!("liver {}", liver));
    }
    println!("Patient factors: {}", described.join(", "));

    if check.interactions.is_empty() {
        println!("No interactions found between the entered medications.");
        return;
    }
    heading("Interactions");
    for entry in &check.interactions {
        let i = &entry.interaction;
        println!(
            "  [{}] {} + {}",
            present::severity_badge(&i.severity),
            i.drug1,
            i.drug2
        );
        println!("      {}", i.description);
        if !i.management.is_empty() {
            println!("      Management: {}", i.management);
        }
        for caution in entry.considerations() {
            println!("      Caution:    {}", caution);
        }
    }
}

pub fn print_drug_alerts(alerts: &DrugAlerts) {
    heading(&format!("Clinical alerts: {}", alerts.drug));
    if alerts.alerts.is_empty() {
        println!(
            "  {}",
            alerts.message.as_deref().unwrap_or("No clinical alerts found")
        );
        return;
    }
    for alert in &alerts.alerts {
        println!("  [{}] {}", alert.level, alert.message);
        if !alert.description.is_empty() {
            println!("      {}", alert.description);
        }
        if !alert.action_required.is_empty() {
            println!("      Action: {}", alert.action_required);
        }
    }
    if let Some(summary) = &alerts.summary {
        println!();
        println!("{}", summary);
    }
}

// ── Guidelines ───────────────────────────────────────────────────────────────

pub fn print_guidelines(guidelines: &[Guideline]) {
    if guidelines.is_empty() {
        println!("No guidelines found.");
        return;
    }
    for g in guidelines {
        println!(
            "{:<28} {} ({} {}, evidence {})",
            g.id, g.title, g.organization, g.publication_year, g.evidence_level
        );
    }
}

pub fn print_guideline_detail(detail: &DetailedGuideline) {
    let g = &detail.guideline;
    heading(&g.title);
    println!("  {} · {} · {}", g.organization, g.specialty, g.publication_year);
    println!("  Evidence level {} · updated {}", g.evidence_level, g.last_updated);
    if let Some(doi) = &g.doi {
        println!("  DOI {}", doi);
    }
    println!();
    println!("{}", g.summary);

    if !detail.key_recommendations.is_empty() {
        heading("Key recommendations");
        for rec in &detail.key_recommendations {
            let grade = match (&rec.class, &rec.level_of_evidence) {
                (Some(c), Some(l)) => format!(" [class {}, LOE {}]", c, l),
                (Some(c), None) => format!(" [class {}]", c),
                (None, Some(l)) => format!(" [LOE {}]", l),
                (None, None) => String::new(),
            };
            println!("  - {}{}", rec.recommendation, grade);
        }
    }
    for (title, items) in [
        ("Contraindications", &detail.contraindications),
        ("Monitoring", &detail.monitoring_requirements),
        ("Patient populations", &detail.patient_populations),
        ("References", &detail.references),
    ] {
        if !items.is_empty() {
            heading(title);
            bullets(items);
        }
    }
}

pub fn print_guideline_stats(stats: &DatabaseStats) {
    heading("Guideline database");
    println!("  Total guidelines: {}", stats.total_guidelines);
    if let (Some(oldest), Some(latest)) = (stats.oldest_year, stats.latest_year) {
        println!("  Years covered:    {}–{}", oldest, latest);
    }
    counts("Specialties", &stats.specialties);
    counts("Organizations", &stats.organizations);
    counts("Evidence levels", &stats.evidence_levels);
}

pub fn print_specialty_alerts(alerts: &SpecialtyAlerts) {
    heading(&format!(
        "Clinical alerts: {} ({} guidelines)",
        alerts.specialty, alerts.total_guidelines
    ));
    if alerts.is_empty() {
        println!("  No alerts for this specialty.");
    }
    if !alerts.clinical_alerts.is_empty() {
        heading("Strong recommendations");
        for a in &alerts.clinical_alerts {
            println!("  - {} [LOE {}]", a.recommendation, a.evidence_level);
            println!("      {}", a.source_guideline);
        }
    }
    if !alerts.contraindications.is_empty() {
        heading("Contraindications");
        for c in &alerts.contraindications {
            println!("  - {} ({})", c.contraindication, c.organization);
        }
    }
    if !alerts.monitoring_requirements.is_empty() {
        heading("Monitoring");
        for m in &alerts.monitoring_requirements {
            println!("  - {} ({})", m.monitoring, m.organization);
        }
    }
    if !alerts.summary.is_empty() {
        println!();
        println!("{}", alerts.summary);
    }
}

// ── Repository ───────────────────────────────────────────────────────────────

pub fn print_documents(documents: &[DocumentSummary]) {
    if documents.is_empty() {
        println!("No documents found.");
        return;
    }
    for d in documents {
        println!(
            "{:<20} {}  [{} · evidence {} · quality {}]",
            d.document_id,
            d.title,
            d.document_type,
            d.evidence_level,
            present::format_percent(d.quality_score)
        );
        if !d.abstract_text.is_empty() {
            println!("    {}", present::truncate(&d.abstract_text, ABSTRACT_WIDTH));
        }
    }
}

pub fn print_document_detail(detail: &DocumentDetail) {
    heading(&detail.title);
    println!(
        "  {} · evidence {} · {} · {}",
        detail.document_type, detail.evidence_level, detail.publication_status, detail.access_level
    );
    if let Some(url) = &detail.source_url {
        println!("  {}", url);
    }
    println!();
    println!("{}", detail.abstract_text);
    if !detail.keywords.is_empty() {
        println!();
        println!("Keywords: {}", detail.keywords.join(", "));
    }
    if !detail.quality_metrics.is_empty() {
        heading("Quality");
        for (metric, value) in &detail.quality_metrics {
            println!("  {:<28} {}", metric, present::format_percent(*value));
        }
    }
}

pub fn print_repository_stats(stats: &RepositoryStats) {
    heading("Knowledge repository");
    println!("  Total documents: {}", stats.total_documents);
    counts("Document types", &stats.document_types);
    counts("Evidence levels", &stats.evidence_levels);
    counts("Access levels", &stats.access_levels);
    if !stats.quality_metrics.is_empty() {
        println!("  Quality:");
        for (metric, value) in &stats.quality_metrics {
            println!("    {:<28} {}", metric, present::format_percent(*value));
        }
    }
}

pub fn print_quality_report(report: &QualityReport) {
    let qa = &report.quality_assessment;
    heading("Repository quality");
    if !report.summary.overall_grade.is_empty() {
        println!("  Overall grade:    {}", report.summary.overall_grade);
    }
    println!(
        "  Overall quality:  {}",
        present::format_percent(qa.overall_quality_score)
    );
    println!(
        "  Evidence quality: {}",
        present::format_percent(qa.evidence_quality_score)
    );
    if !report.summary.strengths.is_empty() {
        heading("Strengths");
        bullets(&report.summary.strengths);
    }
    if !report.summary.improvement_areas.is_empty() {
        heading("Improvement areas");
        bullets(&report.summary.improvement_areas);
    }
    if !qa.recommendations.is_empty() {
        heading("Recommendations");
        bullets(&qa.recommendations);
    }
}

pub fn print_usage(usage: &UsageAnalytics) {
    match serde_json::to_string_pretty(usage) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", usage),
    }
}
