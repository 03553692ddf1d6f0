//! Derived display values shared by the TUI and the CLI.
//!
//! Nothing here touches a terminal. Renderers map `Tone` to their own colors.

use cds_contracts::{
    clinical::ClinicalResponse,
    levels::{EvidenceLevel, Severity},
};

/// Semantic color class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Critical,
    Danger,
    Warning,
    Info,
    Success,
    Neutral,
}

pub fn severity_tone(severity: &Severity) -> Tone {
    match severity {
        Severity::Contraindicated => Tone::Critical,
        Severity::Major => Tone::Danger,
        Severity::Moderate => Tone::Warning,
        Severity::Minor => Tone::Info,
        Severity::Other(_) => Tone::Neutral,
    }
}

pub fn evidence_tone(level: &EvidenceLevel) -> Tone {
    match level {
        EvidenceLevel::A => Tone::Success,
        EvidenceLevel::B => Tone::Info,
        EvidenceLevel::C => Tone::Warning,
        EvidenceLevel::D => Tone::Danger,
        EvidenceLevel::Other(_) => Tone::Neutral,
    }
}

/// Tone for a 0–1 quality score. Scores on a 0–100 scale are accepted too.
pub fn quality_tone(score: f64) -> Tone {
    let score = normalize_fraction(score);
    if score >= 0.9 {
        Tone::Success
    } else if score >= 0.8 {
        Tone::Info
    } else if score >= 0.7 {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

/// Bring a score into [0, 1].
///
/// Non-finite values become 0. Values in (1, 100] are read as percentages.
pub fn normalize_fraction(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let value = if value > 1.0 && value <= 100.0 {
        value / 100.0
    } else {
        value
    };
    value.clamp(0.0, 1.0)
}

/// `0.85` → `"85%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", normalize_fraction(value) * 100.0)
}

/// `"contraindicated"` → `"CONTRAINDICATED"`, for badges.
pub fn severity_badge(severity: &Severity) -> String {
    severity.as_str().to_uppercase()
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

// ── Response sections ────────────────────────────────────────────────────────

/// A block of a clinical response. Empty lists produce no section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    RedFlags,
    Recommendations,
    DrugInteractions,
    DifferentialDiagnoses,
    NextSteps,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::RedFlags => "Red Flags",
            Section::Recommendations => "Clinical Recommendations",
            Section::DrugInteractions => "Drug Interactions",
            Section::DifferentialDiagnoses => "Differential Diagnoses",
            Section::NextSteps => "Next Steps",
        }
    }

    pub fn len(self, response: &ClinicalResponse) -> usize {
        match self {
            Section::RedFlags => response.red_flags.len(),
            Section::Recommendations => response.recommendations.len(),
            Section::DrugInteractions => response.drug_interactions.len(),
            Section::DifferentialDiagnoses => response.differential_diagnoses.len(),
            Section::NextSteps => response.next_steps.len(),
        }
    }
}

/// Sections to render for `response`, in display order.
pub fn sections(response: &ClinicalResponse) -> Vec<Section> {
    [
        Section::RedFlags,
        Section::Recommendations,
        Section::DrugInteractions,
        Section::DifferentialDiagnoses,
        Section::NextSteps,
    ]
    .into_iter()
    .filter(|s| s.len(response) > 0)
    .collect()
}

/// `"Processed in 1234 ms"`, when the backend reported a duration.
pub fn processing_note(response: &ClinicalResponse) -> Option<String> {
    response
        .processing_time_ms
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| format!("Processed in {:.0} ms", ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_tones() {
        assert_eq!(severity_tone(&Severity::Contraindicated), Tone::Critical);
        assert_eq!(severity_tone(&Severity::Major), Tone::Danger);
        assert_eq!(severity_tone(&Severity::Moderate), Tone::Warning);
        assert_eq!(severity_tone(&Severity::Minor), Tone::Info);
        assert_eq!(severity_tone(&Severity::Other("severe".into())), Tone::Neutral);
    }

    #[test]
    fn evidence_tones() {
        assert_eq!(evidence_tone(&EvidenceLevel::A), Tone::Success);
        assert_eq!(evidence_tone(&EvidenceLevel::B), Tone::Info);
        assert_eq!(evidence_tone(&EvidenceLevel::C), Tone::Warning);
        assert_eq!(evidence_tone(&EvidenceLevel::D), Tone::Danger);
        assert_eq!(evidence_tone(&EvidenceLevel::Other("E".into())), Tone::Neutral);
    }

    #[test]
    fn quality_tone_thresholds() {
        assert_eq!(quality_tone(0.95), Tone::Success);
        assert_eq!(quality_tone(0.9), Tone::Success);
        assert_eq!(quality_tone(0.85), Tone::Info);
        assert_eq!(quality_tone(0.7), Tone::Warning);
        assert_eq!(quality_tone(0.5), Tone::Danger);
        assert_eq!(quality_tone(92.0), Tone::Success);
    }

    #[test]
    fn percent_normalizes_both_scales() {
        assert_eq!(format_percent(0.85), "85%");
        assert_eq!(format_percent(85.0), "85%");
        assert_eq!(format_percent(1.0), "100%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn percent_clamps_and_handles_non_finite() {
        assert_eq!(format_percent(f64::NAN), "0%");
        assert_eq!(format_percent(f64::INFINITY), "0%");
        assert_eq!(format_percent(-0.2), "0%");
        assert_eq!(format_percent(250.0), "100%");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn empty_response_has_no_sections() {
        assert!(sections(&ClinicalResponse::default()).is_empty());
        assert_eq!(processing_note(&ClinicalResponse::default()), None);
    }

    #[test]
    fn only_populated_sections_render() {
        let resp = ClinicalResponse {
            red_flags: vec!["ST elevation".into()],
            next_steps: vec!["Cath lab".into()],
            processing_time_ms: Some(1234.4),
            ..ClinicalResponse::default()
        };
        assert_eq!(sections(&resp), vec![Section::RedFlags, Section::NextSteps]);
        assert_eq!(Section::RedFlags.len(&resp), 1);
        assert_eq!(processing_note(&resp).as_deref(), Some("Processed in 1234 ms"));
    }

    #[test]
    fn badge_uppercases() {
        assert_eq!(severity_badge(&Severity::Major), "MAJOR");
    }
}
