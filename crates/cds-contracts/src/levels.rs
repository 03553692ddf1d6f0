//! Fixed clinical enumerations used for color-coding.
//!
//! Both enums keep unrecognized wire values in an `Other` variant instead of
//! failing to deserialize. Renderers map `Other` to a neutral treatment.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordinal classification of drug-interaction risk.
///
/// Known variants order as minor < moderate < major < contraindicated.
/// `Other` has no rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Contraindicated,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Major => "major",
            Severity::Contraindicated => "contraindicated",
            Severity::Other(raw) => raw.as_str(),
        }
    }

    /// Position on the ordinal scale, `None` for unrecognized values.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Severity::Minor => Some(0),
            Severity::Moderate => Some(1),
            Severity::Major => Some(2),
            Severity::Contraindicated => Some(3),
            Severity::Other(_) => None,
        }
    }

    /// Parse a wire value. Matching is case-insensitive and never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minor" => Severity::Minor,
            "moderate" => Severity::Moderate,
            "major" => Severity::Major,
            "contraindicated" => Severity::Contraindicated,
            _ => Severity::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::parse(&raw))
    }
}

/// Letter grade for the strength of clinical evidence (A strongest).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EvidenceLevel {
    A,
    B,
    C,
    D,
    Other(String),
}

impl EvidenceLevel {
    pub fn as_str(&self) -> &str {
        match self {
            EvidenceLevel::A => "A",
            EvidenceLevel::B => "B",
            EvidenceLevel::C => "C",
            EvidenceLevel::D => "D",
            EvidenceLevel::Other(raw) => raw.as_str(),
        }
    }

    /// Parse a wire value such as `"A"` or `"b"`. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => EvidenceLevel::A,
            "B" => EvidenceLevel::B,
            "C" => EvidenceLevel::C,
            "D" => EvidenceLevel::D,
            _ => EvidenceLevel::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for EvidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EvidenceLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EvidenceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EvidenceLevel::parse(&raw))
    }
}
