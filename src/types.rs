//! Core shared types for the rugscope analysis system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A base58-encoded Solana account address.
///
/// Kept as a string in the domain model; `solana_sdk::pubkey::Pubkey` is only
/// used at the input boundary to validate format before any fetch happens.
pub type Address = String;

/// Severity of a single risk finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single qualitative risk observation produced by a detector.
///
/// Findings are append-only: once constructed they are never mutated, and the
/// evidence map is a `BTreeMap` so repeated runs over identical input render
/// byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Stable machine-readable kind, e.g. "instant_dump" or "bundled_supply".
    pub kind: String,
    pub severity: Severity,
    /// Detector confidence in this finding, 0-100.
    pub confidence: u8,
    pub description: String,
    /// Supporting metric values, keyed by metric name.
    pub evidence: BTreeMap<String, String>,
}

impl RiskFinding {
    pub fn new(
        kind: impl Into<String>,
        severity: Severity,
        confidence: u8,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            severity,
            confidence: confidence.min(100),
            description: description.into(),
            evidence: BTreeMap::new(),
        }
    }

    /// Attach an evidence value. Builder-style so detectors can chain.
    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }
}

/// Overall verdict attached to a token report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Safe,
    Warning,
    Avoid,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Warning => "WARNING",
            Verdict::Avoid => "AVOID",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete letter grade derived from a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a bounded score onto the fixed grade breakpoints.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_breakpoints() {
        assert_eq!(Grade::from_score(100), Grade::APlus);
        assert_eq!(Grade::from_score(90), Grade::APlus);
        assert_eq!(Grade::from_score(89), Grade::A);
        assert_eq!(Grade::from_score(70), Grade::B);
        assert_eq!(Grade::from_score(69), Grade::C);
        assert_eq!(Grade::from_score(50), Grade::D);
        assert_eq!(Grade::from_score(49), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_finding_confidence_clamped() {
        let finding = RiskFinding::new("test", Severity::Low, 150, "clamped");
        assert_eq!(finding.confidence, 100);
    }

    #[test]
    fn test_finding_evidence_is_ordered() {
        let finding = RiskFinding::new("test", Severity::Low, 10, "ordered")
            .with_evidence("zebra", "1")
            .with_evidence("alpha", "2");
        let keys: Vec<_> = finding.evidence.keys().cloned().collect();
        assert_eq!(keys, vec!["alpha".to_string(), "zebra".to_string()]);
    }
}
