//! Emission summaries.
//!
//! A `SummaryReport` is a point-in-time view of how often each registered code
//! was emitted, bucketed by severity and listed per code. Codes that were
//! never emitted only show up as zero in their severity bucket.

use crate::domain::severity::Severity;
use serde::Serialize;
use std::fmt;

const BUCKETS: usize = Severity::ALL.len();

/// Emission count for one registered code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSummary {
    /// The message code
    pub code: String,
    /// Severity of the code
    pub severity: Severity,
    /// Format template, or the description for free-text codes
    pub label: String,
    /// Number of successful emissions
    pub count: u64,
}

/// Snapshot of emission counts per severity and per code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    totals: [u64; BUCKETS],
    codes: Vec<CodeSummary>,
}

impl SummaryReport {
    /// Build a report from per-code entries.
    ///
    /// Severity totals are derived from the entries. Entries with a zero
    /// count are left out of the per-code listing.
    pub fn from_codes(mut codes: Vec<CodeSummary>) -> Self {
        let mut totals = [0u64; BUCKETS];
        for entry in &codes {
            totals[entry.severity as usize] += entry.count;
        }
        codes.retain(|entry| entry.count > 0);
        Self { totals, codes }
    }

    /// Total emissions of all codes with this severity.
    pub fn total_for(&self, severity: Severity) -> u64 {
        self.totals[severity as usize]
    }

    /// Per-severity totals in ascending severity order.
    pub fn severity_totals(&self) -> impl Iterator<Item = (Severity, u64)> + '_ {
        Severity::ALL.into_iter().zip(self.totals.iter().copied())
    }

    /// Per-code entries of emitted codes, in registration order.
    pub fn codes(&self) -> &[CodeSummary] {
        &self.codes
    }

    /// Emission count for a code, if it was emitted at least once.
    pub fn count_for(&self, code: &str) -> Option<u64> {
        self.codes
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.count)
    }

    /// Total emissions across every code.
    pub fn total(&self) -> u64 {
        self.totals.iter().sum()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message summary:")?;
        for (severity, total) in self.severity_totals() {
            writeln!(f, "  {} = {}", severity, total)?;
        }
        writeln!(f)?;
        write!(f, "Message codes:")?;
        for entry in &self.codes {
            write!(f, "\n  {}: {} = {}", entry.code, entry.label, entry.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, severity: Severity, label: &str, count: u64) -> CodeSummary {
        CodeSummary {
            code: code.to_string(),
            severity,
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = SummaryReport::from_codes(Vec::new());
        assert_eq!(report.total(), 0);
        let expected = "Message summary:\n  DEBUG = 0\n  INFO = 0\n  WARNING = 0\n  \
                        ERROR = 0\n  CRITICAL = 0\n\nMessage codes:";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_totals_are_summed_per_severity() {
        let report = SummaryReport::from_codes(vec![
            entry("A", Severity::Error, "a", 2),
            entry("B", Severity::Error, "b", 3),
            entry("C", Severity::Info, "c", 0),
            entry("D", Severity::Critical, "d", 1),
        ]);

        assert_eq!(report.total_for(Severity::Error), 5);
        assert_eq!(report.total_for(Severity::Info), 0);
        assert_eq!(report.total_for(Severity::Critical), 1);
        assert_eq!(report.total_for(Severity::Debug), 0);
        assert_eq!(report.total(), 6);
        assert_eq!(report.count_for("B"), Some(3));
        assert_eq!(report.count_for("missing"), None);
    }

    #[test]
    fn test_codes_without_emissions_are_not_listed() {
        let report = SummaryReport::from_codes(vec![
            entry("A", Severity::Info, "a", 1),
            entry("B", Severity::Critical, "b", 0),
            entry("C", Severity::Info, "c", 2),
        ]);

        let listed: Vec<&str> = report.codes().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(listed, vec!["A", "C"]);
        assert_eq!(report.count_for("B"), None);
        assert_eq!(report.total_for(Severity::Critical), 0);
        assert!(report.to_string().ends_with("Message codes:\n  A: a = 1\n  C: c = 2"));
    }

    #[test]
    fn test_display_layout() {
        let report = SummaryReport::from_codes(vec![
            entry("ERR-001", Severity::Error, "basic error", 1),
            entry(
                "VAL-001",
                Severity::Warning,
                "Value {value1} is larger than {value2}",
                1,
            ),
        ]);

        let expected = "Message summary:\n\
                        \x20 DEBUG = 0\n\
                        \x20 INFO = 0\n\
                        \x20 WARNING = 1\n\
                        \x20 ERROR = 1\n\
                        \x20 CRITICAL = 0\n\
                        \n\
                        Message codes:\n\
                        \x20 ERR-001: basic error = 1\n\
                        \x20 VAL-001: Value {value1} is larger than {value2} = 1";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_severity_totals_order() {
        let report = SummaryReport::from_codes(vec![entry("A", Severity::Warning, "a", 4)]);
        let totals: Vec<(Severity, u64)> = report.severity_totals().collect();
        assert_eq!(totals.len(), 5);
        assert_eq!(totals[0], (Severity::Debug, 0));
        assert_eq!(totals[2], (Severity::Warning, 4));
    }
}
