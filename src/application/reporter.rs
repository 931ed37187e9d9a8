//! Summary aggregation.
//!
//! Turns the registry listing and a counter snapshot into a `SummaryReport`.

use crate::domain::message::MessageDefinition;
use crate::domain::summary::{CodeSummary, SummaryReport};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds summary reports.
///
/// The reporter holds no state: the same definitions and snapshot always
/// produce the same report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryReporter;

impl SummaryReporter {
    /// Aggregate counts for every definition, in the order given.
    ///
    /// Codes missing from the snapshot count as zero and are only reflected
    /// in their severity bucket.
    pub fn report(
        definitions: &[Arc<MessageDefinition>],
        counts: &HashMap<Arc<str>, u64>,
    ) -> SummaryReport {
        let codes = definitions
            .iter()
            .map(|definition| CodeSummary {
                code: definition.code().to_string(),
                severity: definition.severity(),
                label: definition.label().to_string(),
                count: counts.get(definition.code()).copied().unwrap_or(0),
            })
            .collect();

        SummaryReport::from_codes(codes)
    }
}
