//! Per-source outcome tracking for a single fan-out lookup.

use crate::models::ProviderId;

/// What one source produced for a lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Source returned a normalized record.
    Found,
    /// Source answered but had nothing for the token.
    NoData,
    /// Source failed; the failure was absorbed into a null contribution.
    Failed { message: String },
}

/// Record of a single source attempt.
#[derive(Clone, Debug)]
pub struct SourceAttempt {
    pub provider_id: ProviderId,
    pub outcome: SourceOutcome,
}

/// Outcomes of every source consulted for one lookup, in fan-out order.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<SourceAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, provider_id: ProviderId, outcome: SourceOutcome) {
        self.attempts.push(SourceAttempt {
            provider_id,
            outcome,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                SourceOutcome::Found => format!("{}: FOUND", a.provider_id),
                SourceOutcome::NoData => format!("{}: NO DATA", a.provider_id),
                SourceOutcome::Failed { message } => {
                    format!("{}: ERROR ({})", a.provider_id, message)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Check if any source produced a record.
    pub fn has_data(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.outcome == SourceOutcome::Found)
    }

    /// Failed sources and their messages.
    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                SourceOutcome::Failed { message } => Some((&a.provider_id, message.as_str())),
                _ => None,
            })
            .collect()
    }
}
