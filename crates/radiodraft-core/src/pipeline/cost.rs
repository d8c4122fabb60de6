//! Per-run cost accumulation.
//!
//! Every stage attributes a fixed estimate to itself whether it succeeded
//! or fell back. The ledger records one entry per stage and the run total
//! is always the plain sum of those entries.

use std::fmt;

/// Pipeline stage a cost is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Triage call.
    Triage,
    /// Findings call.
    Findings,
    /// Report drafting call.
    Report,
}

impl Stage {
    /// Lowercase stage name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Triage => "triage",
            Stage::Findings => "findings",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of stage costs for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct CostLedger {
    entries: Vec<(Stage, f64)>,
}

impl CostLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cost of a stage as attributed by the stage itself.
    pub fn record(&mut self, stage: Stage, cost: f64) {
        self.entries.push((stage, cost));
    }

    /// Sum of all recorded costs.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Recorded entries in insertion order.
    pub fn entries(&self) -> &[(Stage, f64)] {
        &self.entries
    }

    /// Cost recorded for `stage`, if any.
    pub fn cost_of(&self, stage: Stage) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, c)| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ledger_totals_zero() {
        let ledger = CostLedger::new();
        assert_eq!(ledger.total(), 0.0);
        assert!(ledger.entries().is_empty());
    }

    #[test]
    fn total_is_sum_of_entries() {
        let mut ledger = CostLedger::new();
        ledger.record(Stage::Triage, 0.01);
        ledger.record(Stage::Findings, 0.06);
        ledger.record(Stage::Report, 0.02);
        assert_eq!(ledger.total(), 0.01 + 0.06 + 0.02);
        assert_eq!(ledger.cost_of(Stage::Findings), Some(0.06));
        assert_eq!(
            ledger.entries().iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec![Stage::Triage, Stage::Findings, Stage::Report]
        );
    }

    #[test]
    fn recorded_cost_is_kept_as_given() {
        let mut ledger = CostLedger::new();
        ledger.record(Stage::Report, 0.02);
        assert_eq!(ledger.cost_of(Stage::Report), Some(0.02));
        assert_eq!(ledger.cost_of(Stage::Triage), None);
    }

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::Triage.to_string(), "triage");
        assert_eq!(Stage::Findings.to_string(), "findings");
        assert_eq!(Stage::Report.to_string(), "report");
    }
}
