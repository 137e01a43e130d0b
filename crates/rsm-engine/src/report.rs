//! Per-source, per-target, and per-batch run reports.
//!
//! All report types serialize to JSON for `rsm merge --format json`.

use rsm_store::SaveOutcome;
use rsm_types::TargetId;
use serde::Serialize;

/// Where a skipped source failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Fetch,
    Decode,
    Parse,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Decode => "decode",
            Self::Parse => "parse",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceOutcome {
    /// The source's entries were folded into the target.
    Merged {
        seen: usize,
        added: usize,
        used_fallback: bool,
    },
    /// The source was skipped.
    Failed { stage: FailureStage, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub url: String,
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn is_merged(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Merged { .. })
    }
}

/// The written document of a completed target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Entries in the final document.
    pub total: usize,
    #[serde(flatten)]
    pub save: SaveOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TargetOutcome {
    Written(WriteSummary),
    /// The target aborted: unreadable source list, malformed local document,
    /// or a failed write.
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: TargetId,
    pub sources: Vec<SourceReport>,
    pub outcome: TargetOutcome,
}

impl TargetReport {
    pub fn failed(target: TargetId, error: impl std::fmt::Display) -> Self {
        Self {
            target,
            sources: Vec::new(),
            outcome: TargetOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn attempted(&self) -> usize {
        self.sources.len()
    }

    pub fn succeeded(&self) -> usize {
        self.sources.iter().filter(|s| s.is_merged()).count()
    }

    pub fn failed_sources(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Entries seen across all merged sources.
    pub fn seen(&self) -> usize {
        self.merged_counts().map(|(seen, _)| seen).sum()
    }

    /// Entries appended across all merged sources.
    pub fn added(&self) -> usize {
        self.merged_counts().map(|(_, added)| added).sum()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TargetOutcome::Failed { .. })
    }

    pub fn written(&self) -> Option<&WriteSummary> {
        match &self.outcome {
            TargetOutcome::Written(summary) => Some(summary),
            TargetOutcome::Failed { .. } => None,
        }
    }

    fn merged_counts(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sources.iter().filter_map(|s| match s.outcome {
            SourceOutcome::Merged { seen, added, .. } => Some((seen, added)),
            SourceOutcome::Failed { .. } => None,
        })
    }
}

/// Reports for a batch, in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub targets: Vec<TargetReport>,
}

impl BatchReport {
    /// Targets that were not aborted.
    pub fn completed(&self) -> usize {
        self.targets.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.targets.iter().filter(|t| t.is_failed()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}
