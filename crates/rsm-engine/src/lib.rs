//! Orchestration for the ruleset merge engine.
//!
//! Ties the leaf crates together for one or many targets:
//!
//! ```text
//! RulesetStore::load ──► for each URL: SourceFetcher::fetch ──► codec::parse_bytes
//!                                                        └──► MergeSet::absorb
//!                    ──► RulesetStore::save (once)
//! ```
//!
//! # Key Types
//!
//! - [`RsmConfig`] — TOML configuration: directories, timeout, workers, targets
//! - [`TargetPlan`] — one target plus where its URLs come from
//! - [`Orchestrator`] — runs plans; per-source failures never abort a target,
//!   per-target failures never abort a batch
//! - [`BatchReport`] / [`TargetReport`] / [`SourceReport`] — what happened
//! - [`Compiler`] — optional wrapper around the sing-box / mihomo compilers

pub mod compiler;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod sources;

pub use compiler::{CompileOutcome, Compiler, CompilerKind};
pub use config::{CompilerSettings, CompilerTable, RsmConfig, TargetConfig, TargetPlan};
pub use error::{CompileError, ConfigError, EngineError, EngineResult};
pub use orchestrator::Orchestrator;
pub use report::{
    BatchReport, FailureStage, SourceOutcome, SourceReport, TargetOutcome, TargetReport,
    WriteSummary,
};
pub use sources::{parse_source_list, read_source_list};
