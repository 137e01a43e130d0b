use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rsm_codec::{parse_bytes, DecodePolicy};
use rsm_fetch::{HttpFetcher, SourceFetcher};
use rsm_merge::MergeSet;
use rsm_store::{FsRulesetStore, RulesetStore};
use rsm_types::{Entry, RuleDocument, TargetId};
use tracing::{debug, error, info, warn};

use crate::config::{RsmConfig, TargetPlan};
use crate::error::{EngineError, EngineResult};
use crate::report::{
    BatchReport, FailureStage, SourceOutcome, SourceReport, TargetOutcome, TargetReport,
    WriteSummary,
};
use crate::sources::read_source_list;

/// Runs targets: load the local document, fold every source into it in
/// order, save once.
///
/// Sources of one target are always processed sequentially. With more than
/// one worker, whole targets are spread over scoped threads.
pub struct Orchestrator {
    fetcher: Arc<dyn SourceFetcher>,
    store: Arc<dyn RulesetStore>,
    policy: DecodePolicy,
    workers: usize,
}

impl Orchestrator {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, store: Arc<dyn RulesetStore>) -> Self {
        Self {
            fetcher,
            store,
            policy: DecodePolicy::default(),
            workers: 1,
        }
    }

    /// Build an orchestrator with an HTTP fetcher and a filesystem store as
    /// described by `config`.
    pub fn from_config(config: &RsmConfig) -> EngineResult<Self> {
        let fetcher = HttpFetcher::new(config.http_options())?;
        let store = FsRulesetStore::new(&config.json_dir, &config.yaml_dir)
            .with_decode_policy(config.decode_policy());
        Ok(Self::new(Arc::new(fetcher), Arc::new(store))
            .with_decode_policy(config.decode_policy())
            .with_workers(config.workers))
    }

    /// Decode policy for remote payloads.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of targets processed concurrently. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    // ---- Single target ----

    /// Fold the entries of every URL, in order, into `doc`.
    ///
    /// A source that cannot be fetched, decoded, or parsed is reported and
    /// skipped. The document keeps its own version and extra fields; nothing
    /// but entries is taken from remote documents.
    pub fn merge_sources(
        &self,
        target: &TargetId,
        mut doc: RuleDocument,
        urls: &[String],
    ) -> (RuleDocument, Vec<SourceReport>) {
        let mut set = MergeSet::from_local(doc.take_entries());
        let mut reports = Vec::with_capacity(urls.len());

        for url in urls {
            let outcome = match self.fetch_entries(target, url) {
                Ok((entries, used_fallback)) => {
                    let absorbed = set.absorb(entries);
                    info!(
                        target = %target,
                        url = %url,
                        seen = absorbed.seen,
                        added = absorbed.added,
                        duplicates = absorbed.duplicates(),
                        "merged source"
                    );
                    SourceOutcome::Merged {
                        seen: absorbed.seen,
                        added: absorbed.added,
                        used_fallback,
                    }
                }
                Err((stage, message)) => {
                    warn!(target = %target, url = %url, %stage, error = %message, "skipping source");
                    SourceOutcome::Failed { stage, message }
                }
            };
            reports.push(SourceReport {
                url: url.clone(),
                outcome,
            });
        }

        doc.set_entries(set.into_entries());
        (doc, reports)
    }

    /// Run one target end to end. Failures are reported in the outcome,
    /// never returned.
    pub fn run_target(&self, plan: &TargetPlan) -> TargetReport {
        let target = &plan.target;

        let urls = match resolve_urls(plan) {
            Ok(urls) => urls,
            Err(e) => return self.abort(target.clone(), Vec::new(), e),
        };
        let local = match self.store.load(target) {
            Ok(doc) => doc,
            Err(e) => return self.abort(target.clone(), Vec::new(), e.into()),
        };
        debug!(target = %target, local = local.len(), sources = urls.len(), "starting target");

        let (merged, sources) = self.merge_sources(target, local, &urls);
        let total = merged.len();

        match self.store.save(target, &merged) {
            Ok(save) => {
                info!(
                    target = %target,
                    total,
                    changed = save.changed,
                    location = %save.location,
                    "target written"
                );
                TargetReport {
                    target: target.clone(),
                    sources,
                    outcome: TargetOutcome::Written(WriteSummary { total, save }),
                }
            }
            Err(e) => self.abort(target.clone(), sources, e.into()),
        }
    }

    // ---- Batch ----

    /// Run every plan independently and return the reports in plan order.
    ///
    /// A plan whose target already appeared earlier in `plans` fails without
    /// running, so no two workers ever write the same document.
    pub fn run_batch(&self, plans: &[TargetPlan]) -> BatchReport {
        let mut seen = HashSet::new();
        let runnable: Vec<bool> = plans.iter().map(|p| seen.insert(&p.target)).collect();

        let run = |index: usize| -> TargetReport {
            let plan = &plans[index];
            if runnable[index] {
                self.run_target(plan)
            } else {
                let err = EngineError::DuplicateTarget(plan.target.to_string());
                self.abort(plan.target.clone(), Vec::new(), err)
            }
        };

        let workers = self.workers.min(plans.len());
        if workers <= 1 {
            return BatchReport {
                targets: (0..plans.len()).map(run).collect(),
            };
        }

        debug!(workers, targets = plans.len(), "running batch on worker pool");
        let next = AtomicUsize::new(0);
        let slots: Vec<Mutex<Option<TargetReport>>> = plans.iter().map(|_| Mutex::new(None)).collect();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    if index >= plans.len() {
                        break;
                    }
                    let report = run(index);
                    *slots[index].lock().expect("lock poisoned") = Some(report);
                });
            }
        });

        let targets = slots
            .into_iter()
            .zip(plans)
            .map(|(slot, plan)| {
                slot.into_inner()
                    .expect("lock poisoned")
                    .unwrap_or_else(|| TargetReport::failed(plan.target.clone(), "target was not run"))
            })
            .collect();
        BatchReport { targets }
    }

    // ---- Internals ----

    fn fetch_entries(
        &self,
        target: &TargetId,
        url: &str,
    ) -> Result<(Vec<Entry>, bool), (FailureStage, String)> {
        let raw = self
            .fetcher
            .fetch(url)
            .map_err(|e| (FailureStage::Fetch, e.to_string()))?;
        let parsed = parse_bytes(&raw, target.format(), url, self.policy).map_err(|e| {
            let stage = if e.is_decode() {
                FailureStage::Decode
            } else {
                FailureStage::Parse
            };
            (stage, e.to_string())
        })?;
        if parsed.used_fallback {
            warn!(target = %target, url, "payload is not UTF-8, decoded as Latin-1");
        }
        let mut document = parsed.document;
        Ok((document.take_entries(), parsed.used_fallback))
    }

    fn abort(&self, target: TargetId, sources: Vec<SourceReport>, err: EngineError) -> TargetReport {
        error!(target = %target, error = %err, "target failed");
        TargetReport {
            target,
            sources,
            outcome: TargetOutcome::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// Inline URLs first, then those from the plan's source-list file.
fn resolve_urls(plan: &TargetPlan) -> EngineResult<Vec<String>> {
    let mut urls = plan.sources.clone();
    if let Some(file) = &plan.sources_file {
        urls.extend(read_source_list(file)?);
    }
    Ok(urls)
}
