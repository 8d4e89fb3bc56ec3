//! Per-target control loop with failure isolation between targets.

use newsdigest_core::{FeedSource, KeywordTarget, NewsItem, Notifier, SummarizerFactory};

use crate::cache::NotifiedCache;
use crate::collector::CollectionPipeline;
use crate::error::TargetError;
use crate::recency::DayWindow;
use crate::scorer;
use crate::summarize::SummarizationStage;

/// At most this many items are summarized and delivered per target per run.
pub const MAX_ITEMS_PER_TARGET: usize = 10;

/// Where a target was when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Collecting,
    Scoring,
    Summarizing,
    Notifying,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Collecting => write!(f, "collecting"),
            Stage::Scoring => write!(f, "scoring"),
            Stage::Summarizing => write!(f, "summarizing"),
            Stage::Notifying => write!(f, "notifying"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Nothing new today; no notification was sent.
    Skipped,
    /// The digest was delivered and its URLs recorded.
    Committed { delivered: usize },
    /// The target failed; `error_notified` says whether the error report got through.
    Failed {
        stage: Stage,
        error: String,
        error_notified: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub name: String,
    pub outcome: TargetOutcome,
}

/// One entry per target, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    #[must_use]
    pub fn committed_count(&self) -> usize {
        self.count(|o| matches!(o, TargetOutcome::Committed { .. }))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, TargetOutcome::Skipped))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, TargetOutcome::Failed { .. }))
    }

    /// Total items delivered across committed targets.
    #[must_use]
    pub fn delivered_total(&self) -> usize {
        self.targets
            .iter()
            .map(|t| match t.outcome {
                TargetOutcome::Committed { delivered } => delivered,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&TargetOutcome) -> bool) -> usize {
        self.targets.iter().filter(|t| pred(&t.outcome)).count()
    }
}

/// Text sent to a target's recipient when its run fails.
#[must_use]
pub fn describe_failure(target_name: &str, error: &TargetError) -> String {
    format!("An error occurred while processing target '{target_name}'.\n\n{error}")
}

/// Runs every target through fetch, filter, rank, summarize, notify, commit.
///
/// Owns the notified cache; all mutation goes through `&mut self`.
pub struct TargetOrchestrator<F, Z, N> {
    feed: F,
    summarizers: Z,
    notifier: N,
    cache: NotifiedCache,
    window: DayWindow,
}

impl<F, Z, N> TargetOrchestrator<F, Z, N>
where
    F: FeedSource,
    Z: SummarizerFactory,
    N: Notifier,
{
    /// `window` is the day every item of this run is classified against.
    pub fn new(
        feed: F,
        summarizers: Z,
        notifier: N,
        cache: NotifiedCache,
        window: DayWindow,
    ) -> Self {
        Self {
            feed,
            summarizers,
            notifier,
            cache,
            window,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &NotifiedCache {
        &self.cache
    }

    /// Process `targets` strictly in order. A failing target never stops the run.
    pub async fn run(&mut self, targets: &[KeywordTarget]) -> RunReport {
        let mut report = RunReport::default();

        for target in targets {
            let outcome = self.run_target(target).await;
            report.targets.push(TargetReport {
                name: target.name.clone(),
                outcome,
            });
        }

        tracing::info!(
            targets = report.targets.len(),
            committed = report.committed_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            delivered = report.delivered_total(),
            "run finished"
        );
        report
    }

    /// Process one target, reporting any failure to its recipient.
    pub async fn run_target(&mut self, target: &KeywordTarget) -> TargetOutcome {
        tracing::info!(target_name = %target.name, "processing target");

        match self.process(target).await {
            Ok(None) => {
                tracing::info!(target_name = %target.name, "no new items; skipping");
                TargetOutcome::Skipped
            }
            Ok(Some(delivered)) => {
                tracing::info!(target_name = %target.name, delivered, "target committed");
                TargetOutcome::Committed { delivered }
            }
            Err(e) => {
                let stage = e.stage();
                tracing::error!(
                    target_name = %target.name,
                    stage = %stage,
                    error = %e,
                    "target failed"
                );

                let message = describe_failure(&target.name, &e);
                let error_notified = match self
                    .notifier
                    .deliver_error(&target.recipient_id, &message)
                    .await
                {
                    Ok(()) => true,
                    Err(notify_err) => {
                        tracing::error!(
                            target_name = %target.name,
                            error = %notify_err,
                            "error notification also failed"
                        );
                        false
                    }
                };

                TargetOutcome::Failed {
                    stage,
                    error: e.to_string(),
                    error_notified,
                }
            }
        }
    }

    /// Collect and rank a target's items without summarizing, delivering, or
    /// touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Feed`] when every keyword query failed.
    pub async fn preview(&self, target: &KeywordTarget) -> Result<Vec<NewsItem>, TargetError> {
        let items = CollectionPipeline::new(&self.feed, self.window)
            .collect(&self.cache, &target.keywords)
            .await?;
        Ok(top_ranked(items, &target.keywords))
    }

    /// `Ok(None)` when there was nothing new to send.
    async fn process(&mut self, target: &KeywordTarget) -> Result<Option<usize>, TargetError> {
        let items = CollectionPipeline::new(&self.feed, self.window)
            .collect(&self.cache, &target.keywords)
            .await?;
        if items.is_empty() {
            return Ok(None);
        }

        let ranked = top_ranked(items, &target.keywords);

        let summarizer = self
            .summarizers
            .create(target.summarizer)
            .map_err(|e| TargetError::SummarizerInit {
                provider: target.summarizer,
                message: e.to_string(),
            })?;
        let summarized = SummarizationStage::new(summarizer)
            .summarize_all(ranked)
            .await;

        self.notifier
            .deliver(&target.recipient_id, &summarized, &target.name)
            .await
            .map_err(|e| TargetError::Delivery(e.to_string()))?;

        self.cache
            .add_notified(summarized.iter().map(|item| item.url.as_str()));

        Ok(Some(summarized.len()))
    }
}

fn top_ranked(items: Vec<NewsItem>, keywords: &[String]) -> Vec<NewsItem> {
    let mut ranked = scorer::rank(items, keywords);
    ranked.truncate(MAX_ITEMS_PER_TARGET);
    ranked
}
