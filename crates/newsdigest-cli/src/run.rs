//! `run` and `targets` command handlers.

use anyhow::Context;
use newsdigest_core::{
    load_targets, validate_target_credentials, AppConfig, KeywordTarget, TargetsFile,
};
use newsdigest_feed::GoogleNewsClient;
use newsdigest_line::LineClient;
use newsdigest_llm::LlmFactory;
use newsdigest_pipeline::{DayWindow, NotifiedCache, RunReport, TargetOrchestrator, TargetOutcome};

/// Run the pipeline for all targets, or only `target_filter`.
///
/// When `dry_run` is `true`, prints the ranked candidates per target and
/// returns without summarizing, pushing, or writing the cache.
///
/// # Errors
///
/// Returns an error if the targets file is invalid, the filter names an
/// unknown target, credentials are missing, or a client cannot be built.
/// Per-target failures are reported in the run summary, not returned.
pub(crate) async fn run_digest(
    config: &AppConfig,
    target_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let targets_file = load_targets(&config.targets_path, config.default_provider)?;
    let targets = select_targets(&targets_file, target_filter)?;
    if !dry_run {
        validate_target_credentials(config, &targets)?;
    }

    tracing::info!(
        targets = targets.len(),
        dry_run,
        "starting news digest run"
    );

    let feed = GoogleNewsClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build Google News client")?
        .with_locale(&config.feed_language, &config.feed_country);
    let notifier = LineClient::new(
        &config.line_channel_access_token,
        config.utc_offset,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build LINE client")?;
    let summarizers = LlmFactory::from_config(config);
    let cache = NotifiedCache::load(&config.cache_path);
    let window = DayWindow::today(config.utc_offset);

    let mut orchestrator = TargetOrchestrator::new(feed, summarizers, notifier, cache, window);

    if dry_run {
        for target in &targets {
            match orchestrator.preview(target).await {
                Ok(items) => {
                    println!(
                        "dry-run: target '{}' has {} candidate(s)",
                        target.name,
                        items.len()
                    );
                    for item in &items {
                        println!(
                            "  {:.2}  {}  <{}>",
                            item.relevance_score.unwrap_or(0.0),
                            item.title,
                            item.url
                        );
                    }
                }
                Err(e) => println!("dry-run: target '{}' failed: {e}", target.name),
            }
        }
        return Ok(());
    }

    let report = orchestrator.run(&targets).await;
    print_report(&report);
    Ok(())
}

/// Print the configured targets with their summarizer and keywords.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded.
pub(crate) fn list_targets(config: &AppConfig) -> anyhow::Result<()> {
    let targets_file = load_targets(&config.targets_path, config.default_provider)?;
    for target in &targets_file.notification_targets {
        println!(
            "{} [{}] -> {}: {}",
            target.name,
            target.summarizer,
            target.recipient_id,
            target.keywords.join(", ")
        );
    }
    Ok(())
}

fn select_targets(
    targets_file: &TargetsFile,
    target_filter: Option<&str>,
) -> anyhow::Result<Vec<KeywordTarget>> {
    match target_filter {
        Some(name) => {
            let target = targets_file
                .target_by_name(name)
                .ok_or_else(|| anyhow::anyhow!("target '{name}' not found"))?;
            Ok(vec![target.clone()])
        }
        None => Ok(targets_file.notification_targets.clone()),
    }
}

fn print_report(report: &RunReport) {
    for entry in &report.targets {
        match &entry.outcome {
            TargetOutcome::Skipped => println!("{}: no new articles", entry.name),
            TargetOutcome::Committed { delivered } => {
                println!("{}: delivered {delivered} article(s)", entry.name);
            }
            TargetOutcome::Failed {
                stage,
                error,
                error_notified,
            } => {
                let notified = if *error_notified {
                    "error reported"
                } else {
                    "error report failed"
                };
                println!("{}: failed while {stage}: {error} ({notified})", entry.name);
            }
        }
    }
    println!(
        "run complete: {} committed, {} skipped, {} failed",
        report.committed_count(),
        report.skipped_count(),
        report.failed_count()
    );
}

#[cfg(test)]
mod tests {
    use newsdigest_core::{parse_targets, SummarizerProvider};

    use super::*;

    const TARGETS: &str = r"
notification_targets:
  - name: tech
    recipient_id: U1
    keywords: [AI]
  - name: markets
    recipient_id: U2
    keywords: [Nikkei]
";

    #[test]
    fn select_all_targets_without_filter() {
        let file = parse_targets(TARGETS, SummarizerProvider::Ollama).unwrap();
        let selected = select_targets(&file, None).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_single_target_by_name() {
        let file = parse_targets(TARGETS, SummarizerProvider::Ollama).unwrap();
        let selected = select_targets(&file, Some("markets")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].recipient_id, "U2");
    }

    #[test]
    fn unknown_target_is_an_error() {
        let file = parse_targets(TARGETS, SummarizerProvider::Ollama).unwrap();
        let err = select_targets(&file, Some("sports")).unwrap_err();
        assert!(err.to_string().contains("'sports' not found"));
    }
}
