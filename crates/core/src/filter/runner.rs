use tracing::{debug, info};

use super::types::{CandidateEntry, ConfigInvalid, FilterError, RunSummary};
use crate::config::{FilterAction, PromotionConfig};
use crate::detector::{DetectionOutcome, PromotionDetector};
use crate::events::{DetectionEvent, EventRecorder};
use crate::promotion::select_parser;

/// Applies a run configuration to a batch of entries.
///
/// Entries are processed strictly in input order, one detail page fetch at a
/// time. At most `amount` entries are inspected per run; the rest are
/// rejected without a fetch.
pub struct PromotionFilter {
    detector: PromotionDetector,
}

impl PromotionFilter {
    pub fn new(detector: PromotionDetector) -> Self {
        Self { detector }
    }

    /// Attach a verdict to every entry.
    ///
    /// Returns `FilterError::ConfigInvalid` before touching any entry when a
    /// run precondition fails. Per-entry failures reject that entry only.
    pub async fn run(
        &self,
        entries: &mut [CandidateEntry],
        config: &PromotionConfig,
        recorder: &dyn EventRecorder,
    ) -> Result<RunSummary, FilterError> {
        let mut summary = RunSummary::new(uuid::Uuid::new_v4().to_string());
        if entries.is_empty() {
            debug!("No entries to filter");
            return Ok(summary);
        }

        check_preconditions(entries, config)?;
        // In range after the precondition check.
        let amount = config.amount as usize;

        recorder.record(DetectionEvent::RunStarted {
            run_id: summary.run_id.clone(),
            entries: entries.len(),
            amount: config.amount,
            action: config.action,
        });
        info!(
            "Filtering {} entries with {} (amount {})",
            entries.len(),
            self.detector.fetcher_name(),
            amount
        );

        for (index, entry) in entries.iter_mut().enumerate() {
            if index >= amount {
                entry.reject(format!("max amount [{}] reached", amount));
                summary.capped += 1;
            } else {
                match entry.link().map(str::to_string) {
                    None => {
                        entry.reject("entry has no link");
                        summary.failed += 1;
                    }
                    Some(link) => match self.detector.decide(&link, config, recorder).await {
                        Ok(outcome) => apply_outcome(entry, &outcome, config.action),
                        Err(e) => {
                            entry.reject(format!("promotion detection failed: {}", e));
                            summary.failed += 1;
                        }
                    },
                }
            }

            let accepted = entry.is_accepted();
            if accepted {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
            recorder.record(DetectionEvent::EntryVerdict {
                title: entry.title.clone(),
                link: entry.link.clone(),
                accepted,
                reason: entry.reason().unwrap_or_default().to_string(),
            });
        }

        if entries.len() > amount {
            info!(
                "Reached max amount [{}], {} entries rejected without inspection",
                amount, summary.capped
            );
        }

        recorder.record(DetectionEvent::RunFinished {
            run_id: summary.run_id.clone(),
            accepted: summary.accepted,
            rejected: summary.rejected,
            capped: summary.capped,
            failed: summary.failed,
        });

        Ok(summary)
    }
}

/// Checks that must pass before any entry is processed. The first entry must
/// carry a link; with `not_hr`, every linked entry must belong to a family
/// that renders an H&R marker.
pub fn check_preconditions(
    entries: &[CandidateEntry],
    config: &PromotionConfig,
) -> Result<(), ConfigInvalid> {
    if !config.amount_in_range() {
        return Err(ConfigInvalid::AmountOutOfRange(config.amount));
    }

    let Some(first) = entries.first() else {
        return Ok(());
    };
    first.link().ok_or(ConfigInvalid::MissingLink)?;

    if config.not_hr {
        // A mixed batch must not let a family without an H&R marker through.
        for link in entries.iter().filter_map(CandidateEntry::link) {
            let family = select_parser(link);
            if !family.exposes_hr() {
                return Err(ConfigInvalid::HrUnsupportedSite {
                    family,
                    link: link.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Turn a detection outcome into a verdict under the configured action.
fn apply_outcome(entry: &mut CandidateEntry, outcome: &DetectionOutcome, action: FilterAction) {
    let label = outcome.promotion.to_string();
    match (action, outcome.matched) {
        (FilterAction::Accept, true) => entry.accept(format!("promotion is [{}]", label), true),
        (FilterAction::Accept, false) => entry.reject(not_matched_reason(&label, outcome)),
        (FilterAction::Reject, true) => entry.reject(format!("promotion is [{}]", label)),
        (FilterAction::Reject, false) => entry.accept(not_matched_reason(&label, outcome), false),
    }
}

fn not_matched_reason(label: &str, outcome: &DetectionOutcome) -> String {
    if outcome.hr_excluded {
        format!("promotion [{}] not matched: torrent is H&R", label)
    } else {
        format!("promotion [{}] not matched", label)
    }
}
