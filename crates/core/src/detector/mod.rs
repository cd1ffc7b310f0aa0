//! Promotion decision engine.
//!
//! For one entry link: fetch the detail page, check the session and torrent
//! validity, dispatch to the site family's parser, then compare the detected
//! promotion against the configured allow-set and H&R exclusion.

mod types;

pub use types::*;

use std::sync::Arc;

use crate::config::{FetcherConfig, PromotionConfig};
use crate::events::{DetectionEvent, EventRecorder};
use crate::fetcher::{FetchRequest, PageFetcher};
use crate::promotion::{
    check_validity, select_parser, DetectedPromotion, PageValidity, PromotionFacts, SiteFamily,
};

/// Decides whether a single entry's promotion matches the run configuration.
pub struct PromotionDetector {
    fetcher: Arc<dyn PageFetcher>,
    settings: FetcherConfig,
}

impl PromotionDetector {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: FetcherConfig) -> Self {
        Self { fetcher, settings }
    }

    pub fn fetcher_name(&self) -> &str {
        self.fetcher.name()
    }

    /// Run the full detection for one link.
    ///
    /// `not_hr` support for the link's family is a run precondition checked
    /// by the batch filter before any fetch.
    pub async fn decide(
        &self,
        link: &str,
        config: &PromotionConfig,
        recorder: &dyn EventRecorder,
    ) -> Result<DetectionOutcome, DetectionError> {
        recorder.record(DetectionEvent::DetectionStarted {
            link: link.to_string(),
        });

        let request = FetchRequest::new(link, &config.cookie, &self.settings);
        let page = match self.fetcher.fetch(&request).await {
            Ok(page) => page,
            Err(e) => {
                recorder.record(DetectionEvent::FetchFailed {
                    link: link.to_string(),
                    error: e.to_string(),
                    status: e.status(),
                });
                return Err(e.into());
            }
        };

        let validity = check_validity(&page.body, &config.username);
        if !validity.is_valid() {
            recorder.record(DetectionEvent::ValidityFailed {
                link: link.to_string(),
                reason: validity,
                body: page.body,
            });
            return Err(match validity {
                PageValidity::TorrentNotFound => {
                    DetectionError::InvalidTorrent(TorrentUnavailable::NotFound)
                }
                PageValidity::NoPermission => {
                    DetectionError::InvalidTorrent(TorrentUnavailable::NoPermission)
                }
                _ => DetectionError::InvalidSession,
            });
        }

        let family = select_parser(link);
        let facts = family.extract(&page.body);

        if !facts.anchor_found {
            recorder.record(DetectionEvent::AnchorMissing {
                link: link.to_string(),
                family,
            });
        }
        if let DetectedPromotion::Unsupported(raw) = &facts.promotion {
            recorder.record(DetectionEvent::UnsupportedLabel {
                link: link.to_string(),
                family,
                raw_label: raw.clone(),
            });
        }
        recorder.record(DetectionEvent::PromotionDetected {
            link: link.to_string(),
            family,
            promotion: facts.promotion.clone(),
            is_hr: facts.is_hr,
        });

        Ok(evaluate(family, facts, config))
    }
}

/// Apply the run policy to extracted facts.
///
/// H&R exclusion takes precedence over the label. Unsupported labels never
/// match.
pub fn evaluate(
    family: SiteFamily,
    facts: PromotionFacts,
    config: &PromotionConfig,
) -> DetectionOutcome {
    let hr_excluded = config.not_hr && facts.is_hr;
    let matched = !hr_excluded
        && facts
            .promotion
            .known()
            .is_some_and(|promotion| config.allows(promotion));

    DetectionOutcome {
        matched,
        promotion: facts.promotion,
        is_hr: facts.is_hr,
        hr_excluded,
        family,
    }
}
