use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FilterAction;
use crate::promotion::{DetectedPromotion, PageValidity, SiteFamily};

/// Structured events emitted while a run filters its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectionEvent {
    RunStarted {
        run_id: String,
        entries: usize,
        amount: i64,
        action: FilterAction,
    },
    DetectionStarted {
        link: String,
    },
    PromotionDetected {
        link: String,
        family: SiteFamily,
        promotion: DetectedPromotion,
        is_hr: bool,
    },
    /// A marker was found but its label is not in the family's table.
    UnsupportedLabel {
        link: String,
        family: SiteFamily,
        raw_label: String,
    },
    /// The family's anchor element was not on the page.
    AnchorMissing {
        link: String,
        family: SiteFamily,
    },
    ValidityFailed {
        link: String,
        reason: PageValidity,
        /// Full page body, kept for diagnosing expired cookies.
        body: String,
    },
    FetchFailed {
        link: String,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
    EntryVerdict {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        accepted: bool,
        reason: String,
    },
    RunFinished {
        run_id: String,
        accepted: usize,
        rejected: usize,
        capped: usize,
        failed: usize,
    },
}

impl DetectionEvent {
    /// Event type name as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            DetectionEvent::RunStarted { .. } => "run_started",
            DetectionEvent::DetectionStarted { .. } => "detection_started",
            DetectionEvent::PromotionDetected { .. } => "promotion_detected",
            DetectionEvent::UnsupportedLabel { .. } => "unsupported_label",
            DetectionEvent::AnchorMissing { .. } => "anchor_missing",
            DetectionEvent::ValidityFailed { .. } => "validity_failed",
            DetectionEvent::FetchFailed { .. } => "fetch_failed",
            DetectionEvent::EntryVerdict { .. } => "entry_verdict",
            DetectionEvent::RunFinished { .. } => "run_finished",
        }
    }
}

/// Envelope wrapping an event with the time it was recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DetectionEvent,
}

impl EventEnvelope {
    pub fn now(event: DetectionEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}
