use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AMOUNT_RANGE;
use crate::promotion::SiteFamily;

/// An upstream torrent listing item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub title: String,
    /// Detail page URL.
    #[serde(default)]
    pub link: Option<String>,
    /// Set by the filter. Every entry of a run gets exactly one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl CandidateEntry {
    pub fn new(title: impl Into<String>, link: Option<String>) -> Self {
        Self {
            title: title.into(),
            link,
            verdict: None,
        }
    }

    /// The link, if present and not blank.
    pub fn link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    pub fn accept(&mut self, reason: impl Into<String>, remember: bool) {
        self.verdict = Some(Verdict::Accepted {
            reason: reason.into(),
            remember,
        });
    }

    pub fn reject(&mut self, reason: impl Into<String>) {
        self.verdict = Some(Verdict::Rejected {
            reason: reason.into(),
        });
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.verdict, Some(Verdict::Accepted { .. }))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.verdict, Some(Verdict::Rejected { .. }))
    }

    pub fn reason(&self) -> Option<&str> {
        self.verdict.as_ref().map(Verdict::reason)
    }
}

/// Outcome attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Accepted {
        reason: String,
        /// Whether the caller should remember the accepted entry. False when
        /// the accept came from a non-matching entry under `action = reject`.
        remember: bool,
    },
    Rejected {
        reason: String,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Accepted { reason, .. } | Verdict::Rejected { reason } => reason,
        }
    }
}

/// Totals for one run. `capped` and `failed` are subsets of `rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub accepted: usize,
    pub rejected: usize,
    /// Rejected because the per-run amount was exhausted.
    pub capped: usize,
    /// Rejected because detection failed or the entry had no link.
    pub failed: usize,
}

impl RunSummary {
    pub(crate) fn new(run_id: String) -> Self {
        Self {
            run_id,
            accepted: 0,
            rejected: 0,
            capped: 0,
            failed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Run preconditions that were not met. No entry is touched when one fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigInvalid {
    #[error(
        "amount {0} is out of range [{min}, {max}]",
        min = AMOUNT_RANGE.start(),
        max = AMOUNT_RANGE.end()
    )]
    AmountOutOfRange(i64),

    #[error("entries carry no link, the input must provide detail page links")]
    MissingLink,

    #[error("not_hr is not supported for {family} ({link})")]
    HrUnsupportedSite { family: SiteFamily, link: String },
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid run configuration: {0}")]
    ConfigInvalid(#[from] ConfigInvalid),
}
