use serde::Serialize;
use thiserror::Error;

use crate::fetcher::FetchError;
use crate::promotion::{DetectedPromotion, SiteFamily};

/// Result of deciding one entry's promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionOutcome {
    /// The promotion is in the allow-set and the torrent is not H&R-excluded.
    pub matched: bool,
    /// Detected label, reported even when it did not match.
    pub promotion: DetectedPromotion,
    pub is_hr: bool,
    /// Rejected because `not_hr` is set and the torrent is H&R.
    pub hr_excluded: bool,
    pub family: SiteFamily,
}

/// Why a torrent page is not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TorrentUnavailable {
    #[error("no torrent with this id")]
    NotFound,
    #[error("no permission to view this torrent")]
    NoPermission,
}

/// Per-entry detection failures. None of them abort the run.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Failed to fetch detail page: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("Cookie expired or username not found on page")]
    InvalidSession,

    #[error("Torrent is not accessible: {0}")]
    InvalidTorrent(TorrentUnavailable),
}
