//! Promotion filter for private tracker torrent listings.
//!
//! Given entries with detail page links, fetches each page with the user's
//! session cookie, reads the site's promotion marker (free, 2x upload, 50%
//! download, ...) and H&R flag, and accepts or rejects the entry against the
//! configured allow-set.

pub mod config;
pub mod detector;
pub mod events;
pub mod fetcher;
pub mod filter;
pub mod promotion;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FetcherConfig,
    FilterAction, PromotionConfig, SanitizedConfig,
};
pub use detector::{DetectionError, DetectionOutcome, PromotionDetector, TorrentUnavailable};
pub use events::{
    DetectionEvent, EventEnvelope, EventRecorder, FanoutRecorder, JsonLinesRecorder,
    TracingRecorder,
};
pub use fetcher::{DetailPage, FetchError, FetchRequest, HttpPageFetcher, PageFetcher};
pub use filter::{CandidateEntry, ConfigInvalid, FilterError, PromotionFilter, RunSummary, Verdict};
pub use promotion::{
    check_validity, normalize, select_parser, DetectedPromotion, PageValidity, Promotion,
    PromotionFacts, SiteFamily,
};
