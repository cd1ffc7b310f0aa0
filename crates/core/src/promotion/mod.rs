//! Promotion detection on tracker detail pages.
//!
//! Every supported tracker renders the same facts (current promotion, Hit &
//! Run obligation) with its own markup. This module maps a detail page link to
//! a [`SiteFamily`], extracts the raw promotion marker with that family's
//! strategy and normalizes it through the family's conversion table.
//!
//! ```text
//! link → select_parser → SiteFamily::extract(body) → PromotionFacts
//! ```

mod label;
mod parser;
mod site;
pub mod tables;
mod validity;

pub use label::{normalize, DetectedPromotion, Promotion};
pub use parser::{MarkerLookup, PromotionFacts};
pub use site::{select_parser, SiteFamily, SITE_TABLE};
pub use validity::{check_validity, PageValidity, NO_PERMISSION_PHRASE, NO_SUCH_TORRENT_PHRASE};
