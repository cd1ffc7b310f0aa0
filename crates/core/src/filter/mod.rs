//! Batch filter: attaches an accept or reject verdict to every entry of a
//! run, inspecting at most `amount` detail pages.

mod runner;
mod types;

pub use runner::{check_preconditions, PromotionFilter};
pub use types::{CandidateEntry, ConfigInvalid, FilterError, RunSummary, Verdict};
