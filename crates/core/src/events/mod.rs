//! Detection events and the recorders that receive them.

mod recorder;
mod types;

pub use recorder::*;
pub use types::*;
