//! Canonical promotion labels.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::site::SiteFamily;
use super::tables;

/// Canonical promotion vocabulary shared by every site family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Promotion {
    Free,
    TwoUp,
    HalfDown,
    TwoUpFree,
    TwoUpHalfDown,
    ThirtyPercent,
    /// No promotion marker on the page.
    None,
}

impl Promotion {
    pub const ALL: [Promotion; 7] = [
        Promotion::Free,
        Promotion::TwoUp,
        Promotion::HalfDown,
        Promotion::TwoUpFree,
        Promotion::TwoUpHalfDown,
        Promotion::ThirtyPercent,
        Promotion::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Promotion::Free => "free",
            Promotion::TwoUp => "twoup",
            Promotion::HalfDown => "halfdown",
            Promotion::TwoUpFree => "twoupfree",
            Promotion::TwoUpHalfDown => "twouphalfdown",
            Promotion::ThirtyPercent => "thirtypercent",
            Promotion::None => "none",
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Promotion as read from a page.
///
/// `Unsupported` keeps the raw label of a marker that the family's
/// conversion table does not know. It never matches an allow-set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum DetectedPromotion {
    Known(Promotion),
    Unsupported(String),
}

impl DetectedPromotion {
    pub fn known(&self) -> Option<Promotion> {
        match self {
            DetectedPromotion::Known(p) => Some(*p),
            DetectedPromotion::Unsupported(_) => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, DetectedPromotion::Unsupported(_))
    }
}

impl fmt::Display for DetectedPromotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedPromotion::Known(p) => write!(f, "{}", p),
            DetectedPromotion::Unsupported(raw) => write!(f, "unsupported: {}", raw),
        }
    }
}

/// Map a raw marker label to the canonical vocabulary using the family's own
/// conversion table.
pub fn normalize(family: SiteFamily, raw: &str) -> DetectedPromotion {
    match tables::lookup(family.conversion_table(), raw) {
        Some(p) => DetectedPromotion::Known(p),
        None => DetectedPromotion::Unsupported(raw.to_string()),
    }
}
