//! Raw label → canonical promotion tables, one per site family.
//!
//! Tables are kept per family even where two of them currently hold the same
//! rows: a site may reword its markers without the others following.
//!
//! The `2X 50%` rows have never been observed on a live page. They are kept
//! as a best guess of the label and remain unconfirmed.

use super::Promotion;

pub type ConversionTable = &'static [(&'static str, Promotion)];

/// NexusPHP default template: the marker's CSS class is the label.
pub const NEXUSPHP: ConversionTable = &[
    ("free", Promotion::Free),
    ("twoup", Promotion::TwoUp),
    ("halfdown", Promotion::HalfDown),
    ("twoupfree", Promotion::TwoUpFree),
    ("twouphalfdown", Promotion::TwoUpHalfDown),
    ("thirtypercent", Promotion::ThirtyPercent),
];

/// bt.byr.cn, NexusPHP class names.
pub const BYR: ConversionTable = &[
    ("free", Promotion::Free),
    ("twoup", Promotion::TwoUp),
    ("halfdown", Promotion::HalfDown),
    ("twoupfree", Promotion::TwoUpFree),
    ("twouphalfdown", Promotion::TwoUpHalfDown),
    ("thirtypercent", Promotion::ThirtyPercent),
];

/// tjupt.org, NexusPHP class names.
pub const TJU: ConversionTable = &[
    ("free", Promotion::Free),
    ("twoup", Promotion::TwoUp),
    ("halfdown", Promotion::HalfDown),
    ("twoupfree", Promotion::TwoUpFree),
    ("twouphalfdown", Promotion::TwoUpHalfDown),
    ("thirtypercent", Promotion::ThirtyPercent),
];

/// ourbits.club, NexusPHP class names.
pub const OURBITS: ConversionTable = &[
    ("free", Promotion::Free),
    ("twoup", Promotion::TwoUp),
    ("halfdown", Promotion::HalfDown),
    ("twoupfree", Promotion::TwoUpFree),
    ("twouphalfdown", Promotion::TwoUpHalfDown),
    ("thirtypercent", Promotion::ThirtyPercent),
];

/// npupt.com, image `alt` text.
pub const NPU: ConversionTable = &[
    ("Free", Promotion::Free),
    ("2X Free", Promotion::TwoUpFree),
    ("50%", Promotion::HalfDown),
    ("2X 50%", Promotion::TwoUpHalfDown), // unconfirmed
    ("30%", Promotion::ThirtyPercent),
];

/// chdbits.co, image `alt` text.
pub const CHD: ConversionTable = &[
    ("Free", Promotion::Free),
    ("2X Free", Promotion::TwoUpFree),
    ("50%", Promotion::HalfDown),
    ("2X 50%", Promotion::TwoUpHalfDown), // unconfirmed
    ("30%", Promotion::ThirtyPercent),
];

/// hdchina.org, image `alt` text.
pub const HDC: ConversionTable = &[
    ("Free", Promotion::Free),
    ("2X Free", Promotion::TwoUpFree),
    ("50%", Promotion::HalfDown),
    ("2X 50%", Promotion::TwoUpHalfDown), // unconfirmed
    ("30%", Promotion::ThirtyPercent),
];

/// totheglory.im, the `<code>` in `pic/ico_<code>.gif`.
pub const TTG: ConversionTable = &[
    ("free", Promotion::Free),
    ("half", Promotion::HalfDown),
    ("30", Promotion::ThirtyPercent),
];

/// Exact lookup, ignoring surrounding whitespace.
pub fn lookup(table: ConversionTable, raw: &str) -> Option<Promotion> {
    let raw = raw.trim();
    table
        .iter()
        .find(|(label, _)| *label == raw)
        .map(|(_, promotion)| *promotion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotion::{normalize, DetectedPromotion, SiteFamily};

    const FAMILIES: [SiteFamily; 8] = [
        SiteFamily::NexusPhp,
        SiteFamily::Byr,
        SiteFamily::Tju,
        SiteFamily::Ourbits,
        SiteFamily::Npu,
        SiteFamily::Ttg,
        SiteFamily::Chd,
        SiteFamily::Hdc,
    ];

    #[test]
    fn test_every_row_normalizes_to_its_label() {
        for family in FAMILIES {
            for (raw, expected) in family.conversion_table() {
                assert_eq!(
                    normalize(family, raw),
                    DetectedPromotion::Known(*expected),
                    "{} / {}",
                    family,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_no_table_maps_to_none() {
        for family in FAMILIES {
            assert!(family
                .conversion_table()
                .iter()
                .all(|(_, p)| *p != Promotion::None));
        }
    }

    #[test]
    fn test_absent_labels_are_unsupported() {
        for family in FAMILIES {
            for raw in ["", "none", "2X", "FREE!", "ico_free"] {
                assert!(
                    normalize(family, raw).is_unsupported(),
                    "{} / {:?}",
                    family,
                    raw
                );
            }
        }
    }

    #[test]
    fn test_lookup_trims_whitespace() {
        assert_eq!(lookup(HDC, " 2X Free "), Some(Promotion::TwoUpFree));
        assert_eq!(lookup(TTG, "30\n"), Some(Promotion::ThirtyPercent));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup(CHD, "free"), None);
        assert_eq!(lookup(NEXUSPHP, "Free"), None);
    }

    #[test]
    fn test_unconfirmed_rows_present() {
        for table in [NPU, CHD, HDC] {
            assert_eq!(lookup(table, "2X 50%"), Some(Promotion::TwoUpHalfDown));
        }
    }
}
