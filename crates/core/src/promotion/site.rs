//! Site families and link dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tables::{self, ConversionTable};

/// A tracker template whose markup shape decides the extraction strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SiteFamily {
    /// Generic NexusPHP fallback.
    #[serde(rename = "nexusphp")]
    NexusPhp,
    Byr,
    Tju,
    Ourbits,
    Npu,
    Ttg,
    Chd,
    Hdc,
}

/// Host fragment → family, checked in order. First match wins.
///
/// Supporting a new site means adding a `SiteFamily` variant and a row here.
pub const SITE_TABLE: &[(&str, SiteFamily)] = &[
    ("hdchina.org", SiteFamily::Hdc),
    ("tjupt.org", SiteFamily::Tju),
    ("ourbits.club", SiteFamily::Ourbits),
    ("npupt.com", SiteFamily::Npu),
    ("bt.byr.cn", SiteFamily::Byr),
    ("totheglory.im", SiteFamily::Ttg),
    ("chdbits.co", SiteFamily::Chd),
];

/// Pick the extraction strategy for a detail page link.
///
/// Matching is a case-insensitive substring test against [`SITE_TABLE`];
/// unknown hosts use the generic NexusPHP parser.
pub fn select_parser(link: &str) -> SiteFamily {
    let link = link.to_ascii_lowercase();
    SITE_TABLE
        .iter()
        .find(|(fragment, _)| link.contains(fragment))
        .map(|(_, family)| *family)
        .unwrap_or(SiteFamily::NexusPhp)
}

impl SiteFamily {
    pub fn name(&self) -> &'static str {
        match self {
            SiteFamily::NexusPhp => "nexusphp",
            SiteFamily::Byr => "byr",
            SiteFamily::Tju => "tju",
            SiteFamily::Ourbits => "ourbits",
            SiteFamily::Npu => "npu",
            SiteFamily::Ttg => "ttg",
            SiteFamily::Chd => "chd",
            SiteFamily::Hdc => "hdc",
        }
    }

    /// Whether pages of this family carry a Hit & Run marker at all.
    pub fn exposes_hr(&self) -> bool {
        matches!(self, SiteFamily::Ourbits | SiteFamily::Ttg)
    }

    pub fn conversion_table(&self) -> ConversionTable {
        match self {
            SiteFamily::NexusPhp => tables::NEXUSPHP,
            SiteFamily::Byr => tables::BYR,
            SiteFamily::Tju => tables::TJU,
            SiteFamily::Ourbits => tables::OURBITS,
            SiteFamily::Npu => tables::NPU,
            SiteFamily::Ttg => tables::TTG,
            SiteFamily::Chd => tables::CHD,
            SiteFamily::Hdc => tables::HDC,
        }
    }
}

impl fmt::Display for SiteFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_known_sites() {
        let cases = [
            ("https://hdchina.org/details.php?id=1", SiteFamily::Hdc),
            ("https://www.tjupt.org/details.php?id=2", SiteFamily::Tju),
            ("https://ourbits.club/details.php?id=3", SiteFamily::Ourbits),
            ("https://npupt.com/details.php?id=4", SiteFamily::Npu),
            ("https://bt.byr.cn/details.php?id=5", SiteFamily::Byr),
            ("https://totheglory.im/t/6/", SiteFamily::Ttg),
            ("https://chdbits.co/details.php?id=7", SiteFamily::Chd),
        ];
        for (link, expected) in cases {
            assert_eq!(select_parser(link), expected, "{}", link);
        }
    }

    #[test]
    fn test_select_unknown_site_falls_back_to_generic() {
        assert_eq!(
            select_parser("https://pt.example.org/details.php?id=1"),
            SiteFamily::NexusPhp
        );
        assert_eq!(select_parser(""), SiteFamily::NexusPhp);
    }

    #[test]
    fn test_select_is_case_insensitive() {
        assert_eq!(
            select_parser("HTTPS://OurBits.Club/details.php?id=3"),
            SiteFamily::Ourbits
        );
        assert_eq!(select_parser("https://BT.BYR.CN/x"), SiteFamily::Byr);
    }

    #[test]
    fn test_select_first_match_wins() {
        // A link mentioning two known hosts resolves by table order.
        let link = "https://chdbits.co/redirect?to=hdchina.org";
        assert_eq!(select_parser(link), SiteFamily::Hdc);
    }

    #[test]
    fn test_select_is_deterministic() {
        let link = "https://totheglory.im/t/12345/";
        let first = select_parser(link);
        for _ in 0..10 {
            assert_eq!(select_parser(link), first);
        }
    }

    #[test]
    fn test_exposes_hr() {
        assert!(SiteFamily::Ourbits.exposes_hr());
        assert!(SiteFamily::Ttg.exposes_hr());
        assert!(!SiteFamily::NexusPhp.exposes_hr());
        assert!(!SiteFamily::Hdc.exposes_hr());
    }

    #[test]
    fn test_family_serialization() {
        assert_eq!(
            serde_json::to_string(&SiteFamily::NexusPhp).unwrap(),
            "\"nexusphp\""
        );
        assert_eq!(serde_json::to_string(&SiteFamily::Ttg).unwrap(), "\"ttg\"");
    }
}
