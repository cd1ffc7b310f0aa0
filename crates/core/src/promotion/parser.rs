//! Per-family extraction of promotion markers from detail page HTML.
//!
//! Each family locates an anchor element, then a marker nested inside it. A
//! page without the marker has no promotion. A page without the anchor is also
//! reported as having no promotion, with `anchor_found` cleared so callers can
//! tell a possible template change apart from a plain page.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use super::label::{normalize, DetectedPromotion, Promotion};
use super::site::SiteFamily;

static H1_TOP: Lazy<Selector> = Lazy::new(|| selector("h1#top"));
static H1_SHARE: Lazy<Selector> = Lazy::new(|| selector("h1#share"));
static H2_TOP: Lazy<Selector> = Lazy::new(|| selector("h2#top"));
static JTEXTFILL: Lazy<Selector> = Lazy::new(|| selector("div.jtextfill"));
static BOLD: Lazy<Selector> = Lazy::new(|| selector("b"));
static FONT: Lazy<Selector> = Lazy::new(|| selector("font"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));
static TOPIC_IMG: Lazy<Selector> = Lazy::new(|| selector("img.topic"));
static HR_IMG: Lazy<Selector> = Lazy::new(|| selector(r#"img[alt="Hit & Run"]"#));

static TTG_ICON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"pic/ico_([^/?#]+)\.gif").expect("valid ttg icon pattern"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid static selector")
}

/// Outcome of looking for a promotion marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerLookup {
    /// Marker present, label in the family's table.
    Known(Promotion),
    /// Marker present, label not in the family's table.
    Unknown(String),
    /// No marker.
    Absent,
}

impl MarkerLookup {
    fn from_raw(family: SiteFamily, raw: Option<String>) -> Self {
        match raw {
            None => MarkerLookup::Absent,
            Some(raw) => match normalize(family, &raw) {
                DetectedPromotion::Known(p) => MarkerLookup::Known(p),
                DetectedPromotion::Unsupported(raw) => MarkerLookup::Unknown(raw),
            },
        }
    }

    pub fn into_detected(self) -> DetectedPromotion {
        match self {
            MarkerLookup::Known(p) => DetectedPromotion::Known(p),
            MarkerLookup::Unknown(raw) => DetectedPromotion::Unsupported(raw),
            MarkerLookup::Absent => DetectedPromotion::Known(Promotion::None),
        }
    }
}

/// What a detail page says about a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionFacts {
    pub promotion: DetectedPromotion,
    /// Always false for families that do not render an H&R marker.
    pub is_hr: bool,
    pub anchor_found: bool,
}

impl PromotionFacts {
    fn no_anchor() -> Self {
        Self {
            promotion: DetectedPromotion::Known(Promotion::None),
            is_hr: false,
            anchor_found: false,
        }
    }
}

impl SiteFamily {
    /// Extract promotion facts from a detail page body.
    pub fn extract(&self, body: &str) -> PromotionFacts {
        let document = Html::parse_document(body);
        self.extract_document(&document)
    }

    pub fn extract_document(&self, document: &Html) -> PromotionFacts {
        let family = *self;

        let anchor_selector: &Selector = match family {
            SiteFamily::Ttg => return extract_ttg(document),
            SiteFamily::Byr => &*H1_SHARE,
            SiteFamily::Npu => &*JTEXTFILL,
            SiteFamily::Hdc => &*H2_TOP,
            _ => &*H1_TOP,
        };

        let Some(anchor) = document.select(anchor_selector).next() else {
            return PromotionFacts::no_anchor();
        };

        let raw = match family {
            SiteFamily::NexusPhp | SiteFamily::Byr | SiteFamily::Ourbits => bold_font_class(anchor),
            SiteFamily::Tju => anchor.select(&FONT).next().and_then(first_class),
            SiteFamily::Npu => anchor
                .select(&SPAN)
                .next()
                .and_then(|span| span.select(&IMG).next())
                .map(alt_text),
            // chd, hdc
            _ => anchor.select(&IMG).next().map(alt_text),
        };

        // On ourbits the only image inside the title is the H&R badge.
        let is_hr = family == SiteFamily::Ourbits && anchor.select(&IMG).next().is_some();

        PromotionFacts {
            promotion: MarkerLookup::from_raw(family, raw).into_detected(),
            is_hr,
            anchor_found: true,
        }
    }
}

/// `<b><font class="free">` inside the title. A `b` without a classed `font`
/// is treated as no marker.
fn bold_font_class(anchor: ElementRef<'_>) -> Option<String> {
    let bold = anchor.select(&BOLD).next()?;
    let font = bold.select(&FONT).next()?;
    first_class(font)
}

fn first_class(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("class")
        .and_then(|classes| classes.split_whitespace().next())
        .map(str::to_string)
}

/// A marker image without `alt` yields an empty raw label, which no table
/// knows.
fn alt_text(img: ElementRef<'_>) -> String {
    img.value().attr("alt").unwrap_or_default().to_string()
}

/// totheglory: the promotion icon is `img.topic` with a `pic/ico_<code>.gif`
/// source anywhere on the page, and H&R is a separate `Hit & Run` image.
fn extract_ttg(document: &Html) -> PromotionFacts {
    let icon_src = document
        .select(&TOPIC_IMG)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.contains("pic/ico_"));

    let raw = icon_src.map(|src| {
        TTG_ICON
            .captures(src)
            .and_then(|caps| caps.get(1))
            .map(|code| code.as_str().to_string())
            .unwrap_or_else(|| src.to_string())
    });

    PromotionFacts {
        promotion: MarkerLookup::from_raw(SiteFamily::Ttg, raw).into_detected(),
        is_hr: document.select(&HR_IMG).next().is_some(),
        anchor_found: true,
    }
}
