//! Testing utilities: a mock page fetcher, an in-memory event recorder and
//! detail page fixtures for every site family.
//!
//! # Example
//!
//! ```rust,ignore
//! use promogate_core::testing::{fixtures, MemoryRecorder, MockPageFetcher};
//!
//! let fetcher = MockPageFetcher::new();
//! let link = fixtures::detail_link("hdchina.org", 1);
//! fetcher.set_page(&link, fixtures::hdc_page(fixtures::USERNAME, Some("Free"))).await;
//!
//! let recorder = MemoryRecorder::new();
//! // ... run the filter, then inspect recorder.kinds() ...
//! ```

mod memory_recorder;
mod mock_fetcher;

pub use memory_recorder::MemoryRecorder;
pub use mock_fetcher::{MockPageFetcher, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::config::{FilterAction, PromotionConfig};
    use crate::filter::CandidateEntry;
    use crate::promotion::Promotion;

    /// Username shown in the page header of every logged-in fixture.
    pub const USERNAME: &str = "seedling42";

    pub const COOKIE: &str = "c_secure_uid=MTIzNDU%3D; c_secure_pass=0f1e2d3c4b5a";

    /// Run configuration with defaults: accept, amount 10, H&R allowed.
    pub fn promotion_config(allowed: &[Promotion]) -> PromotionConfig {
        PromotionConfig {
            action: FilterAction::Accept,
            cookie: COOKIE.to_string(),
            username: USERNAME.to_string(),
            promotion: allowed.to_vec(),
            not_hr: false,
            amount: 10,
        }
    }

    pub fn detail_link(host: &str, id: u32) -> String {
        format!("https://{}/details.php?id={}&hit=1", host, id)
    }

    pub fn entry(title: &str, link: &str) -> CandidateEntry {
        CandidateEntry::new(title, Some(link.to_string()))
    }

    pub fn entry_without_link(title: &str) -> CandidateEntry {
        CandidateEntry::new(title, None)
    }

    /// A page with the user bar for `username` and `content` in the body.
    pub fn logged_in_page(username: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Torrent details</title></head>
<body>
<table id="info_block"><tr><td>欢迎回来, <a href="userdetails.php?id=12345"><b>{}</b></a></td></tr></table>
{}
</body></html>"#,
            username, content
        )
    }

    /// The login form served once the cookie expires.
    pub fn login_page() -> String {
        r#"<html><body><form method="post" action="takelogin.php">
<input type="text" name="username"><input type="password" name="password">
</form></body></html>"#
            .to_string()
    }

    pub fn error_page(username: &str, phrase: &str) -> String {
        logged_in_page(
            username,
            &format!(r#"<table><tr><td class="text">错误！{}</td></tr></table>"#, phrase),
        )
    }

    fn bold_font(class: Option<&str>) -> String {
        class
            .map(|c| format!(r#" <b>[<font class="{}">promo</font>]</b>"#, c))
            .unwrap_or_default()
    }

    fn img_alt(alt: Option<&str>) -> String {
        alt.map(|a| format!(r#" <img class="pro" src="pic/trans.gif" alt="{}">"#, a))
            .unwrap_or_default()
    }

    /// Generic NexusPHP: `h1#top > b > font.<class>`.
    pub fn nexusphp_page(username: &str, class: Option<&str>) -> String {
        logged_in_page(
            username,
            &format!(r#"<h1 id="top">Some.Movie.2019.1080p.BluRay.x264{}</h1>"#, bold_font(class)),
        )
    }

    /// bt.byr.cn: same marker under `h1#share`.
    pub fn byr_page(username: &str, class: Option<&str>) -> String {
        logged_in_page(
            username,
            &format!(r#"<h1 id="share">Some.Show.S01.2160p.WEB-DL{}</h1>"#, bold_font(class)),
        )
    }

    /// tjupt.org: `h1#top > font.<class>` without the bold wrapper.
    pub fn tju_page(username: &str, class: Option<&str>) -> String {
        let marker = class
            .map(|c| format!(r#" <font class="{}">promo</font>"#, c))
            .unwrap_or_default();
        logged_in_page(
            username,
            &format!(r#"<h1 id="top">Some.Documentary.2020.1080p{}</h1>"#, marker),
        )
    }

    /// ourbits.club: bold marker plus an optional H&R image in the title.
    pub fn ourbits_page(username: &str, class: Option<&str>, hr: bool) -> String {
        let badge = if hr {
            r#" <img src="pic/hit_run.gif" alt="H&amp;R" title="H&amp;R">"#
        } else {
            ""
        };
        logged_in_page(
            username,
            &format!(
                r#"<h1 id="top">Some.Album.2018.FLAC{}{}</h1>"#,
                bold_font(class),
                badge
            ),
        )
    }

    /// npupt.com: `div.jtextfill > span > img[alt]`.
    pub fn npu_page(username: &str, alt: Option<&str>) -> String {
        logged_in_page(
            username,
            &format!(
                r#"<div class="jtextfill"><span>Some.Anime.S02.1080p{}</span></div>"#,
                img_alt(alt)
            ),
        )
    }

    /// chdbits.co: `h1#top > img[alt]`.
    pub fn chd_page(username: &str, alt: Option<&str>) -> String {
        logged_in_page(
            username,
            &format!(r#"<h1 id="top">Some.Movie.2017.720p{}</h1>"#, img_alt(alt)),
        )
    }

    /// hdchina.org: `h2#top > img[alt]`.
    pub fn hdc_page(username: &str, alt: Option<&str>) -> String {
        logged_in_page(
            username,
            &format!(r#"<h2 id="top">Some.Movie.2016.1080p.Remux{}</h2>"#, img_alt(alt)),
        )
    }

    /// totheglory.im: `img.topic` icon `pic/ico_<code>.gif` and an optional
    /// `Hit & Run` image.
    pub fn ttg_page(username: &str, code: Option<&str>, hr: bool) -> String {
        let icon = code
            .map(|c| format!(r#"<img class="topic" src="/pic/ico_{}.gif" alt="">"#, c))
            .unwrap_or_default();
        let badge = if hr {
            r#"<img src="/pic/hit_run.gif" alt="Hit &amp; Run">"#
        } else {
            ""
        };
        logged_in_page(
            username,
            &format!(
                r#"<h1>Some.Concert.2015.1080i {}{}</h1><img class="topic" src="/pic/dl.gif">"#,
                icon, badge
            ),
        )
    }
}
