use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::promotion::Promotion;

/// Valid range for `promotion.amount`.
pub const AMOUNT_RANGE: RangeInclusive<i64> = 1..=100;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub promotion: PromotionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// What a promotion match does to an entry.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    #[default]
    Accept,
    Reject,
}

impl FilterAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterAction::Accept => "accept",
            FilterAction::Reject => "reject",
        }
    }
}

/// Per-run filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromotionConfig {
    /// Verdict given to entries whose promotion matches (default: accept).
    #[serde(default)]
    pub action: FilterAction,
    /// Raw `Cookie` header sent with every detail page request.
    pub cookie: String,
    /// Account name that must appear on an authenticated page.
    pub username: String,
    /// Allowed promotions. Accepts a single label or a list.
    #[serde(deserialize_with = "one_or_more")]
    pub promotion: Vec<Promotion>,
    /// Reject Hit & Run torrents. Only supported on ourbits and totheglory.
    #[serde(default)]
    pub not_hr: bool,
    /// Maximum entries inspected per run, 1 to 100 (default: 10).
    #[serde(default = "default_amount")]
    pub amount: i64,
}

fn default_amount() -> i64 {
    10
}

impl PromotionConfig {
    /// Whether `promotion` is in the allow-set.
    pub fn allows(&self, promotion: Promotion) -> bool {
        self.promotion.contains(&promotion)
    }

    pub fn amount_in_range(&self) -> bool {
        AMOUNT_RANGE.contains(&self.amount)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMore {
    One(Promotion),
    More(Vec<Promotion>),
}

fn one_or_more<'de, D>(deserializer: D) -> Result<Vec<Promotion>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMore::deserialize(deserializer)? {
        OneOrMore::One(p) => vec![p],
        OneOrMore::More(ps) => ps,
    })
}

/// Detail page fetch settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_encoding")]
    pub accept_encoding: String,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            accept_encoding: default_accept_encoding(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/79.0.3945.88 Safari/537.36"
        .to_string()
}

fn default_accept_encoding() -> String {
    "gzip, deflate".to_string()
}

/// Sanitized config for logging (cookie redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub promotion: SanitizedPromotionConfig,
    pub fetcher: FetcherConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPromotionConfig {
    pub action: FilterAction,
    pub cookie_configured: bool,
    pub username: String,
    pub promotion: Vec<Promotion>,
    pub not_hr: bool,
    pub amount: i64,
}

impl SanitizedConfig {
    /// Short hash identifying this configuration in run events.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let hash = format!("{:x}", Sha256::digest(json.as_bytes()));
        hash[..16].to_string()
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let p = &config.promotion;
        Self {
            promotion: SanitizedPromotionConfig {
                action: p.action,
                cookie_configured: !p.cookie.is_empty(),
                username: p.username.clone(),
                promotion: p.promotion.clone(),
                not_hr: p.not_hr,
                amount: p.amount,
            },
            fetcher: config.fetcher.clone(),
        }
    }
}
