//! Session and torrent validity checks on a fetched detail page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emitted by NexusPHP when the torrent id does not exist.
pub const NO_SUCH_TORRENT_PHRASE: &str = "没有该ID的种子";

/// Emitted by NexusPHP when the account may not view the torrent.
pub const NO_PERMISSION_PHRASE: &str = "你没有该权限！";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageValidity {
    Valid,
    /// The configured username is not on the page: the cookie no longer
    /// authenticates as that account.
    SessionExpired,
    TorrentNotFound,
    NoPermission,
}

impl PageValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, PageValidity::Valid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageValidity::Valid => "valid",
            PageValidity::SessionExpired => "session_expired",
            PageValidity::TorrentNotFound => "torrent_not_found",
            PageValidity::NoPermission => "no_permission",
        }
    }
}

impl fmt::Display for PageValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check, in order: the session is logged in as `username`, the torrent
/// exists, the account may see it.
pub fn check_validity(body: &str, username: &str) -> PageValidity {
    if !body.contains(username) {
        return PageValidity::SessionExpired;
    }
    if body.contains(NO_SUCH_TORRENT_PHRASE) {
        return PageValidity::TorrentNotFound;
    }
    if body.contains(NO_PERMISSION_PHRASE) {
        return PageValidity::NoPermission;
    }
    PageValidity::Valid
}
