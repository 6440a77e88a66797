//! Subscription kinds, status flags and keys.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Switch-state path covered by the state subscription.
pub const PORT_MAPS_PATH: &[&str] = &["agent", "switchState", "portMaps"];

/// Stats path covered by the stats subscription.
pub const AGENT_STATS_PATH: &[&str] = &["agent"];

const SEPARATOR: &str = ":/";

/// Which FSDB tree a subscription reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    State,
    Stats,
}

impl SubscriptionKind {
    /// Fixed path the native bridge subscribes to for this kind.
    pub fn path(self) -> &'static [&'static str] {
        match self {
            SubscriptionKind::State => PORT_MAPS_PATH,
            SubscriptionKind::Stats => AGENT_STATS_PATH,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SubscriptionKind::State => "state",
            SubscriptionKind::Stats => "stats",
        }
    }
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether updates arrive as full path state or as deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionMode {
    Path,
    Delta,
}

impl SubscriptionMode {
    fn as_str(self) -> &'static str {
        match self {
            SubscriptionMode::Path => "path",
            SubscriptionMode::Delta => "delta",
        }
    }
}

/// Point-in-time view of both subscription flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionStatus {
    pub state: bool,
    pub stats: bool,
}

impl SubscriptionStatus {
    /// Flag for one kind.
    pub fn get(&self, kind: SubscriptionKind) -> bool {
        match kind {
            SubscriptionKind::State => self.state,
            SubscriptionKind::Stats => self.stats,
        }
    }

    /// Number of active subscriptions.
    pub fn active_count(&self) -> usize {
        usize::from(self.state) + usize::from(self.stats)
    }
}

/// Textual identity of a subscription: `host:/mode:/kind:/p1/p2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionKey {
    pub host: String,
    pub mode: SubscriptionMode,
    pub kind: SubscriptionKind,
    pub path: Vec<String>,
}

impl SubscriptionKey {
    /// Key for one of the canned path subscriptions.
    pub fn canned(host: impl Into<String>, kind: SubscriptionKind) -> Self {
        Self {
            host: host.into(),
            mode: SubscriptionMode::Path,
            kind,
            path: kind.path().iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{host}{SEPARATOR}{mode}{SEPARATOR}{kind}{SEPARATOR}{path}",
            host = self.host,
            mode = self.mode.as_str(),
            kind = self.kind,
            path = self.path.join("/"),
        )
    }
}

impl FromStr for SubscriptionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [host, mode, kind, path] = parts.as_slice() else {
            return Err(Error::InvalidSubscriptionKey(format!(
                "expected 4 components, got {}: {}",
                parts.len(),
                s
            )));
        };

        let mode = match *mode {
            "path" => SubscriptionMode::Path,
            "delta" => SubscriptionMode::Delta,
            other => {
                return Err(Error::InvalidSubscriptionKey(format!(
                    "unknown mode '{}'",
                    other
                )))
            }
        };
        let kind = match *kind {
            "state" => SubscriptionKind::State,
            "stats" => SubscriptionKind::Stats,
            other => {
                return Err(Error::InvalidSubscriptionKey(format!(
                    "unknown kind '{}'",
                    other
                )))
            }
        };
        let path = path
            .split('/')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host: host.to_string(),
            mode,
            kind,
            path,
        })
    }
}
