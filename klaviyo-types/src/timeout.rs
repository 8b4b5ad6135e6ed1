//! Session timeout configuration.
//!
//! The session lifecycle collaborator asks whether enough background time has
//! elapsed to start a new session. Two values are special: zero treats every
//! return to the foreground as a new session, and infinite never expires.

use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How long a backgrounded app keeps its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionTimeout {
    /// Every foregrounding starts a new session.
    Immediate,
    /// A session survives this much background time.
    After(Duration),
    /// Sessions never time out.
    Never,
}

impl SessionTimeout {
    /// One hour.
    pub const DEFAULT_SECS: u64 = 3600;

    /// Builds a timeout from a signed second count; zero or negative
    /// values mean [`SessionTimeout::Immediate`].
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        match u64::try_from(secs) {
            Ok(0) | Err(_) => Self::Immediate,
            Ok(secs) => Self::After(Duration::from_secs(secs)),
        }
    }

    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            Self::Immediate
        } else {
            Self::After(duration)
        }
    }

    /// The finite duration, or `None` when sessions never expire.
    #[must_use]
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Immediate => Some(Duration::ZERO),
            Self::After(duration) => Some(*duration),
            Self::Never => None,
        }
    }

    /// Milliseconds, saturating; [`SessionTimeout::Never`] maps to `u64::MAX`.
    #[must_use]
    pub fn as_millis(&self) -> u64 {
        match self.as_duration() {
            Some(duration) => u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            None => u64::MAX,
        }
    }

    /// Whether `elapsed` background time ends the session.
    #[must_use]
    pub fn is_expired(&self, elapsed: Duration) -> bool {
        match self {
            Self::Immediate => true,
            Self::After(duration) => elapsed >= *duration,
            Self::Never => false,
        }
    }
}

impl Default for SessionTimeout {
    fn default() -> Self {
        Self::After(Duration::from_secs(Self::DEFAULT_SECS))
    }
}

impl fmt::Display for SessionTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => f.write_str("0"),
            Self::After(duration) => write!(f, "{}", duration.as_secs()),
            Self::Never => f.write_str("infinite"),
        }
    }
}

impl FromStr for SessionTimeout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("infinite") || trimmed.eq_ignore_ascii_case("never") {
            return Ok(Self::Never);
        }
        trimmed
            .parse::<i64>()
            .map(Self::from_secs)
            .map_err(|_| Error::InvalidSessionTimeout(s.to_owned()))
    }
}

impl Serialize for SessionTimeout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Never => serializer.serialize_str("infinite"),
            other => serializer.serialize_u64(other.as_duration().map_or(0, |d| d.as_secs())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeoutRepr {
    Secs(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for SessionTimeout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match TimeoutRepr::deserialize(deserializer)? {
            TimeoutRepr::Secs(secs) => Ok(Self::from_secs(secs)),
            TimeoutRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
