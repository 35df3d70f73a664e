//! Spotify permission scopes.
//!
//! Scope strings are opaque to this crate: they are validated against the
//! catalog below and passed through verbatim to the authorization endpoint.

use std::{fmt, ops::Range};

use crate::{Res, error::Error};

/// Every scope Spotify recognizes, in the order callers usually pick slices
/// from (e.g. `VALID_SCOPES[7..10]` for playlist editing).
pub const VALID_SCOPES: [&str; 19] = [
    "ugc-image-upload",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "app-remote-control",
    "streaming",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "user-follow-modify",
    "user-follow-read",
    "user-read-playback-position",
    "user-top-read",
    "user-read-recently-played",
    "user-library-modify",
    "user-library-read",
    "user-read-email",
    "user-read-private",
];

/// An ordered, validated set of scopes requested for a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scopes(Vec<String>);

impl Scopes {
    /// Builds a scope list from any sequence of scope strings.
    ///
    /// Fails with [`Error::InvalidScope`] on the first string that is not part
    /// of [`VALID_SCOPES`]. Repeated scopes are kept once, at their first
    /// position.
    pub fn new<I, S>(scopes: I) -> Res<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.as_ref();
            if !VALID_SCOPES.contains(&scope) {
                return Err(Error::InvalidScope(scope.to_string()));
            }
            if !out.iter().any(|s| s == scope) {
                out.push(scope.to_string());
            }
        }
        Ok(Self(out))
    }

    /// A session asking for exactly one scope.
    pub fn single(scope: &str) -> Res<Self> {
        Self::new([scope])
    }

    /// Picks a slice of the catalog by index range.
    pub fn from_catalog(range: Range<usize>) -> Res<Self> {
        let slice = VALID_SCOPES.get(range.clone()).ok_or_else(|| {
            Error::Config(format!(
                "scope range {}..{} is outside the catalog of {} scopes",
                range.start,
                range.end,
                VALID_SCOPES.len()
            ))
        })?;
        Self::new(slice.iter())
    }

    /// Parses a whitespace or comma separated list, as found in
    /// `SPOTIFY_API_AUTH_SCOPE`.
    pub fn parse(raw: &str) -> Res<Self> {
        Self::new(
            raw.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty()),
        )
    }

    /// Value for the `scope` query parameter of the authorize endpoint.
    pub fn to_param(&self) -> String {
        self.0.join(" ")
    }

    /// True when `granted` (a space separated scope string as returned by the
    /// token endpoint) contains every requested scope.
    pub fn covered_by(&self, granted: &str) -> bool {
        let granted: Vec<&str> = granted.split_whitespace().collect();
        self.0.iter().all(|s| granted.contains(&s.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl TryFrom<&str> for Scopes {
    type Error = Error;

    fn try_from(scope: &str) -> Res<Self> {
        Self::single(scope)
    }
}

impl TryFrom<Vec<String>> for Scopes {
    type Error = Error;

    fn try_from(scopes: Vec<String>) -> Res<Self> {
        Self::new(scopes)
    }
}

impl TryFrom<&[&str]> for Scopes {
    type Error = Error;

    fn try_from(scopes: &[&str]) -> Res<Self> {
        Self::new(scopes)
    }
}
