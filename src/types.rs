use std::{fmt, sync::Arc};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::sync::Mutex;

use crate::{Res, error::Error};

/// Authorization grant as stored in the token cache and returned by the
/// token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obtained_at: Option<u64>,
}

impl Token {
    /// Seconds of leeway before the nominal expiry at which a token is
    /// already considered expired.
    pub const EXPIRY_LEEWAY: u64 = 60;

    /// Stamps a freshly received grant with the current time.
    pub fn stamped(mut self) -> Self {
        if self.obtained_at.is_none() {
            self.obtained_at = Some(Utc::now().timestamp() as u64);
        }
        self
    }

    /// Tokens without expiry information never expire from our point of view.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match (self.obtained_at, self.expires_in) {
            (Some(obtained), Some(expires)) => {
                now + Self::EXPIRY_LEEWAY >= obtained.saturating_add(expires)
            }
            _ => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }
}

/// What an authorization exchange or token cache can hand back: either the
/// bare bearer string or the full structured grant.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Grant {
    Raw(String),
    Structured(Token),
}

impl Grant {
    /// Reads a grant from text. A JSON object is a structured grant, a JSON
    /// string or bare text is a raw token.
    pub fn parse(text: &str) -> Res<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::MalformedResponse("empty authorization grant".into()));
        }

        match serde_json::from_str::<Grant>(text) {
            Ok(grant) => Ok(grant),
            Err(e) if text.starts_with('{') => Err(Error::MalformedResponse(format!(
                "authorization grant without access_token: {e}"
            ))),
            Err(_) => Ok(Grant::Raw(text.to_string())),
        }
    }
}

/// The bearer token every authenticated request carries.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Grant> for AccessToken {
    fn from(grant: Grant) -> Self {
        match grant {
            Grant::Raw(token) => AccessToken(token),
            Grant::Structured(token) => AccessToken(token.access_token),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// State shared between the authorization flow and the callback handler.
///
/// `outcome` stays `None` until the redirect arrives; it then holds the
/// authorization code or the reason the user was not authorized.
#[derive(Debug, Clone)]
pub struct AuthorizationState {
    pub state: String,
    pub outcome: Option<Result<String, String>>,
}

pub type SharedAuthState = Arc<Mutex<Option<AuthorizationState>>>;

/// Opaque Spotify track id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Seed tracks for a recommendation query, 1 to 5 of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTracks(Vec<TrackId>);

impl SeedTracks {
    pub const MAX: usize = 5;

    pub fn new<I, T>(ids: I) -> Res<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<TrackId>,
    {
        let ids: Vec<TrackId> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() || ids.len() > Self::MAX {
            return Err(Error::InvalidSeedCount(ids.len()));
        }
        Ok(Self(ids))
    }

    pub fn single(id: TrackId) -> Self {
        Self(vec![id])
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.0
    }

    /// Comma separated, as the `seed_tracks` query parameter expects.
    pub fn to_param(&self) -> String {
        self.0
            .iter()
            .map(TrackId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<Track>,
}

/// Track ids of one recommendation call, in the order Spotify returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationBatch(Vec<TrackId>);

impl RecommendationBatch {
    pub fn new(ids: Vec<TrackId>) -> Self {
        Self(ids)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<RecommendationsResponse> for RecommendationBatch {
    fn from(resp: RecommendationsResponse) -> Self {
        // local or unavailable tracks come back without an id
        Self(
            resp.tracks
                .into_iter()
                .filter_map(|t| t.id.map(TrackId::from))
                .collect(),
        )
    }
}

/// Entry of the playback queue; tracks and episodes both carry a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    pub currently_playing: Option<QueueItem>,
    pub queue: Vec<QueueItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackContext {
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    pub item: Option<QueueItem>,
    pub context: Option<PlaybackContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    pub total: Option<u64>,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub id: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        TrackTableRow {
            name: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            id: track.id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenreSeeds {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub status: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}
