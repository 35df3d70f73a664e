//! # Spotify Integration Module
//!
//! Thin async client for the handful of Spotify Web API endpoints queueseed
//! needs, plus the session bootstrap that produces an authorized client.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, queue peek, seeder loop)
//!          ↓
//! SpotifyApi trait
//!          ↓
//! SpotifyClient (bearer token + app client credentials)
//!     ├── player           (queue, currently playing)
//!     ├── playlist         (tracks, add tracks)
//!     └── recommendations  (recommendations, genre seeds, current user)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! [`auth::create_session`] reuses a cached grant when possible and otherwise
//! runs the authorization code flow through the browser and the local
//! callback server. Whatever shape the grant takes, it is normalized to an
//! [`crate::types::AccessToken`] right away.
//!
//! ## Error Handling
//!
//! Nothing in here retries. Non-2xx responses become
//! [`crate::Error::Api`] with Spotify's message, undecodable bodies become
//! [`crate::Error::MalformedResponse`], transport failures
//! [`crate::Error::Http`].
//!
//! ## API Coverage
//!
//! - `GET /me` - acting user
//! - `GET /me/player/queue` - playback queue
//! - `GET /me/player/currently-playing` - current item and context
//! - `GET /recommendations` - up to 100 tracks from 1-5 seed tracks
//! - `GET /recommendations/available-genre-seeds` - genre seed catalog
//! - `GET /playlists/{playlist_id}/tracks` - first page of playlist tracks
//! - `POST /playlists/{playlist_id}/tracks` - append tracks
//! - `POST /api/token` - code exchange, refresh and client credentials

pub mod auth;
pub mod client;
pub mod player;
pub mod playlist;
pub mod recommendations;

pub use client::{ClientCredentials, SpotifyClient};

use crate::{
    Res,
    types::{
        CurrentlyPlaying, PlaylistTracksPage, QueueResponse, RecommendationBatch, SeedTracks,
        TrackId, User,
    },
};

/// Largest batch the recommendations endpoint hands out.
pub const MAX_RECOMMENDATIONS: u32 = 100;

/// The remote operations queueseed relies on.
///
/// [`SpotifyClient`] talks to the real service; tests swap in fakes.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    /// The user the session acts for.
    async fn current_user(&self) -> Res<User>;

    /// Up to `limit` tracks recommended from `seeds`.
    async fn recommendations(&self, seeds: &SeedTracks, limit: u32) -> Res<RecommendationBatch>;

    /// Appends `tracks` to the playlist and returns the new snapshot id.
    async fn add_tracks_to_playlist(
        &self,
        user: &User,
        playlist_id: &str,
        tracks: &[TrackId],
    ) -> Res<String>;

    /// The user's playback queue.
    async fn queue(&self) -> Res<QueueResponse>;

    /// `None` when nothing is playing on any device.
    async fn currently_playing(&self) -> Res<Option<CurrentlyPlaying>>;

    /// First page of a playlist's tracks.
    async fn playlist_tracks(&self, playlist_id: &str) -> Res<PlaylistTracksPage>;

    /// Genres accepted as recommendation seeds.
    async fn genre_seeds(&self) -> Res<Vec<String>>;
}
