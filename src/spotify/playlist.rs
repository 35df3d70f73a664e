use reqwest::Method;

use crate::{
    Res,
    info,
    spotify::{SpotifyClient, client::send_json},
    types::{AddTracksRequest, PlaylistTracksPage, SnapshotResponse, TrackId, User},
    warning,
};

/// Most track URIs a single add request accepts.
pub const ADD_TRACKS_CHUNK: usize = 100;

impl SpotifyClient {
    /// First page of a playlist's tracks.
    ///
    /// Calls `GET /playlists/{playlist_id}/tracks`. Entries whose track is
    /// no longer available come back with `track: null`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Api`] when the playlist is unknown or private
    /// - [`crate::Error::MalformedResponse`] when the body cannot be decoded
    /// - [`crate::Error::Http`] on transport failures
    pub async fn get_playlist_tracks(&self, playlist_id: &str) -> Res<PlaylistTracksPage> {
        let path = format!("/playlists/{playlist_id}/tracks");
        send_json(self.user_request(Method::GET, &path)).await
    }

    /// Appends tracks to the end of a playlist.
    ///
    /// Calls `POST /playlists/{playlist_id}/tracks` with a body of the form
    /// `{"uris": ["spotify:track:<id>", ...]}`, in chunks of
    /// [`ADD_TRACKS_CHUNK`].
    ///
    /// # Arguments
    ///
    /// * `user` - The acting user, named in the progress output
    /// * `playlist_id` - Target playlist
    /// * `tracks` - Track ids in the order they should be appended
    ///
    /// # Returns
    ///
    /// The snapshot id of the last chunk, empty when there was nothing to add.
    ///
    /// # Errors
    ///
    /// Any failing chunk aborts the call with [`crate::Error::Api`] or
    /// [`crate::Error::Http`]; chunks sent before it stay in the playlist.
    ///
    /// # Example
    ///
    /// ```
    /// let user = spotify.get_current_user().await?;
    /// let snapshot = spotify.add_tracks(&user, "2rRFvUBPDKuARVvvsI7Jjk", batch.ids()).await?;
    /// ```
    pub async fn add_tracks(
        &self,
        user: &User,
        playlist_id: &str,
        tracks: &[TrackId],
    ) -> Res<String> {
        if tracks.is_empty() {
            warning!("No tracks to add to playlist {}", playlist_id);
            return Ok(String::new());
        }

        let path = format!("/playlists/{playlist_id}/tracks");
        let mut snapshot = String::new();
        for chunk in tracks.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTracksRequest {
                uris: chunk.iter().map(TrackId::uri).collect(),
            };
            let resp: SnapshotResponse =
                send_json(self.user_request(Method::POST, &path).json(&body)).await?;
            info!(
                "Added {} tracks to playlist {} for {}",
                chunk.len(),
                playlist_id,
                user.display_name.as_deref().unwrap_or(&user.id)
            );
            snapshot = resp.snapshot_id;
        }

        Ok(snapshot)
    }
}
