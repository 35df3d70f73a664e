use reqwest::Method;

use crate::{
    Res,
    spotify::{MAX_RECOMMENDATIONS, SpotifyClient, client::send_json},
    types::{GenreSeeds, RecommendationBatch, RecommendationsResponse, SeedTracks, User},
};

impl SpotifyClient {
    /// The user the session acts for.
    ///
    /// Calls `GET /me`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Api`] when the token is invalid or expired (`401`)
    /// - [`crate::Error::MalformedResponse`] when the profile cannot be read
    /// - [`crate::Error::Http`] on transport failures
    pub async fn get_current_user(&self) -> Res<User> {
        send_json(self.user_request(Method::GET, "/me")).await
    }

    /// Recommended tracks grown from `seeds`.
    ///
    /// Calls `GET /recommendations?seed_tracks=<ids>&limit=<n>`.
    ///
    /// # Arguments
    ///
    /// * `seeds` - One to five seed track ids, sent comma separated
    /// * `limit` - Requested batch size, clamped to 1..=100, the range
    ///   Spotify accepts
    ///
    /// # Returns
    ///
    /// Track ids in the order Spotify ranked them. Tracks without an id, such
    /// as local files, are skipped, so the batch may be shorter than `limit`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Api`] on any non-2xx status, e.g. an unknown seed id
    /// - [`crate::Error::MalformedResponse`] when the body cannot be decoded
    /// - [`crate::Error::Http`] on transport failures
    ///
    /// # Example
    ///
    /// ```
    /// let seeds = SeedTracks::new(["4uLU6hMCjMI75M1A2tKUQC"])?;
    /// let batch = spotify.get_recommendations(&seeds, 100).await?;
    /// println!("Got {} tracks", batch.len());
    /// ```
    pub async fn get_recommendations(
        &self,
        seeds: &SeedTracks,
        limit: u32,
    ) -> Res<RecommendationBatch> {
        let limit = limit.clamp(1, MAX_RECOMMENDATIONS);
        let request = self
            .user_request(Method::GET, "/recommendations")
            .query(&[("seed_tracks", seeds.to_param()), ("limit", limit.to_string())]);

        let resp: RecommendationsResponse = send_json(request).await?;
        Ok(RecommendationBatch::from(resp))
    }

    /// Genres usable as recommendation seeds.
    ///
    /// Calls `GET /recommendations/available-genre-seeds`. Needs no user
    /// context, so it runs on the app's client credentials; the app token is
    /// fetched on the first call and reused afterwards.
    ///
    /// # Errors
    ///
    /// - any error of [`crate::spotify::ClientCredentials::access_token`]
    /// - [`crate::Error::Api`] on any non-2xx status
    /// - [`crate::Error::MalformedResponse`] when the body cannot be decoded
    pub async fn get_genre_seeds(&self) -> Res<Vec<String>> {
        let request = self
            .app_request(Method::GET, "/recommendations/available-genre-seeds")
            .await?;
        let resp: GenreSeeds = send_json(request).await?;
        Ok(resp.genres)
    }
}
