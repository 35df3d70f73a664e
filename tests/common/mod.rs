#![allow(dead_code)]

use std::{sync::Mutex, time::Duration};

use queueseed::{
    Error, Res,
    seeder::Pause,
    spotify::SpotifyApi,
    types::{
        CurrentlyPlaying, PlaybackContext, PlaylistItem, PlaylistTracksPage, QueueItem,
        QueueResponse, RecommendationBatch, SeedTracks, Track, TrackId, User,
    },
};
use reqwest::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    Recommendations(Vec<String>),
    Add { playlist: String, tracks: Vec<String> },
    Pause(Duration),
    Queue,
    CurrentlyPlaying,
    PlaylistTracks(String),
    GenreSeeds,
}

pub enum QueueScript {
    Items(Vec<&'static str>),
    Unreachable,
    Malformed,
}

/// In-memory stand-in for Spotify that records every call.
///
/// Recommendations are derived from the seeds: seeds `["A"]` yield
/// `A-0 .. A-{batch_size - 1}`.
pub struct FakeSpotify {
    pub calls: Mutex<Vec<Call>>,
    pub batch_size: usize,
    pub fail_on_add: Option<usize>,
    pub queue: QueueScript,
    pub playing: Option<CurrentlyPlaying>,
    pub playlist: Vec<&'static str>,
}

impl Default for FakeSpotify {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            batch_size: 100,
            fail_on_add: None,
            queue: QueueScript::Items(Vec::new()),
            playing: None,
            playlist: Vec::new(),
        }
    }
}

impl FakeSpotify {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn recommendation_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Recommendations(seeds) => Some(seeds),
                _ => None,
            })
            .collect()
    }

    pub fn add_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Add { tracks, .. } => Some(tracks),
                _ => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Pause(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn pauser(&self) -> FakePause<'_> {
        FakePause { fake: self }
    }

    pub fn playing_from(track: &str, context_uri: Option<&str>) -> CurrentlyPlaying {
        CurrentlyPlaying {
            is_playing: true,
            item: Some(QueueItem {
                name: track.to_string(),
                uri: None,
            }),
            context: context_uri.map(|uri| PlaybackContext {
                kind: "playlist".to_string(),
                uri: uri.to_string(),
            }),
        }
    }
}

pub struct FakePause<'a> {
    fake: &'a FakeSpotify,
}

impl Pause for FakePause<'_> {
    async fn pause(&mut self, duration: Duration) {
        self.fake.record(Call::Pause(duration));
    }
}

impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> Res<User> {
        self.record(Call::CurrentUser);
        Ok(User {
            id: "listener".to_string(),
            display_name: Some("Listener".to_string()),
        })
    }

    async fn recommendations(&self, seeds: &SeedTracks, _limit: u32) -> Res<RecommendationBatch> {
        let seeds: Vec<String> = seeds.ids().iter().map(|id| id.to_string()).collect();
        self.record(Call::Recommendations(seeds.clone()));
        let prefix = seeds.join("+");
        Ok(RecommendationBatch::new(
            (0..self.batch_size)
                .map(|i| TrackId::new(format!("{prefix}-{i}")))
                .collect(),
        ))
    }

    async fn add_tracks_to_playlist(
        &self,
        _user: &User,
        playlist_id: &str,
        tracks: &[TrackId],
    ) -> Res<String> {
        self.record(Call::Add {
            playlist: playlist_id.to_string(),
            tracks: tracks.iter().map(|t| t.to_string()).collect(),
        });
        let n = self.add_calls().len();
        if self.fail_on_add == Some(n) {
            return Err(Error::Api {
                status: StatusCode::TOO_MANY_REQUESTS,
                message: "API rate limit exceeded".to_string(),
            });
        }
        Ok(format!("snapshot-{n}"))
    }

    async fn queue(&self) -> Res<QueueResponse> {
        self.record(Call::Queue);
        match &self.queue {
            QueueScript::Items(names) => Ok(QueueResponse {
                currently_playing: None,
                queue: names
                    .iter()
                    .map(|n| QueueItem {
                        name: n.to_string(),
                        uri: None,
                    })
                    .collect(),
            }),
            QueueScript::Unreachable => Err(Error::Api {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "Service unavailable".to_string(),
            }),
            QueueScript::Malformed => Err(Error::MalformedResponse(
                "missing field `queue`".to_string(),
            )),
        }
    }

    async fn currently_playing(&self) -> Res<Option<CurrentlyPlaying>> {
        self.record(Call::CurrentlyPlaying);
        Ok(self.playing.clone())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<PlaylistTracksPage> {
        self.record(Call::PlaylistTracks(playlist_id.to_string()));
        Ok(PlaylistTracksPage {
            items: self
                .playlist
                .iter()
                .map(|name| PlaylistItem {
                    track: Some(Track {
                        id: Some(format!("id-{name}")),
                        name: name.to_string(),
                        uri: None,
                        artists: Vec::new(),
                    }),
                })
                .chain(std::iter::once(PlaylistItem { track: None }))
                .collect(),
            total: Some(self.playlist.len() as u64 + 1),
        })
    }

    async fn genre_seeds(&self) -> Res<Vec<String>> {
        self.record(Call::GenreSeeds);
        Ok(vec!["acoustic".to_string(), "ambient".to_string()])
    }
}
