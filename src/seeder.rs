//! Fills a playlist with recommendations grown from a few seed tracks.
//!
//! One recommendation batch fetched up front becomes the seed pool. Each
//! later sweep reseeds from a single random track of that pool, so the
//! playlist drifts away from the original seeds while staying near them.

use std::{fmt, str::FromStr, time::Duration};

use rand::Rng;

use crate::{
    Res,
    error::Error,
    info,
    spotify::{MAX_RECOMMENDATIONS, SpotifyApi},
    success,
    types::{RecommendationBatch, SeedTracks, TrackId},
};

/// Highest index the reseed draw may produce.
///
/// Historically the draw was made over `0..=100` whatever the pool size,
/// which reads past the end of pools shorter than 101 tracks. The draw is
/// now capped at the last index of the pool; pools of 101 tracks or more
/// behave exactly as before.
pub const RESEED_INDEX_UPPER_BOUND: usize = 100;

/// Delay between sweeps unless the caller picks another one.
pub const DEFAULT_SLEEP_INTERVAL: Duration = Duration::from_secs(5);

/// How many sweeps the seeder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatCount {
    /// Append the seed pool itself and stop.
    #[default]
    Once,
    /// Run this many sweeps after building the seed pool.
    Sweeps(u32),
}

impl FromStr for RepeatCount {
    type Err = Error;

    /// `""`, `once` and `none` mean [`RepeatCount::Once`]; anything else has
    /// to be a non-negative integer.
    fn from_str(s: &str) -> Res<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("once") || s.eq_ignore_ascii_case("none") {
            return Ok(RepeatCount::Once);
        }
        s.parse::<u32>()
            .map(RepeatCount::Sweeps)
            .map_err(|_| Error::InvalidRepeatCount(s.to_string()))
    }
}

impl TryFrom<i64> for RepeatCount {
    type Error = Error;

    fn try_from(n: i64) -> Res<Self> {
        u32::try_from(n)
            .map(RepeatCount::Sweeps)
            .map_err(|_| Error::InvalidRepeatCount(n.to_string()))
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCount::Once => f.write_str("once"),
            RepeatCount::Sweeps(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederOptions {
    pub repeat: RepeatCount,
    pub sleep_interval: Duration,
}

impl Default for SeederOptions {
    fn default() -> Self {
        Self {
            repeat: RepeatCount::Once,
            sleep_interval: DEFAULT_SLEEP_INTERVAL,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub sweeps: u32,
    pub tracks_requested: usize,
    pub snapshot_id: Option<String>,
}

/// Waits between sweeps.
#[allow(async_fn_in_trait)]
pub trait Pause {
    async fn pause(&mut self, duration: Duration);
}

/// Plain sleep on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioPause;

impl Pause for TokioPause {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Picks the track the next sweep is seeded from.
///
/// Always draws from `pool`, the batch built before the first sweep.
pub fn pick_reseed<'a, R: Rng + ?Sized>(
    pool: &'a RecommendationBatch,
    rng: &mut R,
) -> Res<&'a TrackId> {
    if pool.is_empty() {
        return Err(Error::EmptySeedPool);
    }
    let upper = RESEED_INDEX_UPPER_BOUND.min(pool.len() - 1);
    Ok(&pool.ids()[rng.random_range(0..=upper)])
}

/// Appends recommended tracks to `playlist_id`.
///
/// With [`RepeatCount::Once`] the seed pool itself is appended. With
/// `Sweeps(n)` every sweep fetches a fresh batch and appends it: the first
/// sweep reuses `seeds`, later ones a single track drawn from the seed pool.
/// Sweeps are separated by `options.sleep_interval`.
///
/// Any remote failure aborts the run; sweeps already appended stay in the
/// playlist.
pub async fn add_list_of_track_ids_to_playlist<A, R, P>(
    api: &A,
    rng: &mut R,
    pause: &mut P,
    playlist_id: &str,
    seeds: &SeedTracks,
    options: &SeederOptions,
) -> Res<SeedReport>
where
    A: SpotifyApi,
    R: Rng + ?Sized,
    P: Pause,
{
    let user = api.current_user().await?;
    let pool = api.recommendations(seeds, MAX_RECOMMENDATIONS).await?;

    let sweeps = match options.repeat {
        RepeatCount::Once => {
            let snapshot = api
                .add_tracks_to_playlist(&user, playlist_id, pool.ids())
                .await?;
            success!(
                "Added {} recommended tracks to playlist {}",
                pool.len(),
                playlist_id
            );
            return Ok(SeedReport {
                sweeps: 1,
                tracks_requested: pool.len(),
                snapshot_id: Some(snapshot),
            });
        }
        RepeatCount::Sweeps(n) => n,
    };

    let mut report = SeedReport::default();
    for i in 0..sweeps {
        let batch = if i == 0 {
            api.recommendations(seeds, MAX_RECOMMENDATIONS).await?
        } else {
            let reseed = pick_reseed(&pool, rng)?.clone();
            api.recommendations(&SeedTracks::single(reseed), MAX_RECOMMENDATIONS)
                .await?
        };

        let snapshot = api
            .add_tracks_to_playlist(&user, playlist_id, batch.ids())
            .await?;

        report.sweeps = i + 1;
        report.tracks_requested += batch.len();
        report.snapshot_id = Some(snapshot);
        info!(
            "Sweep {}/{} done, {} tracks requested so far",
            i + 1,
            sweeps,
            report.tracks_requested
        );

        if i + 1 < sweeps {
            pause.pause(options.sleep_interval).await;
        }
    }

    success!(
        "Seeded playlist {} with {} tracks over {} sweeps",
        playlist_id,
        report.tracks_requested,
        report.sweeps
    );
    Ok(report)
}
