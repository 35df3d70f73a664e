mod common;

use std::time::Duration;

use common::{Call, FakeSpotify};
use queueseed::{
    Error,
    seeder::{
        DEFAULT_SLEEP_INTERVAL, RepeatCount, SeederOptions, add_list_of_track_ids_to_playlist,
    },
    types::SeedTracks,
};
use rand::{SeedableRng, rngs::StdRng};

fn options(repeat: RepeatCount, secs: u64) -> SeederOptions {
    SeederOptions {
        repeat,
        sleep_interval: Duration::from_secs(secs),
    }
}

fn pool_of(seed: &str, size: usize) -> Vec<String> {
    (0..size).map(|i| format!("{seed}-{i}")).collect()
}

#[test]
fn test_default_options_run_once_with_five_second_sleep() {
    let opts = SeederOptions::default();
    assert_eq!(opts.repeat, RepeatCount::Once);
    assert_eq!(opts.sleep_interval, DEFAULT_SLEEP_INTERVAL);
    assert_eq!(DEFAULT_SLEEP_INTERVAL, Duration::from_secs(5));
}

#[tokio::test]
async fn test_run_once_appends_the_seed_pool() {
    let fake = FakeSpotify::default();
    let seeds = SeedTracks::new(["A", "B"]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let report = add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "playlist",
        &seeds,
        &SeederOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(
        fake.calls(),
        vec![
            Call::CurrentUser,
            Call::Recommendations(vec!["A".into(), "B".into()]),
            Call::Add {
                playlist: "playlist".into(),
                tracks: pool_of("A+B", 100),
            },
        ]
    );
    assert!(fake.pauses().is_empty());
    assert_eq!(report.sweeps, 1);
    assert_eq!(report.tracks_requested, 100);
    assert_eq!(report.snapshot_id.as_deref(), Some("snapshot-1"));
}

#[tokio::test]
async fn test_two_sweeps_follow_the_documented_sequence() {
    let fake = FakeSpotify::default();
    let seeds = SeedTracks::new(["A"]).unwrap();
    let mut rng = StdRng::seed_from_u64(99);

    add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(2), 3),
    )
    .await
    .unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 7);
    assert_eq!(calls[0], Call::CurrentUser);
    assert_eq!(calls[1], Call::Recommendations(vec!["A".into()]));
    assert_eq!(calls[2], Call::Recommendations(vec!["A".into()]));
    assert_eq!(
        calls[3],
        Call::Add {
            playlist: "pl".into(),
            tracks: pool_of("A", 100),
        }
    );
    assert_eq!(calls[4], Call::Pause(Duration::from_secs(3)));

    let Call::Recommendations(reseed) = &calls[5] else {
        panic!("expected a recommendation call, got {:?}", calls[5]);
    };
    assert_eq!(reseed.len(), 1);
    assert!(pool_of("A", 100).contains(&reseed[0]));

    let Call::Add { tracks, .. } = &calls[6] else {
        panic!("expected an add call, got {:?}", calls[6]);
    };
    assert_eq!(tracks, &pool_of(&reseed[0], 100));
}

#[tokio::test]
async fn test_n_sweeps_fetch_n_plus_one_times_and_append_n_times() {
    let fake = FakeSpotify::default();
    let seeds = SeedTracks::new(["A", "B", "C"]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    let report = add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(5), 1),
    )
    .await
    .unwrap();

    let fetches = fake.recommendation_calls();
    assert_eq!(fetches.len(), 6);
    assert_eq!(fake.add_calls().len(), 5);
    assert_eq!(fake.pauses(), vec![Duration::from_secs(1); 4]);
    assert_eq!(report.sweeps, 5);
    assert_eq!(report.tracks_requested, 500);
    assert_eq!(report.snapshot_id.as_deref(), Some("snapshot-5"));

    let original: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
    assert_eq!(fetches[0], original);
    assert_eq!(fetches[1], original);
}

#[tokio::test]
async fn test_reseeds_always_come_from_the_initial_pool() {
    let fake = FakeSpotify::default();
    let seeds = SeedTracks::new(["S"]).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(20), 0),
    )
    .await
    .unwrap();

    let pool = pool_of("S", 100);
    for reseed in &fake.recommendation_calls()[2..] {
        assert_eq!(reseed.len(), 1);
        // later sweeps' results look like "S-12-3"; those must never be drawn
        assert!(pool.contains(&reseed[0]), "{} not in seed pool", reseed[0]);
    }
}

#[tokio::test]
async fn test_reseed_draw_fits_small_pools() {
    let fake = FakeSpotify {
        batch_size: 4,
        ..FakeSpotify::default()
    };
    let seeds = SeedTracks::new(["A"]).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(30), 0),
    )
    .await
    .unwrap();

    let pool = pool_of("A", 4);
    for reseed in &fake.recommendation_calls()[2..] {
        assert!(pool.contains(&reseed[0]));
    }
}

#[tokio::test]
async fn test_zero_sweeps_only_builds_the_pool() {
    let fake = FakeSpotify::default();
    let seeds = SeedTracks::new(["A"]).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let report = add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(0), 5),
    )
    .await
    .unwrap();

    assert_eq!(fake.recommendation_calls().len(), 1);
    assert!(fake.add_calls().is_empty());
    assert_eq!(report.sweeps, 0);
    assert_eq!(report.snapshot_id, None);
}

#[tokio::test]
async fn test_failure_mid_run_propagates_and_keeps_earlier_sweeps() {
    let fake = FakeSpotify {
        fail_on_add: Some(2),
        ..FakeSpotify::default()
    };
    let seeds = SeedTracks::new(["A"]).unwrap();
    let mut rng = StdRng::seed_from_u64(8);

    let err = add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(4), 5),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(fake.add_calls().len(), 2);
    assert_eq!(fake.recommendation_calls().len(), 3);
    // the pause after the failing sweep never happens
    assert_eq!(fake.pauses().len(), 1);
}

#[tokio::test]
async fn test_empty_pool_fails_when_a_reseed_is_needed() {
    let fake = FakeSpotify {
        batch_size: 0,
        ..FakeSpotify::default()
    };
    let seeds = SeedTracks::new(["A"]).unwrap();
    let mut rng = StdRng::seed_from_u64(8);

    let err = add_list_of_track_ids_to_playlist(
        &fake,
        &mut rng,
        &mut fake.pauser(),
        "pl",
        &seeds,
        &options(RepeatCount::Sweeps(2), 0),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::EmptySeedPool));
    assert_eq!(fake.add_calls().len(), 1);
}

#[test]
fn test_invalid_repeat_count_fails_before_any_call() {
    // the loop only accepts a parsed RepeatCount, so a bad value never
    // reaches the network
    for raw in ["1.5", "abc", "-2"] {
        assert!(matches!(
            raw.parse::<RepeatCount>(),
            Err(Error::InvalidRepeatCount(_))
        ));
    }
}

#[test]
fn test_seed_tracks_need_between_one_and_five_ids() {
    assert!(matches!(
        SeedTracks::new(Vec::<String>::new()),
        Err(Error::InvalidSeedCount(0))
    ));
    assert!(matches!(
        SeedTracks::new(["1", "2", "3", "4", "5", "6"]),
        Err(Error::InvalidSeedCount(6))
    ));
    let seeds = SeedTracks::new(["1", "2", "3", "4", "5"]).unwrap();
    assert_eq!(seeds.to_param(), "1,2,3,4,5");
}
