use crate::{
    config::{Credentials, Endpoints},
    error, info,
    seeder::{self, SeederOptions, TokioPause},
    types::SeedTracks,
    utils,
};

pub async fn seed(
    credentials: &Credentials,
    endpoints: &Endpoints,
    playlist: &str,
    seeds: &[String],
    options: SeederOptions,
) {
    // validate everything before anything touches the network
    let playlist_id = match utils::parse_spotify_id(playlist, "playlist") {
        Ok(id) => id,
        Err(e) => error!("{}", e),
    };

    let seed_ids = match seeds
        .iter()
        .map(|s| utils::parse_spotify_id(s, "track"))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(ids) => ids,
        Err(e) => error!("{}", e),
    };

    let seeds = match SeedTracks::new(seed_ids) {
        Ok(seeds) => seeds,
        Err(e) => error!("{}", e),
    };

    let client = super::session(credentials, endpoints).await;

    info!(
        "Seeding playlist {} from {} (repeat: {}, sleep: {}s)",
        playlist_id,
        seeds.to_param(),
        options.repeat,
        options.sleep_interval.as_secs()
    );

    let mut rng = rand::rng();
    if let Err(e) = seeder::add_list_of_track_ids_to_playlist(
        &client,
        &mut rng,
        &mut TokioPause,
        &playlist_id,
        &seeds,
        &options,
    )
    .await
    {
        error!("Seeding stopped. Err: {}", e);
    }
}
