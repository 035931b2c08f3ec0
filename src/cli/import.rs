use std::sync::Arc;

use crate::{
    cli::{connect, drive, setlist::print_setlist},
    config::Config,
    error,
    setlistfm::SetlistFmClient,
    success,
    tasks::{ImportRequest, TaskRunner},
    utils, warning,
};

/// Fetches a setlist and imports it into a new Spotify playlist.
pub async fn import(config: &Config, setlist_id: String, playlist_name: Option<String>) {
    let client = connect(config).await;
    let source = Arc::new(SetlistFmClient::from_config(config));
    let (runner, mut events) = TaskRunner::new();

    let pb = utils::spinner("Loading setlist...");
    let fetch = match runner.spawn_fetch(source, setlist_id.clone()) {
        Ok(handle) => handle,
        Err(e) => error!("{}", e),
    };
    let setlist = drive(fetch, &mut events, &pb).await.flatten();
    pb.finish_and_clear();

    let Some(setlist) = setlist else {
        error!("Failed to load setlist {}", setlist_id);
    };
    print_setlist(&setlist);

    if setlist.songs.is_empty() {
        warning!("The setlist has no songs yet.");
    }

    let request = ImportRequest::from_setlist(&setlist, playlist_name);
    let playlist_name = request.playlist_name.clone();

    let pb = utils::spinner(format!("Creating playlist {playlist_name}..."));
    let import = match runner.spawn_import(client, request) {
        Ok(handle) => handle,
        Err(e) => error!("{}", e),
    };
    let outcome = drive(import, &mut events, &pb).await;
    pb.finish_and_clear();

    let Some(outcome) = outcome else {
        error!("Import of {} did not finish.", playlist_name);
    };

    if outcome.missed_count() > 0 {
        warning!(
            "{} of {} songs had no match on Spotify.",
            outcome.missed_count(),
            outcome.total_count
        );
    }

    match (outcome.success, outcome.playlist_id) {
        (true, Some(id)) => success!(
            "Playlist {} created with {} of {} songs: {}",
            playlist_name,
            outcome.matched_count,
            outcome.total_count,
            utils::playlist_url(&id)
        ),
        _ => error!("Failed to create playlist {}", playlist_name),
    }
}
