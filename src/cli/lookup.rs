use tabled::Table;

use crate::{
    cli::connect,
    config::Config,
    error, info,
    types::TrackTableRow,
    utils, warning,
};

pub async fn search(config: &Config, title: String, artist: Option<String>, limit: u32) {
    let client = connect(config).await;
    let query = match &artist {
        Some(artist) => utils::track_query(&title, artist),
        None => format!("track:{title}"),
    };

    let pb = utils::spinner("Searching Spotify...");
    let tracks = client.search_tracks(&query, limit).await;
    pb.finish_and_clear();

    match tracks {
        Some(tracks) if tracks.is_empty() => warning!("No tracks found for {}", query),
        Some(tracks) => {
            let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        None => error!("Search failed."),
    }
}

pub async fn track(config: &Config, track_id: String) {
    let client = connect(config).await;

    match client.get_track(&track_id).await {
        Some(track) => println!("{}", Table::new([TrackTableRow::from(&track)])),
        None => error!("Failed to fetch track {}", track_id),
    }
}

pub async fn me(config: &Config) {
    let client = connect(config).await;

    match client.current_user().await {
        Some(user) => info!(
            "Signed in as {} ({})",
            user.display_name.as_deref().unwrap_or(&user.id),
            user.id
        ),
        None => error!("Failed to fetch the current user."),
    }
}
