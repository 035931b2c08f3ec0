use tabled::Table;

use crate::{
    config::Config,
    error, info,
    setlistfm::{SetlistFmClient, SetlistSource},
    types::{Setlist, SetlistTableRow},
    utils,
};

pub async fn setlist(config: &Config, setlist_id: String) {
    let client = SetlistFmClient::from_config(config);

    let pb = utils::spinner(format!("Loading setlist {setlist_id}..."));
    let setlist = client.fetch(&setlist_id).await;
    pb.finish_and_clear();

    match setlist {
        Some(setlist) => print_setlist(&setlist),
        None => error!("Failed to load setlist {}", setlist_id),
    }
}

pub(crate) fn print_setlist(setlist: &Setlist) {
    info!("{}", setlist.title);
    info!(
        "{} @ {}, {} {} on {}",
        setlist.artist, setlist.venue, setlist.city, setlist.country, setlist.event_date
    );

    let rows: Vec<SetlistTableRow> = setlist
        .songs
        .iter()
        .enumerate()
        .map(|(i, song)| SetlistTableRow {
            position: i + 1,
            song: song.name.clone(),
            original: match (&song.cover_artist, song.is_cover) {
                (Some(artist), _) => format!("Cover of {artist}"),
                (None, true) => "Cover".to_string(),
                (None, false) => String::new(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
}
