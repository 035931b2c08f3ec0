use std::{borrow::Cow, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{ExternalSong, Setlist};

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Pulls the `code` query parameter out of an HTTP request target.
///
/// The value ends at the next `&` (or `#`, or the end of the target). An empty
/// value counts as no code.
pub fn extract_code(target: &str) -> Option<String> {
    let (_, query) = target.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "code" || value.is_empty() {
            return None;
        }
        Some(
            urlencoding::decode(value)
                .map(Cow::into_owned)
                .unwrap_or_else(|_| value.to_string()),
        )
    })
}

/// Search query matching a track title by a given artist.
pub fn track_query(title: &str, artist: &str) -> String {
    format!("track:{title} artist:{artist}")
}

/// Artist to search with: the song's own override if set, else the fallback.
pub fn artist_for<'a>(song: &'a ExternalSong, fallback_artist: &'a str) -> &'a str {
    if song.artist_override.trim().is_empty() {
        fallback_artist
    } else {
        &song.artist_override
    }
}

/// Turns setlist songs into import input. Covers are searched under the
/// original artist, everything else under the performing artist.
pub fn songs_from_setlist(setlist: &Setlist) -> Vec<ExternalSong> {
    setlist
        .songs
        .iter()
        .map(|song| ExternalSong {
            title: song.name.clone(),
            artist_override: if song.is_cover {
                song.cover_artist.clone().unwrap_or_default()
            } else {
                String::new()
            },
        })
        .collect()
}

pub fn playlist_name_suggestion(setlist: &Setlist) -> String {
    format!(
        "{} @ {} ({})",
        setlist.artist, setlist.venue, setlist.event_date
    )
}

pub fn playlist_description(fallback_artist: &str) -> String {
    format!("Live setlist of {fallback_artist}, imported from setlist.fm")
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://open.spotify.com/playlist/{playlist_id}")
}

pub fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
