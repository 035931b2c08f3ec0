use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Seconds before the real expiry at which a credential counts as stale.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// OAuth credential as persisted on disk.
///
/// `issued_at` is stored as milliseconds since the epoch under the
/// `timestamp_ms` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(rename = "timestamp_ms")]
    pub issued_at: i64,
}

impl Credential {
    /// Absolute instant (ms since epoch) after which the credential is stale.
    pub fn stale_at(&self) -> i64 {
        self.issued_at + (self.expires_in - EXPIRY_MARGIN_SECS) * 1000
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.stale_at()
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Client registration data sent with both grant exchanges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// Token endpoint response body.
///
/// `refresh_token` is optional because refresh responses may leave it out.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
}

/// A song to place on the playlist.
///
/// An empty `artist_override` means "use the setlist's artist".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSong {
    pub title: String,
    pub artist_override: String,
}

impl ExternalSong {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist_override: String::new(),
        }
    }

    pub fn performed_by(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist_override: artist.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub provider_track_id: String,
}

impl ResolvedTrack {
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.provider_track_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub playlist_id: Option<String>,
    pub total_count: usize,
    pub matched_count: usize,
    pub success: bool,
}

impl ImportOutcome {
    pub fn missed_count(&self) -> usize {
        self.total_count - self.matched_count
    }
}

/// Progress of a running import, posted after each searched song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProgress {
    pub index: usize,
    pub total: usize,
    pub matched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setlist {
    pub id: String,
    pub title: String,
    pub event_date: String,
    pub artist: String,
    pub venue: String,
    pub city: String,
    pub country: String,
    pub songs: Vec<SetlistSong>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetlistSong {
    pub name: String,
    pub is_cover: bool,
    pub cover_artist: Option<String>,
}

#[derive(Tabled)]
pub struct SetlistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub song: String,
    pub original: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Tracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub album: Option<TrackAlbum>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album: track
                .album
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            id: track.id.clone(),
        }
    }
}
