use crate::{
    management::MusicService,
    spotify::client::{ApiClient, HttpMethod, parse},
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest, Playlist, ResolvedTrack},
    warning,
};

impl ApiClient {
    pub async fn create_user_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Option<Playlist> {
        let body = serde_json::to_value(CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
        })
        .ok()?;

        let endpoint = format!("/v1/users/{}/playlists", urlencoding::encode(user_id));
        let json = self
            .request(&endpoint, HttpMethod::Post, Some(&body))
            .await?;
        parse(json, "playlist")
    }

    /// Adds all `uris` to the playlist in a single call.
    pub async fn add_tracks(&self, playlist_id: &str, uris: Vec<String>) -> bool {
        let body = match serde_json::to_value(AddTrackToPlaylistRequest { uris }) {
            Ok(body) => body,
            Err(e) => {
                warning!("Cannot encode track list: {}", e);
                return false;
            }
        };

        let endpoint = format!("/v1/playlists/{}/tracks", urlencoding::encode(playlist_id));
        self.request(&endpoint, HttpMethod::Post, Some(&body))
            .await
            .is_some()
    }
}

impl MusicService for ApiClient {
    /// Creates the playlist on the signed-in user's account.
    async fn create_playlist(&self, name: &str, description: &str) -> Option<String> {
        let user = self.current_user().await?;
        self.create_user_playlist(&user.id, name, description)
            .await
            .map(|playlist| playlist.id)
    }

    async fn find_track(&self, title: &str, artist: &str) -> Option<ResolvedTrack> {
        self.search_track(title, artist).await
    }

    async fn attach_tracks(&self, playlist_id: &str, tracks: &[ResolvedTrack]) -> bool {
        let uris = tracks.iter().map(ResolvedTrack::uri).collect();
        self.add_tracks(playlist_id, uris).await
    }
}
