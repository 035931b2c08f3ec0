use serde_json::Value;

use crate::{
    spotify::client::{ApiClient, HttpMethod, parse},
    types::{ResolvedTrack, SearchResponse, Track, User},
    utils,
};

impl ApiClient {
    /// Raw search over the catalog, `kind` being e.g. `track` or `artist`.
    pub async fn search(&self, query: &str, kind: &str, limit: u32) -> Option<Value> {
        let endpoint = format!(
            "/v1/search?q={query}&type={kind}&limit={limit}",
            query = urlencoding::encode(query),
            kind = urlencoding::encode(kind),
        );
        self.request(&endpoint, HttpMethod::Get, None).await
    }

    /// Best match for a title by an artist, if the catalog has any.
    pub async fn search_track(&self, title: &str, artist: &str) -> Option<ResolvedTrack> {
        let json = self
            .search(&utils::track_query(title, artist), "track", 1)
            .await?;

        json["tracks"]["items"]
            .get(0)
            .and_then(|item| item["id"].as_str())
            .filter(|id| !id.is_empty())
            .map(|id| ResolvedTrack {
                provider_track_id: id.to_string(),
            })
    }

    pub async fn search_tracks(&self, query: &str, limit: u32) -> Option<Vec<Track>> {
        let json = self.search(query, "track", limit).await?;
        parse::<SearchResponse>(json, "search").map(|r| r.tracks.items)
    }

    pub async fn get_track(&self, track_id: &str) -> Option<Track> {
        let endpoint = format!("/v1/tracks/{}", urlencoding::encode(track_id));
        let json = self.request(&endpoint, HttpMethod::Get, None).await?;
        parse(json, "track")
    }

    pub async fn current_user(&self) -> Option<User> {
        let json = self.request("/v1/me", HttpMethod::Get, None).await?;
        parse(json, "user")
    }
}
