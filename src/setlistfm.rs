//! # setlist.fm Module
//!
//! Looks up a concert setlist by its setlist.fm id and flattens it into a
//! [`Setlist`]. Lookup failures never propagate: the client prints a warning
//! and yields `None`.
//!
//! The id is the hex token at the end of a setlist.fm URL, e.g. `63de4613` in
//! `https://www.setlist.fm/setlist/the-beatles/1964/hollywood-bowl-...-63de4613.html`.

use std::future::Future;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, USER_AGENT},
};
use serde::Deserialize;

use crate::{
    config::Config,
    types::{Setlist, SetlistSong},
    warning,
};

const CLIENT_USER_AGENT: &str = concat!("setlistify/", env!("CARGO_PKG_VERSION"));

/// Source of setlists, keyed by an opaque id.
pub trait SetlistSource {
    fn fetch(&self, setlist_id: &str) -> impl Future<Output = Option<Setlist>> + Send;
}

#[derive(Debug, Clone)]
pub struct SetlistFmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SetlistFmClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.setlist_api_key.clone(), config.setlist_fm_url.clone())
    }
}

impl SetlistSource for SetlistFmClient {
    async fn fetch(&self, setlist_id: &str) -> Option<Setlist> {
        let url = format!(
            "{}/rest/1.0/setlist/{}",
            self.base_url,
            urlencoding::encode(setlist_id)
        );

        let response = match self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header("x-api-key", &self.api_key)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warning!("setlist.fm request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warning!("Cannot read setlist.fm response: {}", e);
                return None;
            }
        };

        if status != StatusCode::OK {
            warning!("setlist.fm answered {} for setlist {}", status, setlist_id);
            return None;
        }

        match serde_json::from_str::<SetlistResponse>(&body) {
            Ok(response) => Some(response.into()),
            Err(e) => {
                warning!("Malformed setlist {}: {}", setlist_id, e);
                None
            }
        }
    }
}

/// setlist.fm `setlist` resource, reduced to the fields the importer uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistResponse {
    pub id: String,
    #[serde(default)]
    pub event_date: String,
    pub artist: NamedEntity,
    pub venue: Option<Venue>,
    pub tour: Option<NamedEntity>,
    #[serde(default)]
    pub sets: Sets,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntity {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub name: String,
    pub city: Option<City>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    #[serde(default)]
    pub name: String,
    pub country: Option<NamedEntity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sets {
    #[serde(default)]
    pub set: Vec<Set>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Set {
    #[serde(default)]
    pub song: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub name: String,
    pub cover: Option<NamedEntity>,
}

impl From<SetlistResponse> for Setlist {
    fn from(response: SetlistResponse) -> Self {
        let artist = response.artist.name;
        let (venue, city, country) = match response.venue {
            Some(venue) => {
                let (city, country) = match venue.city {
                    Some(city) => (
                        city.name,
                        city.country.map(|c| c.name).unwrap_or_default(),
                    ),
                    None => (String::new(), String::new()),
                };
                (venue.name, city, country)
            }
            None => (String::new(), String::new(), String::new()),
        };

        let title = match response.tour {
            Some(tour) if !tour.name.is_empty() => tour.name,
            _ => format!("{artist} @ {venue}"),
        };

        let songs = response
            .sets
            .set
            .into_iter()
            .flat_map(|set| set.song)
            .map(|song| SetlistSong {
                name: song.name,
                is_cover: song.cover.is_some(),
                cover_artist: song.cover.map(|c| c.name).filter(|n| !n.is_empty()),
            })
            .collect();

        Self {
            id: response.id,
            title,
            event_date: response.event_date,
            artist,
            venue,
            city,
            country,
            songs,
        }
    }
}
