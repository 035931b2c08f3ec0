use std::sync::Arc;

use reqwest::{Client, Method, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{
    config::Config, management::CredentialStore, spotify::auth::TokenExchanger,
    types::Credential, warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Authenticated access to the Spotify Web API.
///
/// Every resource call goes through [`ApiClient::request`], which refreshes a
/// stale credential first. Clones share the credential store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    exchanger: TokenExchanger,
}

impl ApiClient {
    pub fn new(exchanger: TokenExchanger, api_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            exchanger,
        }
    }

    pub fn from_config(config: &Config, store: Arc<Mutex<CredentialStore>>) -> Self {
        Self::new(
            TokenExchanger::from_config(config, store),
            config.api_url.clone(),
        )
    }

    pub fn exchanger(&self) -> &TokenExchanger {
        &self.exchanger
    }

    /// Sends an authenticated request to `endpoint` (a path such as
    /// `/v1/me`).
    ///
    /// Returns `None` without touching the network when the credential is
    /// stale and cannot be refreshed. Transport failures, non-2xx statuses and
    /// unparseable bodies also yield `None`. An empty 2xx body becomes `{}`.
    pub async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Value>,
    ) -> Option<Value> {
        let authorization = self.authorization().await?;
        let url = format!("{}{}", self.api_url, endpoint);

        let mut builder = self
            .client
            .request(method.into(), &url)
            .header(AUTHORIZATION, authorization);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warning!("Request to {} failed: {}", endpoint, e);
                return None;
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warning!("Cannot read response from {}: {}", endpoint, e);
                return None;
            }
        };

        if !status.is_success() {
            warning!("Spotify answered {} for {}: {}", status, endpoint, text);
            return None;
        }

        if text.trim().is_empty() {
            return Some(Value::Object(Map::new()));
        }

        match serde_json::from_str(&text) {
            Ok(json) => Some(json),
            Err(e) => {
                warning!("Malformed JSON from {}: {}", endpoint, e);
                None
            }
        }
    }

    async fn authorization(&self) -> Option<String> {
        let stale = self.exchanger.store().lock().await.is_expired();
        if stale && !self.exchanger.refresh().await {
            warning!("Spotify session expired. Run setlistify auth to sign in again.");
            return None;
        }

        self.exchanger
            .store()
            .lock()
            .await
            .current()
            .map(Credential::authorization_header)
    }
}

/// Deserializes a response into one of the typed projections.
pub(crate) fn parse<T: DeserializeOwned>(json: Value, what: &str) -> Option<T> {
    match serde_json::from_value(json) {
        Ok(value) => Some(value),
        Err(e) => {
            warning!("Unexpected {} response: {}", what, e);
            None
        }
    }
}
