#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use reqwest::Url;
use serde_json::{Value, json};
use setlistify::{
    management::CredentialStore,
    spotify::{ApiClient, TokenExchanger},
    types::{AuthorizationRequest, Credential},
    utils,
};
use tokio::{net::TcpListener, sync::Mutex as AsyncMutex};

/// A request the fake Spotify resource API received.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// In-process stand-in for the Spotify accounts and Web API hosts.
pub struct FakeSpotify {
    pub token_status: Mutex<StatusCode>,
    pub token_body: Mutex<String>,
    pub token_forms: Mutex<Vec<HashMap<String, String>>>,
    pub hits: Mutex<Vec<Hit>>,
    /// Search query (`track:<title> artist:<artist>`) to track id.
    pub catalog: Mutex<HashMap<String, String>>,
    pub fail_create: Mutex<bool>,
    pub fail_attach: Mutex<bool>,
}

impl Default for FakeSpotify {
    fn default() -> Self {
        Self {
            token_status: Mutex::new(StatusCode::OK),
            token_body: Mutex::new(token_body("fresh-access", Some("fresh-refresh"))),
            token_forms: Mutex::new(Vec::new()),
            hits: Mutex::new(Vec::new()),
            catalog: Mutex::new(HashMap::new()),
            fail_create: Mutex::new(false),
            fail_attach: Mutex::new(false),
        }
    }
}

impl FakeSpotify {
    pub fn set_token_response(&self, status: StatusCode, body: impl Into<String>) {
        *self.token_status.lock().unwrap() = status;
        *self.token_body.lock().unwrap() = body.into();
    }

    pub fn add_track(&self, title: &str, artist: &str, id: &str) {
        self.catalog
            .lock()
            .unwrap()
            .insert(utils::track_query(title, artist), id.to_string());
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_on(&self, method: Method, prefix: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.method == method && h.path.starts_with(prefix))
            .collect()
    }

    pub fn token_forms(&self) -> Vec<HashMap<String, String>> {
        self.token_forms.lock().unwrap().clone()
    }
}

pub fn token_body(access: &str, refresh: Option<&str>) -> String {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "user-read-private playlist-modify-public",
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body.to_string()
}

async fn token(
    State(fake): State<Arc<FakeSpotify>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    fake.token_forms.lock().unwrap().push(form);
    let status = *fake.token_status.lock().unwrap();
    let body = fake.token_body.lock().unwrap().clone();
    (status, body).into_response()
}

async fn resource(
    State(fake): State<Arc<FakeSpotify>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = Url::parse(&format!("http://fake{uri}")).unwrap();
    let path = url.path().to_string();
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

    fake.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::GET, ["v1", "me"]) => {
            Json(json!({"id": "fan-1", "display_name": "Fan"})).into_response()
        }
        (Method::GET, ["v1", "search"]) => {
            let q = query.get("q").cloned().unwrap_or_default();
            let items: Vec<Value> = fake
                .catalog
                .lock()
                .unwrap()
                .get(&q)
                .map(|id| vec![track_json(id)])
                .unwrap_or_default();
            Json(json!({"tracks": {"items": items}})).into_response()
        }
        (Method::GET, ["v1", "tracks", id]) => Json(track_json(id)).into_response(),
        (Method::GET, ["v1", "empty"]) => StatusCode::NO_CONTENT.into_response(),
        (Method::POST, ["v1", "users", _, "playlists"]) => {
            if *fake.fail_create.lock().unwrap() {
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": "playlist-1",
                    "name": "created",
                    "external_urls": {"spotify": "https://open.spotify.com/playlist/playlist-1"}
                })),
            )
                .into_response()
        }
        (Method::POST, ["v1", "playlists", _, "tracks"]) => {
            if *fake.fail_attach.lock().unwrap() {
                return StatusCode::FORBIDDEN.into_response();
            }
            (StatusCode::CREATED, Json(json!({"snapshot_id": "snap-1"}))).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": {"status": 404}}))).into_response(),
    }
}

fn track_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Track {id}"),
        "uri": format!("spotify:track:{id}"),
        "artists": [{"id": "artist-1", "name": "The Band"}],
        "album": {"name": "Live"}
    })
}

/// Serves `fake` on an ephemeral port and returns its base URL.
pub async fn spawn(fake: Arc<FakeSpotify>) -> String {
    let app = Router::new()
        .route("/api/token", post(token))
        .fallback(resource)
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn auth_request() -> AuthorizationRequest {
    AuthorizationRequest {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://127.0.0.1:8080/callback".to_string(),
        scope: "user-read-private playlist-modify-public".to_string(),
    }
}

pub fn fresh_credential() -> Credential {
    Credential {
        access_token: "stored-access".to_string(),
        refresh_token: "stored-refresh".to_string(),
        expires_in: 3600,
        token_type: "Bearer".to_string(),
        issued_at: utils::now_ms(),
    }
}

pub fn stale_credential() -> Credential {
    Credential {
        issued_at: utils::now_ms() - 3_600_000,
        ..fresh_credential()
    }
}

/// An ApiClient talking to `base`, its store persisted under `dir`.
pub fn client(base: &str, dir: &Path, credential: Option<Credential>) -> ApiClient {
    let path = dir.join("token.json");
    let store = match credential {
        Some(credential) => CredentialStore::with_credential(path, credential),
        None => CredentialStore::new(path),
    };
    let exchanger = TokenExchanger::new(
        auth_request(),
        format!("{base}/api/token"),
        Arc::new(AsyncMutex::new(store)),
    );
    ApiClient::new(exchanger, base)
}
