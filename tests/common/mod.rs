#![allow(dead_code)]

use std::{
    io::Cursor,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use nowplaying::config::{Credentials, Endpoints};
use serde_json::{Value, json};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REFRESH_TOKEN: &str = "refresh-token";

pub const COVER_COLOR: [u8; 3] = [200, 10, 30];

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub enum Reply {
    NoContent,
    Json(Value),
    Status(u16),
}

struct Inner {
    log: Mutex<Vec<Recorded>>,
    token_calls: AtomicUsize,
    image_hits: AtomicUsize,
    flaky_hits: AtomicUsize,
    expires_in: AtomicU64,
    token_reply: Mutex<Option<u16>>,
    rotate_to: Mutex<Option<String>>,
    currently_playing: Mutex<Reply>,
    recently_played: Mutex<Reply>,
}

/// Fake accounts, player and image hosts on one local port.
#[derive(Clone)]
pub struct Upstream {
    pub base: String,
    inner: Arc<Inner>,
}

impl Upstream {
    pub async fn start() -> Self {
        let inner = Arc::new(Inner {
            log: Mutex::new(Vec::new()),
            token_calls: AtomicUsize::new(0),
            image_hits: AtomicUsize::new(0),
            flaky_hits: AtomicUsize::new(0),
            expires_in: AtomicU64::new(3600),
            token_reply: Mutex::new(None),
            rotate_to: Mutex::new(None),
            currently_playing: Mutex::new(Reply::NoContent),
            recently_played: Mutex::new(Reply::Json(json!({ "items": [] }))),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/player/currently-playing", get(currently_playing))
            .route("/v1/me/player/recently-played", get(recently_played))
            .route("/img/:name", get(cover))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            inner,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::default()
            .with_accounts_url(&self.base)
            .with_api_url(&self.base)
    }

    pub fn credentials() -> Credentials {
        Credentials::new(CLIENT_ID, CLIENT_SECRET, REFRESH_TOKEN)
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("{}/img/{name}", self.base)
    }

    pub fn set_currently_playing(&self, reply: Reply) {
        *self.inner.currently_playing.lock().unwrap() = reply;
    }

    pub fn set_recently_played(&self, reply: Reply) {
        *self.inner.recently_played.lock().unwrap() = reply;
    }

    pub fn set_expires_in(&self, secs: u64) {
        self.inner.expires_in.store(secs, Ordering::SeqCst);
    }

    pub fn fail_token_with(&self, status: u16) {
        *self.inner.token_reply.lock().unwrap() = Some(status);
    }

    pub fn rotate_refresh_token(&self, token: &str) {
        *self.inner.rotate_to.lock().unwrap() = Some(token.to_string());
    }

    pub fn log(&self) -> Vec<Recorded> {
        self.inner.log.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.inner.token_calls.load(Ordering::SeqCst)
    }

    pub fn image_hits(&self) -> usize {
        self.inner.image_hits.load(Ordering::SeqCst)
    }
}

pub fn track_json(name: &str, artist: &str, album: &str, image: &str) -> Value {
    json!({
        "name": name,
        "artists": [{ "name": artist }],
        "album": { "name": album, "images": [{ "url": image, "height": 640, "width": 640 }] }
    })
}

pub fn png_cover() -> Vec<u8> {
    let img = RgbaImage::from_pixel(
        64,
        64,
        Rgba([COVER_COLOR[0], COVER_COLOR[1], COVER_COLOR[2], 255]),
    );
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn jpeg_cover() -> Vec<u8> {
    let img = RgbImage::from_pixel(64, 64, Rgb(COVER_COLOR));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

fn record(inner: &Inner, method: &'static str, path: &str, headers: &HeaderMap, body: String) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    inner.log.lock().unwrap().push(Recorded {
        method,
        path: path.to_string(),
        authorization,
        body,
    });
}

fn reply(reply: Reply) -> Response {
    match reply {
        Reply::NoContent => StatusCode::NO_CONTENT.into_response(),
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(status) => StatusCode::from_u16(status).unwrap().into_response(),
    }
}

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"))
}

async fn token(State(inner): State<Arc<Inner>>, headers: HeaderMap, body: String) -> Response {
    record(&inner, "POST", "/api/token", &headers, body);
    // Keep the refresh window open long enough for concurrent callers to pile up.
    tokio::time::sleep(Duration::from_millis(50)).await;

    if let Some(status) = *inner.token_reply.lock().unwrap() {
        return reply(Reply::Status(status));
    }

    let n = inner.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let mut body = json!({
        "access_token": format!("token-{n}"),
        "token_type": "Bearer",
        "expires_in": inner.expires_in.load(Ordering::SeqCst),
    });
    if let Some(rotated) = inner.rotate_to.lock().unwrap().clone() {
        body["refresh_token"] = json!(rotated);
    }
    Json(body).into_response()
}

async fn currently_playing(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Response {
    record(&inner, "GET", "/v1/me/player/currently-playing", &headers, String::new());
    if !bearer_ok(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let current = inner.currently_playing.lock().unwrap().clone();
    reply(current)
}

async fn recently_played(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Response {
    record(&inner, "GET", "/v1/me/player/recently-played", &headers, String::new());
    if !bearer_ok(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let recent = inner.recently_played.lock().unwrap().clone();
    reply(recent)
}

async fn cover(State(inner): State<Arc<Inner>>, Path(name): Path<String>) -> Response {
    inner.image_hits.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        // Fails the first time only.
        "flaky" if inner.flaky_hits.fetch_add(1, Ordering::SeqCst) == 0 => {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "text" => "definitely not an image".into_response(),
        "jpeg" => ([(header::CONTENT_TYPE, "image/jpeg")], jpeg_cover()).into_response(),
        _ => ([(header::CONTENT_TYPE, "image/png")], png_cover()).into_response(),
    }
}
