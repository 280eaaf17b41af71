//! HTTP and WebSocket serving of a dashboard app.
//!
//! - `GET /`: the static page that draws the charts
//! - `GET /api/layout`: [`DashboardLayout`] as JSON
//! - `GET /api/views?station=&efficiency=&surface=`: stateless view derivation
//! - `GET /ws`: a session owning one [`Document`]; each text message is a
//!   [`ControlChange`] and is answered with the replaced sources

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension, Query,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    serve, Json, Router,
};
use dsg_core::{ControlChange, Controls, Dataset, StationFilter, Views};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::app::DashboardApp;
use crate::document::Document;
use crate::error::Error;
use crate::layout::DashboardLayout;
use crate::sources::BoundSources;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Which browser origins may open a WebSocket session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    Any,
    /// Allowed `host[:port]` entries; an entry without a port matches any port.
    Hosts(Vec<String>),
}

impl OriginPolicy {
    /// `*` allows everything; an empty list allows only the server's own address.
    pub fn new(allowed: &[String], bind: SocketAddr) -> Self {
        if allowed.iter().any(|origin| origin.trim() == "*") {
            OriginPolicy::Any
        } else if allowed.is_empty() {
            OriginPolicy::Hosts(vec![
                format!("localhost:{}", bind.port()),
                bind.to_string(),
            ])
        } else {
            OriginPolicy::Hosts(allowed.iter().map(|o| normalize_origin(o)).collect())
        }
    }

    /// Requests without an `Origin` header are not from a browser page and are allowed.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        let (hosts, origin) = match (self, origin) {
            (OriginPolicy::Any, _) | (_, None) => return true,
            (OriginPolicy::Hosts(hosts), Some(origin)) => (hosts, normalize_origin(origin)),
        };
        let (origin_host, _) = split_host_port(&origin);
        hosts.iter().any(|allowed| match split_host_port(allowed) {
            (_, Some(_)) => *allowed == origin,
            (host, None) => host == origin_host,
        })
    }
}

/// Split `host[:port]`, keeping bracketed IPv6 hosts such as `[::1]` whole.
fn split_host_port(authority: &str) -> (&str, Option<&str>) {
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => {
                let port = authority[end + 1..].strip_prefix(':');
                (&authority[..=end], port)
            }
            None => (authority, None),
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    }
}

fn normalize_origin(origin: &str) -> String {
    let origin = origin.trim();
    let origin = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .unwrap_or(origin);
    origin.trim_end_matches('/').to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub addr: SocketAddr,
    pub allow_websocket_origin: Vec<String>,
}

struct AppState {
    dataset: Arc<Dataset>,
    initial_controls: Controls,
    layout: DashboardLayout,
    origins: OriginPolicy,
}

#[derive(Deserialize)]
struct ViewParams {
    station: Option<String>,
    efficiency: Option<f64>,
    surface: Option<f64>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage<'a> {
    Sources {
        revision: u64,
        controls: &'a Controls,
        sources: &'a BoundSources,
    },
    Error {
        message: String,
    },
}

impl ServerMessage<'_> {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(r#"{{"type":"error","message":"serializing reply: {err}"}}"#)
        })
    }
}

fn sources_message(document: &Document) -> String {
    ServerMessage::Sources {
        revision: document.revision(),
        controls: document.controls(),
        sources: document.sources(),
    }
    .to_json()
}

/// Apply one client message to a session document and build the reply.
pub fn handle_message(document: &mut Document, text: &str) -> String {
    let change: ControlChange = match serde_json::from_str(text) {
        Ok(change) => change,
        Err(err) => {
            let message = Error::InvalidMessage(err.to_string()).to_string();
            return ServerMessage::Error { message }.to_json();
        }
    };

    match document.apply(&change) {
        Ok(_) => sources_message(document),
        Err(err) => {
            debug!("rejected {:?}: {}", change, err);
            ServerMessage::Error {
                message: err.to_string(),
            }
            .to_json()
        }
    }
}

pub fn router(app: &DashboardApp, origins: OriginPolicy) -> Router {
    let state = Arc::new(AppState {
        dataset: app.dataset.clone(),
        initial_controls: app.initial_controls.clone(),
        layout: app.layout.clone(),
        origins,
    });

    Router::new()
        .route("/", get(index))
        .route("/api/layout", get(get_layout))
        .route("/api/views", get(get_views))
        .route("/ws", get(open_session))
        .layer(Extension(state))
}

/// Serve on an already bound listener until the process stops.
pub async fn serve_on(listener: TcpListener, app: &DashboardApp, origins: OriginPolicy) -> Result<()> {
    let local = listener.local_addr()?;
    info!("Serving {} at http://{}", app.app_dir().display(), local);
    serve(listener, router(app, origins))
        .await
        .context("dashboard server stopped")?;
    Ok(())
}

pub async fn run(app: DashboardApp, options: ServeOptions) -> Result<()> {
    let listener = TcpListener::bind(options.addr)
        .await
        .with_context(|| format!("binding {}", options.addr))?;
    let origins = OriginPolicy::new(&options.allow_websocket_origin, options.addr);
    serve_on(listener, &app, origins).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_layout(Extension(state): Extension<Arc<AppState>>) -> Json<DashboardLayout> {
    Json(state.layout.clone())
}

async fn get_views(
    Query(params): Query<ViewParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let defaults = &state.initial_controls;
    let controls = Controls {
        station: params
            .station
            .map(StationFilter::from)
            .unwrap_or_else(|| defaults.station.clone()),
        efficiency: params.efficiency.unwrap_or(defaults.efficiency),
        surface: params.surface.unwrap_or(defaults.surface),
    };

    match Views::derive(&state.dataset, &controls) {
        Ok(views) => Json(BoundSources::from(&views)).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn open_session(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    if !state.origins.allows(origin) {
        warn!("refusing WebSocket session from origin {:?}", origin);
        return (StatusCode::FORBIDDEN, "origin not allowed").into_response();
    }
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(mut socket: WebSocket, state: Arc<AppState>) {
    let mut document = match Document::new(state.dataset.clone(), state.initial_controls.clone())
    {
        Ok(document) => document,
        Err(err) => {
            error!("initial load failed: {}", err);
            return;
        }
    };
    debug!("session opened");

    if socket
        .send(Message::Text(sources_message(&document)))
        .await
        .is_err()
    {
        return;
    }

    // one message at a time: each change is fully applied before the next is read
    while let Some(Ok(message)) = socket.recv().await {
        let reply = match message {
            Message::Text(text) => handle_message(&mut document, &text),
            Message::Close(_) => break,
            _ => continue,
        };
        if socket.send(Message::Text(reply)).await.is_err() {
            break;
        }
    }
    debug!(revision = document.revision(), "session closed");
}
