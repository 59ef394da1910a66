// src/server/mod.rs
//! Universal server
//!
//! One shared listening port, N worker processes serving it, one
//! coordinator supervising them:
//!
//! - **Coordinator**: builds a [`WorkerPool`] over a [`ProcessSpawner`]
//!   and drives its event loop; serves nothing itself.
//! - **Worker**: binds the shared port once via `SO_REUSEPORT`, announces
//!   readiness on stdout, and serves until killed. A worker never spawns.
//!
//! Request handling is a stand-in for the host application's renderer:
//! static assets from the public directory, otherwise the rendered app
//! shell with the bundle URLs from the asset manifest.

pub mod listener;
pub mod render;

use crate::config::StrutConfig;
use crate::supervisor::process::terminate_all;
use crate::supervisor::{ProcessSpawner, Role, WorkerEvent, WorkerPool, READY_SENTINEL};
use crate::utils::errors::{Result, StrutError};
use crate::utils::paths::resolve_public;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use render::AssetManifest;
use std::convert::Infallible;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Capacity of the worker event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Pause before retrying a failed accept
///
/// Accept errors like fd exhaustion tend to persist; retrying
/// immediately would spin the loop hot.
const ACCEPT_RETRY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// Immutable per-worker request state
pub struct AppState {
    /// Static asset root
    public_dir: PathBuf,

    /// Bundle URLs, absent before the first build
    assets: Option<AssetManifest>,
}

impl AppState {
    /// Build request state from configuration
    pub fn from_config(config: &StrutConfig) -> Self {
        Self {
            public_dir: PathBuf::from(&config.server.public_dir),
            assets: AssetManifest::load(Path::new(&config.server.assets_manifest)),
        }
    }
}

/// Run the universal server in the given role
pub async fn run(config: &StrutConfig, role: Role) -> Result<()> {
    match role {
        Role::Coordinator => run_coordinator(config).await,
        Role::Worker => serve_worker(config).await,
    }
}

/// Coordinator: supervise the worker pool until shutdown
async fn run_coordinator(config: &StrutConfig) -> Result<()> {
    let pool_size = config.pool_size();
    info!(
        "coordinator starting {} workers on {}:{}",
        pool_size, config.server.host, config.server.port
    );

    let (tx, rx) = mpsc::channel::<WorkerEvent>(EVENT_CHANNEL_CAPACITY);
    let spawner = ProcessSpawner::new(tx)?;
    let children = spawner.children();
    let pool = WorkerPool::new(pool_size, Box::new(spawner))?;

    tokio::select! {
        result = pool.run(rx) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received, stopping workers");
            terminate_all(&children);
            Ok(())
        }
    }
}

/// Worker: bind the shared port, announce readiness, serve forever
async fn serve_worker(config: &StrutConfig) -> Result<()> {
    let listener = listener::bind_reuseport(&config.server.host, config.server.port)?;
    let state = Arc::new(AppState::from_config(config));

    // The coordinator's watcher turns this line into the online event.
    // Logs go to stderr, so stdout carries only the sentinel.
    println!("{}", READY_SENTINEL);
    std::io::stdout()
        .flush()
        .map_err(|e| StrutError::Server(format!("failed to announce readiness: {}", e)))?;

    info!("worker serving on {}:{}", config.server.host, config.server.port);
    serve(listener, state).await
}

/// Run the prototype server: one process, no pool
pub async fn run_proto(config: &StrutConfig) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.proto_port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| StrutError::Server(format!("failed to bind {}: {}", addr, e)))?;
    let state = Arc::new(AppState::from_config(config));

    info!("prototype server on http://{}", addr);
    serve(listener, state).await
}

/// Accept loop: one spawned http1 connection per client
async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);

                tokio::spawn(async move {
                    debug!("accepted connection from {}", addr);

                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, req).await }
                    });

                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        error!("connection error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

/// Hyper entry point; the body is never read
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    Ok(route(&state, &method, &path).await)
}

/// Route one request: static asset, then catch-all app shell
async fn route(state: &AppState, method: &Method, path: &str) -> Response<Full<Bytes>> {
    if method != Method::GET && method != Method::HEAD {
        return plain_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let response = respond(state, path).await;
    if method == Method::HEAD {
        strip_body(response)
    } else {
        response
    }
}

/// Build the full GET response for a path
async fn respond(state: &AppState, path: &str) -> Response<Full<Bytes>> {
    // Static assets win over the catch-all route
    if let Some(file) = resolve_public(&state.public_dir, path) {
        if let Ok(contents) = tokio::fs::read(&file).await {
            debug!("serving static {}", file.display());
            let mut response = Response::new(Full::new(Bytes::from(contents)));
            response.headers_mut().insert(
                hyper::header::CONTENT_TYPE,
                content_type(&file).parse().unwrap(),
            );
            return response;
        }
    }

    // Catch-all: the host application's renderer produces the root
    // markup; this stand-in ships an empty mount point.
    match render::render_page("", state.assets.as_ref()) {
        Ok(html) => {
            let mut response = Response::new(Full::new(Bytes::from(html)));
            response.headers_mut().insert(
                hyper::header::CONTENT_TYPE,
                "text/html; charset=utf-8".parse().unwrap(),
            );
            response
        }
        Err(e) => {
            error!("render failed: {}", e);
            plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Drop the body for a HEAD response, keeping status and headers
///
/// Hyper does not strip bodies from manually built responses, and the
/// advertised length must stay the one the matching GET would report.
fn strip_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    use hyper::body::Body;

    let (mut parts, body) = response.into_parts();
    let len = body.size_hint().exact().unwrap_or(0);
    parts
        .headers
        .insert(hyper::header::CONTENT_LENGTH, len.into());
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Plain-text response with the given status
fn plain_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
}

/// Content type from a file extension, defaulting to octet-stream
fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
