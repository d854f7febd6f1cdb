//! Serves the page to a browser: `/` mounts and renders, `/login` starts the
//! authorization redirect.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use log::{debug, info, warn};
use url::Url;

use crate::app::{App, Navigation};
use crate::clients::{ApiClient, Backend, KeyValueStorage, LocalStorage, errors::Result};
use crate::config::Config;
use crate::render;

const ORIGIN: &str = "http://localhost/";

/// Shared between requests.
pub struct ServerState<B, S> {
    backend: Arc<B>,
    storage: Arc<S>,
}

impl<B, S> ServerState<B, S> {
    /// Bundles the backend and storage handles.
    pub fn new(backend: Arc<B>, storage: Arc<S>) -> Self {
        ServerState { backend, storage }
    }
}

/// `/` and `/login` bound to `state`.
pub fn router<B, S>(state: Arc<ServerState<B, S>>) -> Router
where
    B: Backend + 'static,
    S: KeyValueStorage + 'static,
{
    Router::new()
        .route("/", get(index::<B, S>))
        .route("/login", get(login::<B, S>))
        .with_state(state)
}

/// Opens storage, builds the HTTP client and serves until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let storage = Arc::new(LocalStorage::open(&config.storage_path).await?);
    let backend = Arc::new(ApiClient::from_config(&config));
    let app = router(Arc::new(ServerState::new(backend, storage)));

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("Serving on http://{}", config.bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}

fn navigation_for(uri: &Uri) -> Result<Navigation> {
    let url = Url::parse(ORIGIN)?.join(&uri.to_string())?;
    Ok(Navigation::new(url))
}

async fn index<B, S>(State(state): State<Arc<ServerState<B, S>>>, uri: Uri) -> Response
where
    B: Backend + 'static,
    S: KeyValueStorage + 'static,
{
    let mut navigation = match navigation_for(&uri) {
        Ok(n) => n,
        Err(e) => {
            warn!("Rejecting request for {uri}: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let mut app = App::new(state.backend.clone(), state.storage.clone());
    app.mount(&mut navigation).await;
    debug!("Rendering page, logged in: {}", app.state().is_logged_in);

    Html(render::page(app.state(), navigation.replaced())).into_response()
}

async fn login<B, S>(State(state): State<Arc<ServerState<B, S>>>, uri: Uri) -> Response
where
    B: Backend + 'static,
    S: KeyValueStorage + 'static,
{
    let mut navigation = match navigation_for(&uri) {
        Ok(n) => n,
        Err(e) => {
            warn!("Rejecting request for {uri}: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let app = App::new(state.backend.clone(), state.storage.clone());
    app.login(&mut navigation).await;

    // A failed login lands back on the unchanged page.
    Redirect::to(navigation.assigned().unwrap_or("/")).into_response()
}
