//! The view controller: login state, the track list, and the effects that fill them.

use std::sync::Arc;

use log::{debug, error, info};
use url::Url;

use crate::clients::{Backend, KeyValueStorage, entities::Track, errors::Result};

/// Storage key holding the raw access token.
pub const TOKEN_STORAGE_KEY: &str = "spotify_token";

/// Query parameter the authorization flow uses to hand the token back.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// What the page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// A token is known to exist
    pub is_logged_in: bool,
    /// Last successfully fetched list
    pub top_tracks: Vec<Track>,
}

/// The page location as seen by the controller.
///
/// `assign` navigates away (full redirect), `replace_state` rewrites the
/// current entry without navigating. Whoever owns the page reads both back
/// after the controller ran and applies them.
#[derive(Debug, Clone)]
pub struct Navigation {
    url: Url,
    assigned: Option<String>,
    replaced: Option<String>,
}

impl Navigation {
    /// Location at `url`, nothing assigned or replaced yet.
    pub fn new(url: Url) -> Self {
        Navigation {
            url,
            assigned: None,
            replaced: None,
        }
    }

    /// Same as [`Navigation::new`] from a string.
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Current location, after any `replace_state`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Value of the first `name` parameter in the query, or `None` when it
    /// is missing or empty.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    }

    /// Requests navigation to `url`.
    pub fn assign(&mut self, url: impl Into<String>) {
        self.assigned = Some(url.into());
    }

    /// Rewrites the location to `path` and drops the query string.
    pub fn replace_state(&mut self, path: &str) {
        self.url.set_query(None);
        self.url.set_path(path);
        self.replaced = Some(path.to_string());
    }

    /// Target of the last `assign`.
    pub fn assigned(&self) -> Option<&str> {
        self.assigned.as_deref()
    }

    /// Path of the last `replace_state`.
    pub fn replaced(&self) -> Option<&str> {
        self.replaced.as_deref()
    }
}

/// Page controller over a backend and a storage.
pub struct App<B, S> {
    backend: Arc<B>,
    storage: Arc<S>,
    state: AppState,
}

impl<B: Backend, S: KeyValueStorage> App<B, S> {
    /// Fresh, logged-out controller.
    pub fn new(backend: Arc<B>, storage: Arc<S>) -> Self {
        App {
            backend,
            storage,
            state: AppState::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Resolves the token for this view and loads tracks if there is one.
    ///
    /// A token in the URL wins over a stored one; it is persisted and the
    /// query string is stripped once the fetch has been issued.
    pub async fn mount(&mut self, navigation: &mut Navigation) {
        if let Some(token) = navigation.query_param(ACCESS_TOKEN_PARAM) {
            info!("Received access token from authorization redirect");
            if let Err(e) = self.storage.set_item(TOKEN_STORAGE_KEY, &token).await {
                error!("Failed to store access token: {e}");
            }
            self.state.is_logged_in = true;
            self.fetch_top_tracks().await;
            navigation.replace_state("/");
        } else if self.stored_token().await.is_some() {
            debug!("Found stored access token");
            self.state.is_logged_in = true;
            self.fetch_top_tracks().await;
        } else {
            debug!("No access token available, showing login");
        }
    }

    /// Sends the browser to the authorization provider. Failures are logged only.
    pub async fn login(&self, navigation: &mut Navigation) {
        match self.backend.auth_url().await {
            Ok(url) => {
                info!("Redirecting to authorization provider");
                navigation.assign(url);
            }
            Err(e) => error!("Login error: {e}"),
        }
    }

    /// Replaces the track list with the backend's answer. Does nothing
    /// without a stored token; keeps the previous list on failure.
    pub async fn fetch_top_tracks(&mut self) {
        let Some(token) = self.stored_token().await else {
            return;
        };
        match self.backend.top_tracks(&token).await {
            Ok(tracks) => self.state.top_tracks = tracks,
            Err(e) => error!("Error fetching top tracks: {e}"),
        }
    }

    async fn stored_token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_STORAGE_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                error!("Failed to read access token: {e}");
                None
            }
        }
    }
}
