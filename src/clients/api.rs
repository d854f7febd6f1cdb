use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};

use crate::clients::{
    entities::Track,
    errors::{Error, Result},
};
use crate::config::{AuthorizationScheme, Config};

#[derive(Deserialize, Debug)]
struct AuthUrlResponse {
    auth_url: String,
}

#[derive(Deserialize, Debug)]
struct TopTracksResponse {
    items: Vec<Track>,
}

/// The two calls the front-end makes against the backend proxy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Asks the authorization endpoint where to send the browser.
    async fn auth_url(&self) -> Result<String>;

    /// Fetches the user's top tracks, authenticated with `token`.
    async fn top_tracks(&self, token: &str) -> Result<Vec<Track>>;
}

/// reqwest-backed [`Backend`] for the configured proxy.
pub struct ApiClient {
    client: Client,
    auth_endpoint: String,
    top_tracks_url: String,
    authorization: AuthorizationScheme,
}

impl ApiClient {
    /// Wraps an existing HTTP client.
    pub fn new(client: Client, config: &Config) -> Self {
        ApiClient {
            client,
            auth_endpoint: config.auth_endpoint.to_string(),
            top_tracks_url: config.top_tracks_url(),
            authorization: config.authorization,
        }
    }

    /// Builds a client with a fresh `reqwest::Client`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Client::new(), config)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn auth_url(&self) -> Result<String> {
        debug!("Requesting authorization URL from {}", self.auth_endpoint);
        let response = self.client.get(&self.auth_endpoint).send().await?;
        let body: AuthUrlResponse = parse_body(response).await?;
        Ok(body.auth_url)
    }

    async fn top_tracks(&self, token: &str) -> Result<Vec<Track>> {
        debug!("Fetching top tracks from {}", self.top_tracks_url);
        let response = self
            .client
            .get(&self.top_tracks_url)
            .header(AUTHORIZATION, self.authorization.header_value(token))
            .send()
            .await?;
        let body: TopTracksResponse = parse_body(response).await?;
        debug!("Fetched {} top tracks", body.items.len());
        Ok(body.items)
    }
}

// Non-2xx answers and bodies of the wrong shape are both errors for the caller.
async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
