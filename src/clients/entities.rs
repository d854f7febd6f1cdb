use serde::{Deserialize, Serialize};

/// A performer credited on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Display name
    pub name: String,
}

/// One rendition of the album cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image location
    pub url: String,
}

/// The album a track belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album title
    pub name: String,
    /// Cover art, largest first
    pub images: Vec<Image>,
}

impl Album {
    /// First image in the album's list, usually the largest one.
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

/// A track as returned by the backend proxy. Fields not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Provider id
    pub id: String,
    /// Track title
    pub name: String,
    /// Credited artists, in order
    pub artists: Vec<Artist>,
    /// Album the track appears on
    pub album: Album,
}

impl Track {
    /// Artist names joined with `, `.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
