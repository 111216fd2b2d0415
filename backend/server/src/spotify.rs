//! # Spotify
//!
//! Now-playing proxy. Every call trades the long-lived refresh token for an
//! access token, asks for the currently playing track and falls back to the
//! most recently played one when nothing is playing. Any failure is "no
//! data", never an error page.
use payloads::spotify::Track;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SpotifyCredentials;

pub const TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
pub const NOW_PLAYING_ENDPOINT: &str = "https://api.spotify.com/v1/me/player/currently-playing";
pub const RECENTLY_PLAYED_ENDPOINT: &str =
    "https://api.spotify.com/v1/me/player/recently-played?limit=1";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct CurrentlyPlaying {
    #[serde(default)]
    is_playing: bool,
    progress_ms: Option<u64>,
    item: Option<ApiTrack>,
}

#[derive(Deserialize)]
struct RecentlyPlayed {
    #[serde(default)]
    items: Vec<PlayHistory>,
}

#[derive(Deserialize)]
struct PlayHistory {
    track: ApiTrack,
    played_at: String,
}

#[derive(Deserialize)]
struct ApiTrack {
    name: String,
    #[serde(default)]
    artists: Vec<Artist>,
    #[serde(default)]
    album: Album,
    #[serde(default)]
    external_urls: ExternalUrls,
    duration_ms: Option<u64>,
}

#[derive(Deserialize)]
struct Artist {
    name: String,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Deserialize, Default)]
struct Album {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Deserialize)]
struct Image {
    url: String,
}

#[derive(Deserialize, Default)]
struct ExternalUrls {
    #[serde(default)]
    spotify: String,
}

impl ApiTrack {
    fn into_track(self, is_playing: bool) -> Track {
        let artist = self
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Track {
            name: self.name,
            artist,
            artist_url: self
                .artists
                .first()
                .map(|artist| artist.external_urls.spotify.clone())
                .unwrap_or_default(),
            album_art: self
                .album
                .images
                .into_iter()
                .next()
                .map(|image| image.url)
                .unwrap_or_default(),
            song_url: self.external_urls.spotify,
            is_playing,
            played_at: None,
            progress_ms: None,
            duration_ms: self.duration_ms,
        }
    }
}

impl CurrentlyPlaying {
    fn into_track(self) -> Option<Track> {
        let mut track = self.item?.into_track(self.is_playing);
        track.progress_ms = self.progress_ms;
        Some(track)
    }
}

impl RecentlyPlayed {
    fn into_track(self) -> Option<Track> {
        let history = self.items.into_iter().next()?;

        let mut track = history.track.into_track(false);
        track.played_at = Some(history.played_at);
        track.duration_ms = None;
        Some(track)
    }
}

pub struct NowPlaying {
    client: Client,
    credentials: Option<SpotifyCredentials>,
}

impl NowPlaying {
    pub fn new(client: Client, credentials: Option<SpotifyCredentials>) -> Self {
        if credentials.is_none() {
            info!("Spotify credentials missing, now playing disabled");
        }

        Self {
            client,
            credentials,
        }
    }

    pub async fn current_or_recent(&self) -> Option<Track> {
        let credentials = self.credentials.as_ref()?;

        self.fetch(credentials).await.unwrap_or_else(|e| {
            warn!("Error fetching Spotify data: {e}");
            None
        })
    }

    async fn fetch(&self, credentials: &SpotifyCredentials) -> Result<Option<Track>, reqwest::Error> {
        let token = self.access_token(credentials).await?;

        let response = self
            .client
            .get(NOW_PLAYING_ENDPOINT)
            .bearer_auth(&token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => self.recently_played(&token).await,
            status if !status.is_success() => {
                warn!("Currently playing lookup returned {status}");
                Ok(None)
            }
            _ => Ok(response.json::<CurrentlyPlaying>().await?.into_track()),
        }
    }

    async fn access_token(&self, credentials: &SpotifyCredentials) -> Result<String, reqwest::Error> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_ENDPOINT)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(token.access_token)
    }

    async fn recently_played(&self, token: &str) -> Result<Option<Track>, reqwest::Error> {
        let response = self
            .client
            .get(RECENTLY_PLAYED_ENDPOINT)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Recently played lookup returned {}", response.status());
            return Ok(None);
        }

        Ok(response.json::<RecentlyPlayed>().await?.into_track())
    }
}
