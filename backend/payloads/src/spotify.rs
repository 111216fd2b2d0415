use serde::{Deserialize, Serialize};

/// Currently playing track, or the most recent one when nothing plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    /// All artist names joined by ", ".
    pub artist: String,
    pub artist_url: String,
    pub album_art: String,
    pub song_url: String,
    pub is_playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}
