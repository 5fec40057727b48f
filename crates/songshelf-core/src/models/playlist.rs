use serde::{Deserialize, Serialize};

use crate::navigation::PlaylistId;
use crate::utils::format::{format_date, format_duration, preview_text};

/// Shown when a playlist has no description
const NO_DESCRIPTION: &str = "No description";

/// Shown in place of a remote id for playlists created locally
const CUSTOM_PLAYLIST: &str = "Custom playlist";

/// Descriptions are cut to this many characters on cards
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// A playlist owned by the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: PlaylistId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "neteasePlaylistId", default)]
    pub remote_id: Option<String>,
    #[serde(rename = "coverUrl", default)]
    pub cover_url: Option<String>,
    #[serde(rename = "songCount", default)]
    pub song_count: Option<u64>,
    #[serde(rename = "trackCount", default)]
    pub track_count: Option<u64>,
    /// RFC 3339 text or epoch milliseconds, kept as text
    #[serde(rename = "createdAt", default, deserialize_with = "deserialize_string_or_number")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, deserialize_with = "deserialize_string_or_number")]
    pub updated_at: Option<String>,
}

impl Playlist {
    pub fn display_song_count(&self) -> u64 {
        self.song_count.or(self.track_count).unwrap_or(0)
    }

    /// Card preview of the description.
    pub fn description_preview(&self) -> String {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => preview_text(text, DESCRIPTION_PREVIEW_CHARS),
            _ => NO_DESCRIPTION.to_string(),
        }
    }

    /// Full description for the detail page.
    pub fn display_description(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NO_DESCRIPTION,
        }
    }

    pub fn display_remote_id(&self) -> &str {
        match self.remote_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => CUSTOM_PLAYLIST,
        }
    }

    pub fn display_created_at(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}

/// A playlist found on the remote music service, not yet imported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemotePlaylist {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "coverUrl", alias = "coverImgUrl", default)]
    pub cover_url: Option<String>,
    #[serde(rename = "trackCount", default)]
    pub track_count: Option<u64>,
}

impl RemotePlaylist {
    pub fn description_preview(&self) -> String {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => preview_text(text, DESCRIPTION_PREVIEW_CHARS),
            _ => NO_DESCRIPTION.to_string(),
        }
    }

    pub fn display_track_count(&self) -> u64 {
        self.track_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "artists")]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Length in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Song {
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or("-")
    }

    pub fn display_album(&self) -> &str {
        self.album.as_deref().unwrap_or("-")
    }

    pub fn display_duration(&self) -> String {
        format_duration(self.duration)
    }
}

// Remote ids arrive as numbers from some endpoints and strings from others
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}
