use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, rename = "coverImage")]
    pub cover_image: Option<String>,
    #[serde(default, rename = "audioFile")]
    pub audio_file: Option<String>,
}

impl Track {
    pub fn has_audio(&self) -> bool {
        self.audio_file
            .as_ref()
            .map(|file| !file.trim().is_empty())
            .unwrap_or(false)
    }

    /// Equality that treats a blank audio reference the same as a missing one.
    pub fn same_content(&self, other: &Track) -> bool {
        fn audio(track: &Track) -> Option<&str> {
            track
                .audio_file
                .as_deref()
                .map(str::trim)
                .filter(|file| !file.is_empty())
        }

        self.id == other.id
            && self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && self.genres == other.genres
            && self.cover_image == other.cover_image
            && audio(self) == audio(other)
    }
}

/// Mutable subset of a track sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackInput {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub genres: Vec<String>,
    #[serde(
        default,
        rename = "coverImage",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Artist,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Title, SortKey::Artist];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Artist => "artist",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Sort by Title",
            Self::Artist => "Sort by Artist",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

/// Parameters of one `GET /tracks` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    pub page: u32,
    pub sort: SortKey,
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub search: Option<String>,
}

impl Default for TrackQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortKey::Title,
            genre: None,
            artist: None,
            search: None,
        }
    }
}

impl TrackQuery {
    /// Query string pairs in wire order. Empty filters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        let optional = [
            ("genre", &self.genre),
            ("artist", &self.artist),
            ("search", &self.search),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.clone()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self { total_pages: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackPage {
    #[serde(default)]
    pub data: Vec<Track>,
    #[serde(default)]
    pub meta: PageMeta,
}
