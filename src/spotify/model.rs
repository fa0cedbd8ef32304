use serde::Deserialize;

/// A track as shown by the widget. Any of the strings may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub artwork_url: String,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<TrackItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentlyPlayed {
    #[serde(default)]
    pub items: Vec<PlayHistory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayHistory {
    pub track: TrackItem,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrackItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistItem>,
    // Episodes come without an album.
    #[serde(default)]
    pub album: AlbumItem,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AlbumItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistItem {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageItem {
    pub url: String,
}

impl TrackItem {
    pub fn into_track(self, is_playing: bool) -> Track {
        Track {
            name: self.name,
            artist: self
                .artists
                .into_iter()
                .next()
                .map(|a| a.name)
                .unwrap_or_default(),
            album: self.album.name,
            artwork_url: self
                .album
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_default(),
            is_playing,
        }
    }
}
