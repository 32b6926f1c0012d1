use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("Track attribute {0} is missing or empty")]
    MissingAttribute(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_artist: Option<String>,
    pub audio_url: String,
    pub cover_url: String,
}

impl Track {
    /// Builds a track from the data attributes carried by a play button.
    ///
    /// Required keys are `id`, `url`, `title`, `artist` and `cover`. `featured` is optional and
    /// ignored when blank.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Result<Self, TrackError> {
        let required = |key: &'static str| {
            attributes
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
                .ok_or(TrackError::MissingAttribute(key))
        };

        Ok(Self {
            id: required("id")?,
            audio_url: required("url")?,
            title: required("title")?,
            artist: required("artist")?,
            cover_url: required("cover")?,
            featured_artist: attributes
                .get("featured")
                .map(|f| f.trim().to_owned())
                .filter(|f| !f.is_empty()),
        })
    }

    pub fn display_artist(&self) -> String {
        match &self.featured_artist {
            Some(featured) => format!("{} feat. {featured}", self.artist),
            None => self.artist.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rstest::*;

    use super::*;

    fn attributes(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    fn test_from_attributes_with_featured_artist() {
        let track = Track::from_attributes(&attributes(&[
            ("id", "7"),
            ("url", "https://cdn.example.com/audios/7.mp3"),
            ("title", "Night Drive"),
            ("artist", "Kodo"),
            ("featured", "Mira"),
            ("cover", "https://cdn.example.com/covers/7.jpg"),
        ]))
        .unwrap();

        assert_eq!("7", track.id);
        assert_eq!("Kodo feat. Mira", track.display_artist());
    }

    #[rstest(featured, case(None), case(Some("")), case(Some("  ")))]
    fn test_from_attributes_without_featured_artist(featured: Option<&str>) {
        let mut attrs = attributes(&[
            ("id", "7"),
            ("url", "u"),
            ("title", "t"),
            ("artist", "Kodo"),
            ("cover", "c"),
        ]);
        if let Some(featured) = featured {
            attrs.insert("featured".to_owned(), featured.to_owned());
        }

        let track = Track::from_attributes(&attrs).unwrap();

        assert_eq!(None, track.featured_artist);
        assert_eq!("Kodo", track.display_artist());
    }

    #[rstest(missing, case("id"), case("url"), case("title"), case("artist"), case("cover"))]
    fn test_from_attributes_missing(missing: &'static str) {
        let mut attrs = attributes(&[
            ("id", "7"),
            ("url", "u"),
            ("title", "t"),
            ("artist", "a"),
            ("cover", "c"),
        ]);
        attrs.remove(missing);

        assert_matches!(
            Track::from_attributes(&attrs),
            Err(TrackError::MissingAttribute(key)) if key == missing
        );
    }
}
