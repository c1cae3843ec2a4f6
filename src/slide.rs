use std::ops::Index;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PlaylistError;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi"];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Image,
    Video,
}

impl SlideKind {
    /// Guesses the kind from the file extension of `source`.
    pub fn from_source(source: &str) -> Self {
        let extension = Path::new(source)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            SlideKind::Video
        } else {
            SlideKind::Image
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub source: String,
    pub kind: SlideKind,
    pub label: String,
}

impl Slide {
    pub fn new(source: impl Into<String>, kind: SlideKind, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            label: label.into(),
        }
    }

    /// Builds the slide at `position` (0-based) from just its location.
    pub fn from_source(source: impl Into<String>, position: usize) -> Self {
        let source = source.into();
        let kind = SlideKind::from_source(&source);
        Self::new(source, kind, default_label(position))
    }

    pub fn is_video(&self) -> bool {
        self.kind == SlideKind::Video
    }
}

pub fn default_label(position: usize) -> String {
    format!("Memory {}", position + 1)
}

/// The fixed, never-empty slide sequence a carousel plays through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    slides: Vec<Slide>,
}

impl Playlist {
    pub fn new(slides: Vec<Slide>) -> Result<Self, PlaylistError> {
        if slides.is_empty() {
            return Err(PlaylistError::Empty);
        }
        Ok(Self { slides })
    }

    pub fn from_sources<I, S>(sources: I) -> Result<Self, PlaylistError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slides = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| Slide::from_source(source, i))
            .collect();
        Self::new(slides)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always `false` for a constructed playlist.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Maps any index onto the sequence.
    pub fn wrap(&self, index: usize) -> usize {
        index % self.slides.len()
    }
}

impl Index<usize> for Playlist {
    type Output = Slide;

    fn index(&self, index: usize) -> &Slide {
        &self.slides[index]
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(SlideKind::from_source("/couple1.jpg"), SlideKind::Image);
        assert_eq!(SlideKind::from_source("/reel1.mp4"), SlideKind::Video);
        assert_eq!(SlideKind::from_source("clips/REEL.MOV"), SlideKind::Video);
        assert_eq!(SlideKind::from_source("no_extension"), SlideKind::Image);
    }

    #[test]
    fn labels_are_one_based() {
        let playlist = Playlist::from_sources(["a.jpg", "b.mp4"]).unwrap();
        assert_eq!(playlist[0].label, "Memory 1");
        assert_eq!(playlist[1].label, "Memory 2");
        assert!(playlist[1].is_video());
    }

    #[test]
    fn empty_playlist_is_rejected() {
        let err = Playlist::new(Vec::new()).unwrap_err();
        assert!(matches!(err, PlaylistError::Empty));
    }

    #[test]
    fn wrap_keeps_index_in_range() {
        let playlist = Playlist::from_sources(["a.jpg", "b.jpg", "c.jpg"]).unwrap();
        assert_eq!(playlist.wrap(0), 0);
        assert_eq!(playlist.wrap(3), 0);
        assert_eq!(playlist.wrap(7), 1);
    }
}
