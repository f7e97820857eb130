use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Length of a song, kept as the (minutes, seconds) pair it was entered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub minutes: i64,
    pub seconds: i64,
}

impl Duration {
    pub fn new(minutes: i64, seconds: i64) -> Self {
        Self { minutes, seconds }
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// Represent a song in the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub artist: String,
    pub title: String,
    pub duration: Duration,
    pub source: String,
}

/// Identity of a song inside the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SongKey<'a> {
    pub artist: &'a str,
    pub title: &'a str,
}

impl Song {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        duration: Duration,
        source: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            duration,
            source: source.into(),
        }
    }

    pub fn key(&self) -> SongKey<'_> {
        SongKey {
            artist: &self.artist,
            title: &self.title,
        }
    }
}

impl Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({}) [{}]",
            self.artist, self.title, self.duration, self.source
        )
    }
}
