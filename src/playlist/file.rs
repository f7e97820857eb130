//! Playlist persisted as a flat CSV or JSON file

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{
    domain::song::Song,
    playlist::{Playlist, PlaylistError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Serialize)]
struct PlaylistDocument<'a> {
    saved_at: String,
    songs: &'a [Song],
}

#[derive(Debug, Default)]
pub struct FilePlaylist {
    songs: Vec<Song>,
    current: Option<usize>,
    filename: Option<PathBuf>,
    format: PlaylistFormat,
}

impl FilePlaylist {
    pub fn new(format: PlaylistFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_filename(format: PlaylistFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            filename: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn current(&self) -> Option<&Song> {
        self.current.and_then(|i| self.songs.get(i))
    }

    fn render(&self) -> Result<String, PlaylistError> {
        match self.format {
            PlaylistFormat::Csv => Ok(self
                .songs
                .iter()
                .map(|s| {
                    [
                        csv_field(&s.artist),
                        csv_field(&s.title),
                        s.duration.to_string(),
                        csv_field(&s.source),
                    ]
                    .join(",")
                })
                .map(|line| line + "\n")
                .collect()),
            PlaylistFormat::Json => {
                let doc = PlaylistDocument {
                    saved_at: Local::now().to_rfc3339(),
                    songs: &self.songs,
                };
                Ok(serde_json::to_string_pretty(&doc)?)
            }
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl Playlist for FilePlaylist {
    fn add(&mut self, song: Song) {
        log::debug!("playlist: queued {song}");
        self.songs.push(song);
    }

    fn play(&mut self) -> Option<Song> {
        self.current = if self.songs.is_empty() { None } else { Some(0) };
        let song = self.current().cloned();
        if let Some(song) = &song {
            log::info!("playing {song}");
        }
        song
    }

    fn next(&mut self) -> Option<Song> {
        if self.songs.is_empty() {
            return None;
        }
        self.current = Some(match self.current {
            Some(i) => (i + 1) % self.songs.len(),
            None => 0,
        });
        let song = self.current().cloned();
        if let Some(song) = &song {
            log::info!("playing {song}");
        }
        song
    }

    fn set_filename(&mut self, path: &Path) {
        self.filename = Some(path.to_path_buf());
    }

    fn write_to_file(&self) -> Result<PathBuf, PlaylistError> {
        let path = self.filename.clone().ok_or(PlaylistError::NoFilename)?;
        std::fs::write(&path, self.render()?)?;
        log::info!(
            "saved {} songs to playlist {}",
            self.songs.len(),
            path.to_string_lossy()
        );
        Ok(path)
    }

    fn display_playlist(&self) -> String {
        let mut out = String::new();
        if let Some(path) = &self.filename {
            out.push_str(&format!("Playlist {}\n", path.to_string_lossy()));
        }
        for (i, song) in self.songs.iter().enumerate() {
            let marker = if self.current == Some(i) { ">" } else { " " };
            out.push_str(&format!("{marker} {}. {song}\n", i + 1));
        }
        out
    }

    fn songs(&self) -> Vec<Song> {
        self.songs.clone()
    }
}
