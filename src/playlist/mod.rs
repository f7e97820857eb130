use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::song::Song;

pub mod file;

pub use file::{FilePlaylist, PlaylistFormat};

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist has no filename to write to")]
    NoFilename,

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode playlist: {0}")]
    Json(#[from] serde_json::Error),
}

/// A list of songs queued for playback, which can be written to disk
pub trait Playlist {
    fn add(&mut self, song: Song);

    /// Starts from the first song. Returns it, if any.
    fn play(&mut self) -> Option<Song>;

    /// Moves to the next song, wrapping around after the last one.
    fn next(&mut self) -> Option<Song>;

    fn set_filename(&mut self, path: &Path);

    fn write_to_file(&self) -> Result<PathBuf, PlaylistError>;

    /// human readable listing, marking the current song
    fn display_playlist(&self) -> String;

    /// queued songs, in playback order
    fn songs(&self) -> Vec<Song>;
}
