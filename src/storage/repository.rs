use crate::{domain::song::Song, storage::error::StorageError};

/// Whether the repository accepts two songs with the same (artist, title).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    Allow,
}

/// In-memory song store
///
/// Songs keep their insertion order. Removal reports the position the song
/// occupied so it can be put back exactly where it was.
#[derive(Debug, Default)]
pub struct Repository {
    songs: Vec<Song>,
    policy: DuplicatePolicy,
}

impl Repository {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            songs: Vec::new(),
            policy,
        }
    }

    /// builds a repository holding `songs`, checking them against `policy`
    pub fn with_songs(
        policy: DuplicatePolicy,
        songs: impl IntoIterator<Item = Song>,
    ) -> Result<Self, StorageError> {
        let mut repo = Self::new(policy);
        for song in songs {
            repo.add_song(song)?;
        }
        Ok(repo)
    }

    pub fn add_song(&mut self, song: Song) -> Result<(), StorageError> {
        let end = self.songs.len();
        self.insert_song_at(end, song)
    }

    /// Inserts `song` at `position`, or at the end if the repository got shorter.
    pub fn insert_song_at(&mut self, position: usize, song: Song) -> Result<(), StorageError> {
        if self.policy == DuplicatePolicy::Reject && self.position_of(&song).is_some() {
            return Err(StorageError::duplicate(&song.artist, &song.title));
        }

        let position = position.min(self.songs.len());
        log::debug!("inserting {song} at position {position}");
        self.songs.insert(position, song);
        Ok(())
    }

    /// Removes the song with the same (artist, title) and returns where it was.
    ///
    /// If duplicates are allowed, the most recently inserted match goes.
    pub fn remove_song(&mut self, song: &Song) -> Result<usize, StorageError> {
        let position = self
            .position_of(song)
            .ok_or_else(|| StorageError::not_found(&song.artist, &song.title))?;

        let removed = self.songs.remove(position);
        log::debug!("removed {removed} from position {position}");
        Ok(position)
    }

    pub fn find_by_artist_and_title(&self, artist: &str, title: &str) -> Result<Song, StorageError> {
        self.songs
            .iter()
            .rev()
            .find(|s| s.artist == artist && s.title == title)
            .cloned()
            .ok_or_else(|| StorageError::not_found(artist, title))
    }

    /// snapshot of every song, in insertion order
    pub fn songs(&self) -> Vec<Song> {
        self.songs.clone()
    }

    pub fn songs_by_artist(&self, artist: &str) -> Vec<Song> {
        self.songs
            .iter()
            .filter(|s| s.artist == artist)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn position_of(&self, song: &Song) -> Option<usize> {
        let key = song.key();
        self.songs.iter().rposition(|s| s.key() == key)
    }
}
