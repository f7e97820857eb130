//! Orchestrates repository mutations and keeps their undo history.

use std::{cell::RefCell, path::Path, rc::Rc};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{
        song::{Duration, Song},
        validator::{SongValidator, ValidationError},
    },
    playlist::{Playlist, PlaylistError},
    storage::{error::StorageError, repository::Repository},
    undo::{UndoAction, UndoError, UndoHistory},
};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("there are no more actions to undo")]
    EmptyHistory,

    #[error("playlist error: {0}")]
    Playlist(#[from] PlaylistError),
}

/// What to do with an undo record whose reversal failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoFailurePolicy {
    /// The record is dropped and that history entry is lost.
    #[default]
    Discard,
    /// The record goes back on top of the history.
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Reverted {
        description: String,
    },
    /// The reversal did not apply; the repository is unchanged.
    Failed {
        description: String,
        error: UndoError,
        restored: bool,
    },
}

pub struct Controller {
    repo: Rc<RefCell<Repository>>,
    validator: SongValidator,
    history: UndoHistory,
    on_undo_failure: UndoFailurePolicy,
    playlist: Option<Box<dyn Playlist>>,
}

impl Controller {
    pub fn new(repo: Repository, validator: SongValidator) -> Self {
        Self {
            repo: Rc::new(RefCell::new(repo)),
            validator,
            history: UndoHistory::default(),
            on_undo_failure: UndoFailurePolicy::default(),
            playlist: None,
        }
    }

    pub fn with_undo_failure_policy(mut self, policy: UndoFailurePolicy) -> Self {
        self.on_undo_failure = policy;
        self
    }

    pub fn attach_playlist(&mut self, playlist: Box<dyn Playlist>) {
        self.playlist = Some(playlist);
    }

    /// Shared handle to the repository.
    ///
    /// Mutations made through it bypass the undo history.
    pub fn repository(&self) -> Rc<RefCell<Repository>> {
        Rc::clone(&self.repo)
    }

    pub fn songs(&self) -> Vec<Song> {
        self.repo.borrow().songs()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn add_song_to_repository(
        &mut self,
        artist: &str,
        title: &str,
        minutes: i64,
        seconds: i64,
        source: &str,
    ) -> Result<(), ControllerError> {
        let song = Song::new(artist, title, Duration::new(minutes, seconds), source);
        self.validator.validate(&song)?;
        self.repo.borrow_mut().add_song(song.clone())?;

        self.history.push(UndoAction::add(&self.repo, song));
        log::debug!("repository holds {} songs", self.repo.borrow().len());
        Ok(())
    }

    pub fn remove_song_from_repository(
        &mut self,
        artist: &str,
        title: &str,
    ) -> Result<(), ControllerError> {
        let song = self.repo.borrow().find_by_artist_and_title(artist, title)?;
        let position = self.repo.borrow_mut().remove_song(&song)?;

        self.history
            .push(UndoAction::remove(&self.repo, song, position));
        Ok(())
    }

    /// Reverts the most recent successful mutation.
    ///
    /// A failing reversal is reported through [`UndoOutcome::Failed`], not as
    /// an error; see [`UndoFailurePolicy`] for what happens to the record.
    pub fn undo(&mut self) -> Result<UndoOutcome, ControllerError> {
        let action = self.history.pop().ok_or(ControllerError::EmptyHistory)?;
        log::debug!("reverting undo record for {}", action.song());
        let description = action.description();
        let retained = match self.on_undo_failure {
            UndoFailurePolicy::Discard => None,
            UndoFailurePolicy::Restore => Some(action.clone()),
        };

        match action.execute_undo() {
            Ok(()) => {
                log::info!("undid {description}");
                Ok(UndoOutcome::Reverted { description })
            }
            Err(error) => {
                let restored = match retained {
                    Some(action) => {
                        self.history.push(action);
                        true
                    }
                    None => false,
                };
                log::warn!("failed to undo {description}: {error} (record restored: {restored})");
                Ok(UndoOutcome::Failed {
                    description,
                    error,
                    restored,
                })
            }
        }
    }

    pub fn add_song_to_playlist(&mut self, song: Song) {
        if let Some(playlist) = self.playlist.as_mut() {
            playlist.add(song);
        }
    }

    /// Queues every repository song by `artist`, returning how many were queued.
    pub fn add_all_songs_by_artist_to_playlist(&mut self, artist: &str) -> usize {
        let Some(playlist) = self.playlist.as_mut() else {
            return 0;
        };

        let songs = self.repo.borrow().songs_by_artist(artist);
        let count = songs.len();
        for song in songs {
            playlist.add(song);
        }
        count
    }

    pub fn start_playlist(&mut self) -> Option<Song> {
        self.playlist.as_mut().and_then(|p| p.play())
    }

    pub fn next_song_playlist(&mut self) -> Option<Song> {
        self.playlist.as_mut().and_then(|p| p.next())
    }

    /// Writes the playlist to `filename`. Returns `false` when no playlist is attached.
    pub fn save_playlist(&mut self, filename: &Path) -> Result<bool, ControllerError> {
        let Some(playlist) = self.playlist.as_mut() else {
            return Ok(false);
        };

        playlist.set_filename(filename);
        playlist.write_to_file()?;
        Ok(true)
    }

    pub fn playlist_songs(&self) -> Option<Vec<Song>> {
        self.playlist.as_ref().map(|p| p.songs())
    }

    pub fn open_playlist(&self) -> Option<String> {
        self.playlist.as_ref().map(|p| p.display_playlist())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::{
        controller::{Controller, ControllerError, UndoFailurePolicy, UndoOutcome},
        domain::{
            song::{Duration, Song},
            validator::SongValidator,
        },
        playlist::{FilePlaylist, PlaylistFormat},
        storage::{error::StorageError, repository::Repository},
        undo::UndoError,
    };

    fn controller() -> Controller {
        Controller::new(Repository::default(), SongValidator)
    }

    fn song(artist: &str, title: &str, minutes: i64, seconds: i64) -> Song {
        Song::new(artist, title, Duration::new(minutes, seconds), "src")
    }

    #[test]
    fn test_add_add_undo_undo_undo() -> anyhow::Result<()> {
        let mut ctrl = controller();

        ctrl.add_song_to_repository("A", "T1", 3, 30, "src")?;
        ctrl.add_song_to_repository("B", "T2", 4, 0, "src")?;

        ctrl.undo()?;
        assert_eq!(ctrl.songs(), vec![song("A", "T1", 3, 30)]);

        ctrl.undo()?;
        assert!(ctrl.songs().is_empty());

        assert!(matches!(ctrl.undo(), Err(ControllerError::EmptyHistory)));
        Ok(())
    }

    #[test]
    fn test_undo_on_empty_history_leaves_repository() -> anyhow::Result<()> {
        let repo = Repository::with_songs(Default::default(), [song("A", "1", 2, 0)])?;
        let mut ctrl = Controller::new(repo, SongValidator);

        assert!(matches!(ctrl.undo(), Err(ControllerError::EmptyHistory)));
        assert_eq!(ctrl.songs(), vec![song("A", "1", 2, 0)]);
        Ok(())
    }

    #[test]
    fn test_remove_then_undo_restores_identical_song() -> anyhow::Result<()> {
        let original = [
            song("A", "1", 2, 0),
            Song::new("B", "2", Duration::new(5, 12), "www.example.com"),
            song("C", "3", 1, 1),
        ];
        let repo = Repository::with_songs(Default::default(), original.clone())?;
        let mut ctrl = Controller::new(repo, SongValidator);

        ctrl.remove_song_from_repository("B", "2")?;
        assert_eq!(ctrl.songs().len(), 2);

        let outcome = ctrl.undo()?;

        assert_eq!(
            outcome,
            UndoOutcome::Reverted {
                description: "remove 'B - 2'".into()
            }
        );
        assert_eq!(ctrl.songs(), original.to_vec());
        Ok(())
    }

    #[test]
    fn test_remove_missing_song_records_nothing() -> anyhow::Result<()> {
        let mut ctrl = controller();
        ctrl.add_song_to_repository("A", "1", 2, 0, "src")?;

        let err = ctrl.remove_song_from_repository("Nobody", "Nothing").unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Storage(StorageError::NotFound { .. })
        ));
        assert_eq!(ctrl.history_len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_song_records_nothing() {
        let mut ctrl = controller();

        let err = ctrl.add_song_to_repository("A", "T", -1, 0, "src").unwrap_err();

        assert!(matches!(err, ControllerError::Validation(_)));
        assert_eq!(ctrl.history_len(), 0);
        assert!(ctrl.songs().is_empty());
    }

    #[test]
    fn test_duplicate_add_records_nothing() -> anyhow::Result<()> {
        let mut ctrl = controller();
        ctrl.add_song_to_repository("A", "T", 1, 0, "src")?;

        let err = ctrl.add_song_to_repository("A", "T", 2, 0, "other").unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Storage(StorageError::Duplicate { .. })
        ));
        assert_eq!(ctrl.history_len(), 1);
        Ok(())
    }

    #[test]
    fn test_undo_n_operations_restores_state_n_ago() -> anyhow::Result<()> {
        let repo = Repository::with_songs(
            Default::default(),
            [song("X", "1", 1, 0), song("Y", "2", 2, 0)],
        )?;
        let mut ctrl = Controller::new(repo, SongValidator);

        let mut states = vec![ctrl.songs()];
        ctrl.add_song_to_repository("A", "1", 3, 0, "src")?;
        states.push(ctrl.songs());
        ctrl.remove_song_from_repository("X", "1")?;
        states.push(ctrl.songs());
        ctrl.add_song_to_repository("B", "2", 4, 0, "src")?;
        states.push(ctrl.songs());
        ctrl.remove_song_from_repository("A", "1")?;
        states.push(ctrl.songs());
        ctrl.remove_song_from_repository("Y", "2")?;

        while let Some(expected) = states.pop() {
            ctrl.undo()?;
            assert_eq!(ctrl.songs(), expected);
        }
        assert_eq!(ctrl.history_len(), 0);
        Ok(())
    }

    #[test]
    fn test_failed_undo_discards_record() -> anyhow::Result<()> {
        let mut ctrl = controller();
        ctrl.add_song_to_repository("A", "1", 3, 0, "src")?;
        ctrl.add_song_to_repository("B", "2", 3, 0, "src")?;

        // remove behind the controller's back
        ctrl.repository()
            .borrow_mut()
            .remove_song(&song("B", "2", 3, 0))?;

        let outcome = ctrl.undo()?;

        assert!(matches!(
            outcome,
            UndoOutcome::Failed {
                error: UndoError::Storage(StorageError::NotFound { .. }),
                restored: false,
                ..
            }
        ));
        assert_eq!(ctrl.history_len(), 1);
        assert_eq!(ctrl.songs(), vec![song("A", "1", 3, 0)]);

        ctrl.undo()?;
        assert!(ctrl.songs().is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_undo_restores_record() -> anyhow::Result<()> {
        let mut ctrl = controller().with_undo_failure_policy(UndoFailurePolicy::Restore);
        ctrl.add_song_to_repository("A", "1", 3, 0, "src")?;
        ctrl.repository()
            .borrow_mut()
            .remove_song(&song("A", "1", 3, 0))?;

        let outcome = ctrl.undo()?;

        assert!(matches!(outcome, UndoOutcome::Failed { restored: true, .. }));
        assert_eq!(ctrl.history_len(), 1);

        // once the song is back, the kept record applies
        ctrl.repository()
            .borrow_mut()
            .add_song(song("A", "1", 3, 0))?;
        assert!(matches!(ctrl.undo()?, UndoOutcome::Reverted { .. }));
        assert!(ctrl.songs().is_empty());
        Ok(())
    }

    #[test]
    fn test_playlist_operations_without_playlist_are_noops() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let mut ctrl = controller();
        ctrl.add_song_to_repository("A", "1", 3, 0, "src")?;

        ctrl.add_song_to_playlist(song("A", "1", 3, 0));
        assert_eq!(ctrl.add_all_songs_by_artist_to_playlist("A"), 0);
        assert!(ctrl.start_playlist().is_none());
        assert!(ctrl.next_song_playlist().is_none());
        assert!(!ctrl.save_playlist(&tmp.path().join("list.csv"))?);
        assert!(ctrl.open_playlist().is_none());
        assert!(ctrl.playlist_songs().is_none());

        assert!(!tmp.path().join("list.csv").exists());
        Ok(())
    }

    #[test]
    fn test_playlist_delegation() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("list.csv");

        let mut ctrl = controller();
        ctrl.attach_playlist(Box::new(FilePlaylist::new(PlaylistFormat::Csv)));
        ctrl.add_song_to_repository("A", "1", 3, 0, "src")?;
        ctrl.add_song_to_repository("B", "2", 3, 0, "src")?;
        ctrl.add_song_to_repository("A", "3", 3, 0, "src")?;

        assert_eq!(ctrl.add_all_songs_by_artist_to_playlist("A"), 2);
        ctrl.add_song_to_playlist(song("B", "2", 3, 0));

        assert_eq!(
            ctrl.playlist_songs(),
            Some(vec![
                song("A", "1", 3, 0),
                song("A", "3", 3, 0),
                song("B", "2", 3, 0)
            ])
        );
        assert_eq!(ctrl.start_playlist(), Some(song("A", "1", 3, 0)));
        assert_eq!(ctrl.next_song_playlist(), Some(song("A", "3", 3, 0)));

        assert!(ctrl.save_playlist(&path)?);
        assert_eq!(std::fs::read_to_string(&path)?.lines().count(), 3);
        assert!(ctrl.open_playlist().is_some_and(|s| s.contains("> 2. A - 3")));

        // playlist edits are not repository mutations
        assert_eq!(ctrl.history_len(), 3);
        Ok(())
    }
}
