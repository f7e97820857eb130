//! Undo records for repository mutations and the history that owns them.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use thiserror::Error;

use crate::{
    domain::song::Song,
    storage::{error::StorageError, repository::Repository},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UndoError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("repository no longer exists")]
    RepositoryDropped,
}

/// One reversible repository mutation.
///
/// Holds a non-owning handle to the repository it reverts and its own copy
/// of the affected song.
#[derive(Debug, Clone)]
pub enum UndoAction {
    /// Recorded after `song` was added; reverting removes it.
    AddUndo {
        repository: Weak<RefCell<Repository>>,
        song: Song,
    },
    /// Recorded after `song` was removed from `position`; reverting puts it back.
    RemoveUndo {
        repository: Weak<RefCell<Repository>>,
        song: Song,
        position: usize,
    },
}

impl UndoAction {
    pub fn add(repository: &Rc<RefCell<Repository>>, song: Song) -> Self {
        Self::AddUndo {
            repository: Rc::downgrade(repository),
            song,
        }
    }

    pub fn remove(repository: &Rc<RefCell<Repository>>, song: Song, position: usize) -> Self {
        Self::RemoveUndo {
            repository: Rc::downgrade(repository),
            song,
            position,
        }
    }

    pub fn song(&self) -> &Song {
        match self {
            UndoAction::AddUndo { song, .. } | UndoAction::RemoveUndo { song, .. } => song,
        }
    }

    pub fn description(&self) -> String {
        match self {
            UndoAction::AddUndo { song, .. } => {
                format!("add '{} - {}'", song.artist, song.title)
            }
            UndoAction::RemoveUndo { song, .. } => {
                format!("remove '{} - {}'", song.artist, song.title)
            }
        }
    }

    /// Reverts the recorded mutation. Consumes the record: each runs at most once.
    pub fn execute_undo(self) -> Result<(), UndoError> {
        match self {
            UndoAction::AddUndo { repository, song } => {
                let repository = repository.upgrade().ok_or(UndoError::RepositoryDropped)?;
                repository.borrow_mut().remove_song(&song)?;
            }
            UndoAction::RemoveUndo {
                repository,
                song,
                position,
            } => {
                let repository = repository.upgrade().ok_or(UndoError::RepositoryDropped)?;
                repository.borrow_mut().insert_song_at(position, song)?;
            }
        }
        Ok(())
    }
}

/// LIFO history of undo records
#[derive(Debug, Default)]
pub struct UndoHistory {
    actions: Vec<UndoAction>,
}

impl UndoHistory {
    pub fn push(&mut self, action: UndoAction) {
        log::debug!("recorded undo for {}", action.description());
        self.actions.push(action);
    }

    pub fn pop(&mut self) -> Option<UndoAction> {
        self.actions.pop()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
