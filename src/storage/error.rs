use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("song '{artist} - {title}' not found")]
    NotFound { artist: String, title: String },

    #[error("song '{artist} - {title}' already exists")]
    Duplicate { artist: String, title: String },
}

impl StorageError {
    pub(crate) fn not_found(artist: &str, title: &str) -> Self {
        Self::NotFound {
            artist: artist.to_string(),
            title: title.to_string(),
        }
    }

    pub(crate) fn duplicate(artist: &str, title: &str) -> Self {
        Self::Duplicate {
            artist: artist.to_string(),
            title: title.to_string(),
        }
    }
}
