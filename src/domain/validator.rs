use thiserror::Error;

use super::song::Song;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid song: {}", problems.join("; "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

/// Checks that song data is well formed before it reaches the repository.
///
/// All problems are reported at once rather than stopping at the first one.
#[derive(Debug, Default, Clone)]
pub struct SongValidator;

impl SongValidator {
    pub fn validate(&self, song: &Song) -> Result<(), ValidationError> {
        let mut problems = Vec::new();

        if song.artist.trim().is_empty() {
            problems.push("artist must not be empty".to_string());
        }
        if song.title.trim().is_empty() {
            problems.push("title must not be empty".to_string());
        }
        if song.source.trim().is_empty() {
            problems.push("source must not be empty".to_string());
        }

        let duration = song.duration;
        if duration.minutes < 0 {
            problems.push(format!("minutes must not be negative, got {}", duration.minutes));
        }
        if !(0..60).contains(&duration.seconds) {
            problems.push(format!(
                "seconds must be between 0 and 59, got {}",
                duration.seconds
            ));
        }
        if duration.minutes == 0 && duration.seconds == 0 {
            problems.push("duration must not be zero".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { problems })
        }
    }
}
