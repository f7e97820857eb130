//! Line based command scripts replayed against a controller
//!
//! One command per line, arguments separated by `|`:
//!
//! ```text
//! # comment
//! add Queen | Bohemian Rhapsody | 5 | 55 | www.youtube.com
//! remove Queen | Bohemian Rhapsody
//! undo
//! ```

use std::{io::Write, path::PathBuf};

use anyhow::{Context, anyhow, bail};

use crate::controller::{Controller, ControllerError, UndoOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Add {
        artist: String,
        title: String,
        minutes: i64,
        seconds: i64,
        source: String,
    },
    Remove {
        artist: String,
        title: String,
    },
    Undo,
    List,
    PlaylistAdd {
        artist: String,
        title: String,
    },
    PlaylistArtist {
        artist: String,
    },
    Play,
    Next,
    Save {
        path: PathBuf,
    },
    Show,
}

fn args(rest: &str, expected: usize, usage: &str) -> anyhow::Result<Vec<String>> {
    let parts = if rest.trim().is_empty() {
        Vec::new()
    } else {
        rest.split('|').map(|s| s.trim().to_string()).collect::<Vec<_>>()
    };
    if parts.len() != expected {
        bail!("expected {expected} argument(s), usage: {usage}");
    }
    Ok(parts)
}

fn number(value: &str, what: &str) -> anyhow::Result<i64> {
    value
        .parse()
        .with_context(|| format!("{what} must be a whole number, got '{value}'"))
}

/// Parses one script line. Blank lines and `#` comments give `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ScriptCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));

    let command = match word {
        "add" => {
            let mut a = args(rest, 5, "add ARTIST | TITLE | MINUTES | SECONDS | SOURCE")?;
            let source = a.remove(4);
            let seconds = number(&a[3], "seconds")?;
            let minutes = number(&a[2], "minutes")?;
            ScriptCommand::Add {
                title: a.remove(1),
                artist: a.remove(0),
                minutes,
                seconds,
                source,
            }
        }
        "remove" => {
            let mut a = args(rest, 2, "remove ARTIST | TITLE")?;
            ScriptCommand::Remove {
                title: a.remove(1),
                artist: a.remove(0),
            }
        }
        "playlist-add" => {
            let mut a = args(rest, 2, "playlist-add ARTIST | TITLE")?;
            ScriptCommand::PlaylistAdd {
                title: a.remove(1),
                artist: a.remove(0),
            }
        }
        "playlist-artist" => {
            let mut a = args(rest, 1, "playlist-artist ARTIST")?;
            ScriptCommand::PlaylistArtist {
                artist: a.remove(0),
            }
        }
        "save" => {
            let mut a = args(rest, 1, "save FILE")?;
            ScriptCommand::Save {
                path: a.remove(0).into(),
            }
        }
        "undo" | "list" | "play" | "next" | "show" => {
            args(rest, 0, word)?;
            match word {
                "undo" => ScriptCommand::Undo,
                "list" => ScriptCommand::List,
                "play" => ScriptCommand::Play,
                "next" => ScriptCommand::Next,
                _ => ScriptCommand::Show,
            }
        }
        other => return Err(anyhow!("unknown command '{other}'")),
    };

    Ok(Some(command))
}

/// Parses a whole script, reporting the first bad line by number.
pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptCommand>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            parse_line(line)
                .with_context(|| format!("line {}: '{}'", i + 1, line.trim()))
                .transpose()
        })
        .collect()
}

/// Runs one command and writes what happened to `out`.
///
/// Failed mutations are reported and replay continues; only output errors
/// and playlist write failures stop it.
pub fn execute(
    ctrl: &mut Controller,
    command: &ScriptCommand,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        ScriptCommand::Add {
            artist,
            title,
            minutes,
            seconds,
            source,
        } => match ctrl.add_song_to_repository(artist, title, *minutes, *seconds, source) {
            Ok(()) => writeln!(out, "added '{artist} - {title}'")?,
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ScriptCommand::Remove { artist, title } => {
            match ctrl.remove_song_from_repository(artist, title) {
                Ok(()) => writeln!(out, "removed '{artist} - {title}'")?,
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }
        ScriptCommand::Undo => match ctrl.undo() {
            Ok(UndoOutcome::Reverted { description }) => {
                writeln!(out, "undid {description}")?
            }
            Ok(UndoOutcome::Failed {
                description, error, ..
            }) => writeln!(out, "could not undo {description}: {error}")?,
            Err(ControllerError::EmptyHistory) => writeln!(out, "nothing to undo")?,
            Err(e) => return Err(e.into()),
        },
        ScriptCommand::List => {
            let songs = ctrl.songs();
            writeln!(out, "{} song(s):", songs.len())?;
            for song in songs {
                writeln!(out, "    - {song}")?;
            }
        }
        ScriptCommand::PlaylistAdd { artist, title } => {
            let found = ctrl
                .repository()
                .borrow()
                .find_by_artist_and_title(artist, title);
            match found {
                Ok(song) => {
                    ctrl.add_song_to_playlist(song);
                    writeln!(out, "queued '{artist} - {title}'")?;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }
        ScriptCommand::PlaylistArtist { artist } => {
            let count = ctrl.add_all_songs_by_artist_to_playlist(artist);
            writeln!(out, "queued {count} song(s) by {artist}")?;
        }
        ScriptCommand::Play => match ctrl.start_playlist() {
            Some(song) => writeln!(out, "playing {song}")?,
            None => writeln!(out, "nothing to play")?,
        },
        ScriptCommand::Next => match ctrl.next_song_playlist() {
            Some(song) => writeln!(out, "playing {song}")?,
            None => writeln!(out, "nothing to play")?,
        },
        ScriptCommand::Save { path } => {
            let saved = ctrl
                .save_playlist(path)
                .with_context(|| format!("failed to save playlist {}", path.to_string_lossy()))?;
            if saved {
                writeln!(out, "saved playlist to {}", path.to_string_lossy())?;
            } else {
                writeln!(out, "no playlist attached")?;
            }
        }
        ScriptCommand::Show => match ctrl.open_playlist() {
            Some(listing) => write!(out, "{listing}")?,
            None => writeln!(out, "no playlist attached")?,
        },
    }
    Ok(())
}
