use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::controller::Controller;
use crate::domain::validator::SongValidator;
use crate::playlist::FilePlaylist;
use crate::storage::repository::Repository;

pub mod script;

#[derive(Parser)]
#[command(name = "songdeck")]
#[command(version = "0.1")]
#[command(about = "Song repository with undoable edits and file playlists")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List songs the repository starts with
    List,
    /// Replay a command script against the repository
    Replay {
        /// Script file, reads stdin when omitted
        script: Option<PathBuf>,
    },
}

/// builds a controller from config: seeded repository, undo policy, playlist
pub fn build_controller(cfg: Config) -> anyhow::Result<Controller> {
    let validator = SongValidator;
    for song in &cfg.repository.songs {
        validator
            .validate(song)
            .with_context(|| format!("Invalid song in config: {}", song))?;
    }

    let repo = Repository::with_songs(
        cfg.repository.duplicate_policy(),
        cfg.repository.songs,
    )
    .with_context(|| "Failed to seed repository from config")?;

    let mut ctrl =
        Controller::new(repo, validator).with_undo_failure_policy(cfg.undo.on_failure);

    let playlist = match cfg.playlist.path {
        Some(path) => FilePlaylist::with_filename(cfg.playlist.format, path),
        None => FilePlaylist::new(cfg.playlist.format),
    };
    ctrl.attach_playlist(Box::new(playlist));

    Ok(ctrl)
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cfg.version != config::CONFIG_VERSION {
        log::warn!(
            "config version {} differs from supported version {}",
            cfg.version,
            config::CONFIG_VERSION
        );
    }

    let mut ctrl = build_controller(cfg)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::List => {
            script::execute(&mut ctrl, &script::ScriptCommand::List, &mut out)?;
        }

        Commands::Replay { script: path } => {
            let text = match path {
                Some(path) => std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read script {}", path.to_string_lossy())
                })?,
                None => {
                    let mut text = String::new();
                    std::io::stdin()
                        .read_to_string(&mut text)
                        .with_context(|| "Failed to read script from stdin")?;
                    text
                }
            };

            let commands = script::parse_script(&text)?;
            log::info!("replaying {} command(s)", commands.len());
            for command in &commands {
                script::execute(&mut ctrl, command, &mut out)?;
            }
            out.flush()?;
        }
    }

    Ok(())
}
