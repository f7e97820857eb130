use crate::cli::run;

pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod playlist;
pub mod storage;
pub mod undo;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run()
}
