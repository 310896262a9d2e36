#![forbid(unsafe_code)]

mod app;
mod config;
mod controller;
mod directory;
mod error;
mod fs_ops;
mod input;
mod logging;
mod menu;
mod metadata;
mod model;
mod overlay;
mod ui;

use std::io;

use tracing::info;

use crate::app::App;
use crate::config::Config;

fn main() -> io::Result<()> {
    let config = Config::resolve()?;
    let _guard = logging::init(&config)?;
    App::run(&config)?;
    info!("exited");
    Ok(())
}
