#![forbid(unsafe_code)]

use tracing::{debug, info, warn};

use crate::directory::DirectoryModel;
use crate::error::NavError;
use crate::fs_ops::{FileSystem, LocalFs};
use crate::input::{Command, Key, Route, route};
use crate::model::Navigation;
use crate::overlay::{Action, OverlayResponse, OverlayStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Session state: the browsed directory and the overlay above it.
#[derive(Debug)]
pub struct Controller<F = LocalFs> {
    directory: DirectoryModel<F>,
    overlays: OverlayStack,
    status: String,
    listing_error: Option<String>,
}

impl<F: FileSystem> Controller<F> {
    /// Lists the starting directory. A failed listing is shown as an error
    /// dialog over an empty view.
    pub fn new(directory: DirectoryModel<F>) -> Self {
        let mut controller = Self {
            directory,
            overlays: OverlayStack::new(),
            status: String::from("Ready"),
            listing_error: None,
        };
        if let Err(err) = controller.directory.reload() {
            controller.report(err);
        }
        controller
    }

    pub fn directory(&self) -> &DirectoryModel<F> {
        &self.directory
    }

    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Set while the current directory could not be listed.
    pub fn listing_error(&self) -> Option<&str> {
        self.listing_error.as_deref()
    }

    pub fn handle_key(&mut self, key: Key) -> Control {
        match route(self.overlays.is_active(), key) {
            Route::CloseOverlay => {
                self.overlays.close();
                Control::Continue
            }
            Route::Overlay(key) => match self.overlays.handle_key(key) {
                OverlayResponse::Action(tag) => self.dispatch(&tag),
                OverlayResponse::Consumed | OverlayResponse::Ignored => Control::Continue,
            },
            Route::Navigate(command) => {
                self.run(command);
                Control::Continue
            }
            Route::Ignore => Control::Continue,
        }
    }

    pub fn dispatch(&mut self, tag: &str) -> Control {
        debug!(tag, "dispatching action");
        match self.overlays.dispatch_action(tag) {
            Action::Quit => {
                info!("exit confirmed");
                return Control::Exit;
            }
            Action::GoUp => {
                let result = self.directory.go_up();
                self.settle(result);
            }
            Action::Inert(label) => self.status = format!("{label}: not implemented"),
            Action::Exit | Action::CloseMenu | Action::Unknown(_) => {}
        }
        Control::Continue
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::Move(delta) => self.directory.move_selection(delta),
            Command::First => self.directory.select_first(),
            Command::Last => self.directory.select_last(),
            Command::Activate => {
                let result = self.directory.activate_selection();
                self.settle(result);
            }
            Command::GoUp => {
                let result = self.directory.go_up();
                self.settle(result);
            }
            Command::OpenMenu => self.overlays.open_bar_menu(0),
            Command::RequestExit => self.overlays.open_exit_confirmation(),
        }
    }

    fn settle(&mut self, result: Result<Navigation, NavError>) {
        match result {
            Ok(Navigation::Moved) => {
                self.status = String::from("Ready");
                self.listing_error = None;
                debug!(dir = %self.directory.current_dir().display(), "changed directory");
            }
            Ok(Navigation::Stayed) => {}
            Ok(Navigation::AtBoundary) => {
                self.overlays.open_info("Info", "Already at root directory");
            }
            Ok(Navigation::FileSelected(name)) => {
                let message = format!("Selected file: {name}\n(File opening not implemented)");
                self.overlays.open_info("Info", &message);
            }
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: NavError) {
        warn!(%err, "navigation failed");
        if matches!(err, NavError::Listing(_)) {
            self.listing_error = Some(err.to_string());
        }
        self.status = err.to_string();
        self.overlays.open_error("Error", &err.to_string());
    }
}
