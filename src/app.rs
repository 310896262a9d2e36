#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::io;

use ftui::prelude::*;
use ftui::render::cell::PackedRgba;
use ftui::widgets::table::TableState;
use ftui::{KeyEventKind, Program, ProgramConfig};
use tracing::{debug, info};

use crate::config::Config;
use crate::controller::{Control, Controller};
use crate::directory::DirectoryModel;
use crate::fs_ops::LocalFs;
use crate::input::Key;
use crate::ui;

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub screen_bg: PackedRgba,
    pub normal_fg: PackedRgba,
    pub path_fg: PackedRgba,
    pub border_fg: PackedRgba,
    pub header_bg: PackedRgba,
    pub header_fg: PackedRgba,
    pub menu_bg: PackedRgba,
    pub menu_fg: PackedRgba,
    pub menu_selected_bg: PackedRgba,
    pub menu_selected_fg: PackedRgba,
    pub menu_divider_fg: PackedRgba,
    pub dir_fg: PackedRgba,
    pub selected_bg: PackedRgba,
    pub selected_fg: PackedRgba,
    pub dialog_bg: PackedRgba,
    pub dialog_fg: PackedRgba,
    pub error_bg: PackedRgba,
    pub error_fg: PackedRgba,
}

impl ThemeColors {
    pub fn classic() -> Self {
        let dark_blue = PackedRgba::rgb(0, 0, 128);
        let light_cyan = PackedRgba::rgb(85, 255, 255);
        let light_gray = PackedRgba::rgb(192, 192, 192);
        let white = PackedRgba::rgb(255, 255, 255);
        let black = PackedRgba::rgb(0, 0, 0);
        Self {
            screen_bg: black,
            normal_fg: light_gray,
            path_fg: light_cyan,
            border_fg: light_gray,
            header_bg: dark_blue,
            header_fg: white,
            menu_bg: light_cyan,
            menu_fg: black,
            menu_selected_bg: dark_blue,
            menu_selected_fg: white,
            menu_divider_fg: light_gray,
            dir_fg: PackedRgba::rgb(255, 85, 255),
            selected_bg: light_gray,
            selected_fg: black,
            dialog_bg: dark_blue,
            dialog_fg: white,
            error_bg: PackedRgba::rgb(128, 0, 0),
            error_fg: white,
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    Event(Event),
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

pub struct App {
    controller: Controller<LocalFs>,
    theme: ThemeColors,
    table_state: RefCell<TableState>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let directory = DirectoryModel::new(LocalFs, &config.start_dir, &config.boundary);
        Self {
            controller: Controller::new(directory),
            theme: ThemeColors::classic(),
            table_state: RefCell::new(TableState::default()),
        }
    }

    pub fn run(config: &Config) -> io::Result<()> {
        info!(
            start = %config.start_dir.display(),
            boundary = %config.boundary.display(),
            "starting browser"
        );
        let mut program = Program::with_config(App::new(config), ProgramConfig::fullscreen())?;
        program.run()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if key.kind != KeyEventKind::Press {
            return Cmd::none();
        }
        let key = Key::from_event(&key);
        debug!(?key, "key");
        match self.controller.handle_key(key) {
            Control::Exit => Cmd::quit(),
            Control::Continue => Cmd::none(),
        }
    }
}

impl Model for App {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(Event::Key(key)) => self.handle_key(key),
            Msg::Event(_) => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let view = ui::compose(&self.controller);
        ui::render(frame, &view, self.theme, &self.table_state);
    }
}
