#![forbid(unsafe_code)]

//! Keyboard routing: every keystroke is either consumed by the active
//! overlay or turned into a directory navigation command.

use ftui::prelude::*;

/// Logical keys. Anything the browser does not bind becomes `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Backspace,
    Escape,
    Menu,
    Quit,
    Char(char),
    Other,
}

impl Key {
    pub fn from_event(key: &KeyEvent) -> Self {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        let alt = key.modifiers.contains(Modifiers::ALT);
        match key.code {
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Tab | KeyCode::BackTab => Key::Tab,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Escape => Key::Escape,
            KeyCode::F(9) | KeyCode::F(10) => Key::Menu,
            KeyCode::Char('q') | KeyCode::Char('Q') if !alt => Key::Quit,
            KeyCode::Char(_) if ctrl || alt => Key::Other,
            KeyCode::Char(ch) => Key::Char(ch),
            _ => Key::Other,
        }
    }
}

/// Navigation commands issued while no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(isize),
    First,
    Last,
    Activate,
    GoUp,
    OpenMenu,
    RequestExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CloseOverlay,
    Overlay(Key),
    Navigate(Command),
    Ignore,
}

/// Rows skipped by PageUp/PageDown.
pub const PAGE: isize = 10;

/// The full transition table. Every key maps to a route in both states.
pub fn route(overlay_active: bool, key: Key) -> Route {
    if overlay_active {
        return match key {
            Key::Escape => Route::CloseOverlay,
            Key::Menu => Route::Ignore,
            other => Route::Overlay(other),
        };
    }
    match key {
        Key::Up => Route::Navigate(Command::Move(-1)),
        Key::Down => Route::Navigate(Command::Move(1)),
        Key::PageUp => Route::Navigate(Command::Move(-PAGE)),
        Key::PageDown => Route::Navigate(Command::Move(PAGE)),
        Key::Home => Route::Navigate(Command::First),
        Key::End => Route::Navigate(Command::Last),
        Key::Enter => Route::Navigate(Command::Activate),
        Key::Backspace => Route::Navigate(Command::GoUp),
        Key::Menu => Route::Navigate(Command::OpenMenu),
        Key::Quit => Route::Navigate(Command::RequestExit),
        Key::Left | Key::Right | Key::Tab | Key::Escape | Key::Char(_) | Key::Other => Route::Ignore,
    }
}
