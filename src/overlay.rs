#![forbid(unsafe_code)]

//! The single transient surface drawn over the directory view.
//!
//! Only one overlay exists at a time: opening a menu or dialog replaces
//! whatever was open. Buttons and menu items carry action tags which are
//! resolved through [`ACTIONS`] by [`OverlayStack::dispatch_action`].

use tracing::{debug, warn};

use crate::input::Key;
use crate::menu::{MENU_TITLES, menu_items};
use crate::model::MenuItem;

pub const CLOSE_TAG: &str = "close_menu";
pub const EXIT_TAG: &str = "exit";
pub const QUIT_TAG: &str = "quit";

/// What the controller has to do after a tag was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ask for confirmation before leaving.
    Exit,
    /// Leave now. Only produced from the exit confirmation dialog.
    Quit,
    CloseMenu,
    GoUp,
    /// Menu entries that exist but do nothing yet.
    Inert(&'static str),
    Unknown(String),
}

pub const ACTIONS: &[(&str, Action)] = &[
    (EXIT_TAG, Action::Exit),
    (QUIT_TAG, Action::Quit),
    (CLOSE_TAG, Action::CloseMenu),
    ("go_up", Action::GoUp),
    ("open", Action::Inert("Open")),
    ("save", Action::Inert("Save")),
    ("copy", Action::Inert("Copy")),
    ("paste", Action::Inert("Paste")),
];

pub fn lookup_action(tag: &str) -> Action {
    ACTIONS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, action)| action.clone())
        .unwrap_or_else(|| Action::Unknown(tag.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Yes,
    No,
    Ok,
}

impl Button {
    pub fn label(self) -> &'static str {
        match self {
            Button::Yes => "Yes",
            Button::No => "No",
            Button::Ok => "OK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub on_confirm: String,
    pub on_cancel: String,
    pub focus: Button,
}

impl Dialog {
    pub fn buttons(&self) -> &'static [Button] {
        match self.kind {
            DialogKind::Confirm => &[Button::Yes, Button::No],
            DialogKind::Info | DialogKind::Error => &[Button::Ok],
        }
    }

    fn focused_tag(&self) -> &str {
        match self.focus {
            Button::No => &self.on_cancel,
            Button::Yes | Button::Ok => &self.on_confirm,
        }
    }

    fn handle_key(&mut self, key: Key) -> OverlayResponse {
        match key {
            Key::Left | Key::Right | Key::Tab if self.kind == DialogKind::Confirm => {
                self.focus = match self.focus {
                    Button::Yes => Button::No,
                    _ => Button::Yes,
                };
                OverlayResponse::Consumed
            }
            Key::Enter => OverlayResponse::Action(self.focused_tag().to_string()),
            Key::Char('y' | 'Y') => OverlayResponse::Action(self.on_confirm.clone()),
            Key::Char('n' | 'N') => OverlayResponse::Action(self.on_cancel.clone()),
            _ => OverlayResponse::Ignored,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPanel {
    pub title: String,
    pub items: Vec<MenuItem>,
    /// Always on an actionable item; `None` when the menu has none.
    pub cursor: Option<usize>,
    /// Position in the menu bar, when the panel was opened from it.
    pub bar_index: Option<usize>,
}

impl MenuPanel {
    fn new(title: &str, items: Vec<MenuItem>) -> Self {
        let cursor = items.iter().position(|item| !item.is_separator());
        Self { title: title.to_string(), items, cursor, bar_index: None }
    }

    fn step(&mut self, forward: bool) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let next = if forward {
            (cursor + 1..self.items.len()).find(|&idx| !self.items[idx].is_separator())
        } else {
            (0..cursor).rev().find(|&idx| !self.items[idx].is_separator())
        };
        if let Some(next) = next {
            self.cursor = Some(next);
        }
    }

    fn selected_tag(&self) -> Option<&str> {
        match self.items.get(self.cursor?)? {
            MenuItem::Action { tag, .. } => Some(tag),
            MenuItem::Separator => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Menu(MenuPanel),
    Dialog(Dialog),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayResponse {
    Ignored,
    Consumed,
    Action(String),
}

#[derive(Debug, Default)]
pub struct OverlayStack {
    active: Option<Overlay>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Overlay> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn replace(&mut self, overlay: Overlay) {
        if let Some(previous) = self.active.take() {
            debug!(?previous, "replacing overlay");
        }
        self.active = Some(overlay);
    }

    pub fn open_menu(&mut self, title: &str, items: Vec<MenuItem>) {
        self.replace(Overlay::Menu(MenuPanel::new(title, items)));
    }

    pub fn open_bar_menu(&mut self, menu_idx: usize) {
        let menu_idx = menu_idx.min(MENU_TITLES.len() - 1);
        self.open_menu(MENU_TITLES[menu_idx], menu_items(menu_idx));
        if let Some(Overlay::Menu(panel)) = self.active.as_mut() {
            panel.bar_index = Some(menu_idx);
        }
    }

    /// `on_cancel` defaults to just closing the dialog.
    pub fn open_dialog(
        &mut self,
        kind: DialogKind,
        title: &str,
        message: &str,
        on_confirm: &str,
        on_cancel: Option<&str>,
    ) {
        let dialog = Dialog {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            on_confirm: on_confirm.to_string(),
            on_cancel: on_cancel.unwrap_or(CLOSE_TAG).to_string(),
            focus: match kind {
                DialogKind::Confirm => Button::Yes,
                DialogKind::Info | DialogKind::Error => Button::Ok,
            },
        };
        self.replace(Overlay::Dialog(dialog));
    }

    pub fn open_exit_confirmation(&mut self) {
        self.open_dialog(
            DialogKind::Confirm,
            "Exit Confirmation",
            "Are you sure you want to exit?",
            QUIT_TAG,
            Some(CLOSE_TAG),
        );
    }

    pub fn open_info(&mut self, title: &str, message: &str) {
        self.open_dialog(DialogKind::Info, title, message, CLOSE_TAG, None);
    }

    pub fn open_error(&mut self, title: &str, message: &str) {
        self.open_dialog(DialogKind::Error, title, message, CLOSE_TAG, None);
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    fn confirming_exit(&self) -> bool {
        matches!(
            &self.active,
            Some(Overlay::Dialog(dialog))
                if dialog.kind == DialogKind::Confirm && dialog.on_confirm == QUIT_TAG
        )
    }

    pub fn handle_key(&mut self, key: Key) -> OverlayResponse {
        let Some(active) = self.active.as_mut() else {
            return OverlayResponse::Ignored;
        };
        match active {
            Overlay::Dialog(dialog) => dialog.handle_key(key),
            Overlay::Menu(menu) => match key {
                Key::Up => {
                    menu.step(false);
                    OverlayResponse::Consumed
                }
                Key::Down => {
                    menu.step(true);
                    OverlayResponse::Consumed
                }
                Key::Left | Key::Right => {
                    let Some(bar_index) = menu.bar_index else {
                        return OverlayResponse::Ignored;
                    };
                    let next = if key == Key::Left {
                        bar_index.checked_sub(1)
                    } else {
                        Some(bar_index + 1).filter(|idx| *idx < MENU_TITLES.len())
                    };
                    if let Some(next) = next {
                        self.open_bar_menu(next);
                    }
                    OverlayResponse::Consumed
                }
                Key::Enter => match menu.selected_tag() {
                    Some(tag) => OverlayResponse::Action(tag.to_string()),
                    None => OverlayResponse::Consumed,
                },
                _ => OverlayResponse::Ignored,
            },
        }
    }

    /// Resolves `tag`, updates the overlay accordingly and hands the action
    /// back for the side effects only the controller can perform.
    pub fn dispatch_action(&mut self, tag: &str) -> Action {
        let action = match lookup_action(tag) {
            Action::Quit if !self.confirming_exit() => {
                warn!(tag, "quit requested outside the exit confirmation");
                Action::Exit
            }
            action => action,
        };
        match &action {
            Action::Exit => self.open_exit_confirmation(),
            Action::Unknown(tag) => {
                warn!(%tag, "unknown action tag, dismissing overlay");
                self.close();
            }
            Action::Quit | Action::CloseMenu | Action::GoUp | Action::Inert(_) => self.close(),
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(stack: &OverlayStack) -> &MenuPanel {
        match stack.active() {
            Some(Overlay::Menu(menu)) => menu,
            other => panic!("expected a menu, got {other:?}"),
        }
    }

    fn dialog(stack: &OverlayStack) -> &Dialog {
        match stack.active() {
            Some(Overlay::Dialog(dialog)) => dialog,
            other => panic!("expected a dialog, got {other:?}"),
        }
    }

    #[test]
    fn close_is_idempotent() {
        let mut stack = OverlayStack::new();
        stack.close();
        assert!(!stack.is_active());
        stack.open_bar_menu(0);
        stack.close();
        stack.close();
        assert_eq!(stack.active(), None);
    }

    #[test]
    fn opening_replaces_the_active_overlay() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(0);
        stack.open_error("Error", "boom");
        assert_eq!(dialog(&stack).message, "boom");
        stack.open_menu("Tools", vec![MenuItem::action("Hello", "open")]);
        assert_eq!(menu(&stack).title, "Tools");
        stack.close();
        assert!(!stack.is_active());
    }

    #[test]
    fn menu_cursor_skips_separators_and_stops_at_ends() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(0);
        assert_eq!(menu(&stack).cursor, Some(0));
        stack.handle_key(Key::Up);
        assert_eq!(menu(&stack).cursor, Some(0));
        stack.handle_key(Key::Down);
        stack.handle_key(Key::Down);
        assert_eq!(menu(&stack).cursor, Some(3));
        for _ in 0..5 {
            stack.handle_key(Key::Down);
        }
        assert_eq!(menu(&stack).cursor, Some(5));
        assert_eq!(stack.handle_key(Key::Enter), OverlayResponse::Action(String::from("exit")));
    }

    #[test]
    fn left_and_right_walk_the_menu_bar() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(0);
        stack.handle_key(Key::Left);
        assert_eq!(menu(&stack).title, "File");
        stack.handle_key(Key::Right);
        assert_eq!(menu(&stack).title, "Edit");
        assert_eq!(menu(&stack).bar_index, Some(1));
        stack.handle_key(Key::Right);
        assert_eq!(menu(&stack).title, "Edit");
    }

    #[test]
    fn separator_only_menu_has_no_cursor() {
        let mut stack = OverlayStack::new();
        stack.open_menu("Empty", vec![MenuItem::Separator]);
        assert_eq!(menu(&stack).cursor, None);
        assert_eq!(stack.handle_key(Key::Enter), OverlayResponse::Consumed);
    }

    #[test]
    fn dialog_buttons_emit_their_tags() {
        let mut stack = OverlayStack::new();
        stack.open_exit_confirmation();
        assert_eq!(stack.handle_key(Key::Char('n')), OverlayResponse::Action(String::from(CLOSE_TAG)));
        stack.handle_key(Key::Right);
        assert_eq!(dialog(&stack).focus, Button::No);
        assert_eq!(stack.handle_key(Key::Enter), OverlayResponse::Action(String::from(CLOSE_TAG)));
        stack.handle_key(Key::Tab);
        assert_eq!(stack.handle_key(Key::Enter), OverlayResponse::Action(String::from(QUIT_TAG)));
        assert_eq!(stack.handle_key(Key::Quit), OverlayResponse::Ignored);
    }

    #[test]
    fn info_dialog_has_a_single_button() {
        let mut stack = OverlayStack::new();
        stack.open_info("Info", "Already at root directory");
        assert_eq!(dialog(&stack).buttons(), [Button::Ok]);
        assert_eq!(stack.handle_key(Key::Right), OverlayResponse::Ignored);
        assert_eq!(stack.handle_key(Key::Enter), OverlayResponse::Action(String::from(CLOSE_TAG)));
    }

    #[test]
    fn exit_action_opens_confirmation_instead_of_quitting() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(0);
        assert_eq!(stack.dispatch_action("exit"), Action::Exit);
        assert_eq!(dialog(&stack).title, "Exit Confirmation");
        assert_eq!(stack.dispatch_action("quit"), Action::Quit);
        assert!(!stack.is_active());
    }

    #[test]
    fn quit_outside_confirmation_is_downgraded() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(0);
        assert_eq!(stack.dispatch_action("quit"), Action::Exit);
        assert!(matches!(stack.active(), Some(Overlay::Dialog(_))));
    }

    #[test]
    fn unknown_and_inert_tags_dismiss_the_overlay() {
        let mut stack = OverlayStack::new();
        stack.open_bar_menu(1);
        assert_eq!(stack.dispatch_action("pasta"), Action::Unknown(String::from("pasta")));
        assert!(!stack.is_active());

        stack.open_bar_menu(1);
        assert_eq!(stack.dispatch_action("copy"), Action::Inert("Copy"));
        assert!(!stack.is_active());
    }

    #[test]
    fn every_menu_tag_is_in_the_dispatch_table() {
        for idx in 0..MENU_TITLES.len() {
            for item in menu_items(idx) {
                if let MenuItem::Action { tag, .. } = item {
                    assert!(!matches!(lookup_action(&tag), Action::Unknown(_)), "{tag}");
                }
            }
        }
    }
}
