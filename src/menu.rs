#![forbid(unsafe_code)]

use crate::model::MenuItem;

pub const MENU_TITLES: [&str; 2] = ["File", "Edit"];

pub fn menu_items(menu_idx: usize) -> Vec<MenuItem> {
    match menu_idx {
        0 => vec![
            MenuItem::action("Open", "open"),
            MenuItem::action("Save", "save"),
            MenuItem::Separator,
            MenuItem::action("Go Up (Backspace)", "go_up"),
            MenuItem::action("Close", "close_menu"),
            MenuItem::action("Exit (Ctrl+Q)", "exit"),
        ],
        _ => vec![MenuItem::action("Copy", "copy"), MenuItem::action("Paste", "paste")],
    }
}
