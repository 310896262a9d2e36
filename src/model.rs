#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Synthetic `..` row pointing at the parent directory.
    Parent,
    Dir,
    File,
}

/// One row of a directory listing, captured when the directory was read.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub modified: Option<SystemTime>,
    pub summary: String,
}

impl Entry {
    pub fn parent(path: PathBuf) -> Self {
        Self {
            name: String::from(".."),
            path,
            kind: EntryKind::Parent,
            modified: None,
            summary: String::from("(parent)"),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Parent | EntryKind::Dir)
    }

    pub fn is_parent(&self) -> bool {
        self.kind == EntryKind::Parent
    }

    pub fn display_name(&self) -> String {
        if self.is_dir() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action { label: String, tag: String },
    Separator,
}

impl MenuItem {
    pub fn action(label: &str, tag: &str) -> Self {
        MenuItem::Action { label: label.to_string(), tag: tag.to_string() }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }
}

/// What a directory operation did, for the controller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved,
    Stayed,
    AtBoundary,
    FileSelected(String),
}
