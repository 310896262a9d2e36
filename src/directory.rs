#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::NavError;
use crate::fs_ops::{FileSystem, LocalFs, StatKind, normalize, read_entries};
use crate::metadata::{Details, describe};
use crate::model::{Entry, EntryKind, Navigation};

/// The browsed directory, its listing and the selection cursor.
///
/// `selected` is `None` exactly when `entries` is empty.
#[derive(Debug)]
pub struct DirectoryModel<F = LocalFs> {
    fs: F,
    boundary: PathBuf,
    current_dir: PathBuf,
    entries: Vec<Entry>,
    selected: Option<usize>,
}

impl<F: FileSystem> DirectoryModel<F> {
    /// Creates an unlisted model; call [`reload`](Self::reload) to populate it.
    pub fn new(fs: F, start: &Path, boundary: &Path) -> Self {
        let root = PathBuf::from("/");
        Self {
            fs,
            boundary: normalize(&root, boundary),
            current_dir: normalize(&root, start),
            entries: Vec::new(),
            selected: None,
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected?)
    }

    pub fn at_boundary(&self) -> bool {
        self.current_dir == self.boundary || self.current_dir.parent().is_none()
    }

    /// Re-lists the current directory and resets the selection.
    pub fn reload(&mut self) -> Result<(), NavError> {
        match read_entries(&self.fs, &self.current_dir) {
            Ok(children) => {
                let mut entries = Vec::with_capacity(children.len() + 1);
                if !self.at_boundary() {
                    if let Some(parent) = self.current_dir.parent() {
                        entries.push(Entry::parent(parent.to_path_buf()));
                    }
                }
                entries.extend(children);
                self.entries = entries;
                self.selected = first_navigable(&self.entries);
                debug!(dir = %self.current_dir.display(), entries = self.entries.len(), "listed");
                Ok(())
            }
            Err(err) => {
                warn!(dir = %self.current_dir.display(), %err, "listing failed");
                self.entries.clear();
                self.selected = None;
                Err(NavError::Listing(err))
            }
        }
    }

    /// Enters `path` if it is an existing directory. When it is not, the
    /// model is left exactly as it was.
    pub fn change_directory(&mut self, path: &Path) -> Result<(), NavError> {
        let target = normalize(&self.current_dir, path);
        match self.fs.stat(&target) {
            Ok(stat) if stat.kind == StatKind::Dir => {}
            Ok(_) => return Err(NavError::NotADirectory(target)),
            Err(err) => return Err(NavError::Unreachable(err)),
        }
        self.current_dir = target;
        self.reload()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let last = self.entries.len().saturating_sub(1);
        self.selected = Some(current.saturating_add_signed(delta).min(last));
    }

    pub fn select_first(&mut self) {
        if !self.entries.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.entries.is_empty() {
            self.selected = Some(self.entries.len() - 1);
        }
    }

    pub fn activate_selection(&mut self) -> Result<Navigation, NavError> {
        let Some(entry) = self.selected_entry() else {
            return Ok(Navigation::Stayed);
        };
        let kind = entry.kind;
        let path = entry.path.clone();
        let name = entry.name.clone();
        match kind {
            EntryKind::Parent => self.go_up(),
            EntryKind::Dir => {
                self.change_directory(&path)?;
                Ok(Navigation::Moved)
            }
            EntryKind::File => Ok(Navigation::FileSelected(name)),
        }
    }

    pub fn go_up(&mut self) -> Result<Navigation, NavError> {
        if self.at_boundary() {
            return Ok(Navigation::AtBoundary);
        }
        let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) else {
            return Ok(Navigation::AtBoundary);
        };
        self.change_directory(&parent)?;
        Ok(Navigation::Moved)
    }

    pub fn selected_details(&self) -> Details {
        match self.selected_entry() {
            None => Details::Empty,
            Some(entry) if entry.is_parent() => Details::Parent { path: entry.path.clone() },
            Some(entry) => describe(&self.fs, &entry.path),
        }
    }
}

fn first_navigable(entries: &[Entry]) -> Option<usize> {
    match entries.first() {
        None => None,
        Some(first) if first.is_parent() && entries.len() > 1 => Some(1),
        Some(_) => Some(0),
    }
}
