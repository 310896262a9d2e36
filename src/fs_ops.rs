#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::error::FsError;
use crate::model::{Entry, EntryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Dir,
    File,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct Stat {
    pub kind: StatKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// The two OS calls the browser needs. Symlinks are followed, so a dangling
/// link reports `NotFound`. Names are returned as the OS gave them.
pub trait FileSystem {
    fn stat(&self, path: &Path) -> Result<Stat, FsError>;
    fn list_dir(&self, path: &Path) -> Result<Vec<OsString>, FsError>;
    /// Absolute path with every symlink resolved.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn stat(&self, path: &Path) -> Result<Stat, FsError> {
        let metadata = fs::metadata(path).map_err(|err| FsError::from_io(path, err))?;
        let kind = if metadata.is_dir() {
            StatKind::Dir
        } else if metadata.is_file() {
            StatKind::File
        } else {
            StatKind::Other
        };
        Ok(Stat { kind, size: metadata.len(), modified: metadata.modified().ok() })
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
        let mut names = Vec::new();
        for item in fs::read_dir(path).map_err(|err| FsError::from_io(path, err))? {
            match item {
                Ok(item) => names.push(item.file_name()),
                Err(err) => debug!(dir = %path.display(), %err, "skipping unreadable dir entry"),
            }
        }
        Ok(names)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError> {
        fs::canonicalize(path).map_err(|err| FsError::from_io(path, err))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildCounts {
    pub total: usize,
    pub dirs: usize,
    pub files: usize,
}

pub fn count_children<F: FileSystem>(fs: &F, dir: &Path) -> Result<ChildCounts, FsError> {
    let names = fs.list_dir(dir)?;
    let mut counts = ChildCounts { total: names.len(), ..ChildCounts::default() };
    for name in names {
        match fs.stat(&dir.join(&name)).map(|stat| stat.kind) {
            Ok(StatKind::Dir) => counts.dirs += 1,
            Ok(StatKind::File) => counts.files += 1,
            _ => {}
        }
    }
    Ok(counts)
}

/// Lists `dir` as directories followed by files, each group sorted by
/// lowercased name. Children whose stat fails are dropped individually.
pub fn read_entries<F: FileSystem>(fs: &F, dir: &Path) -> Result<Vec<Entry>, FsError> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for raw in fs.list_dir(dir)? {
        let path = dir.join(&raw);
        let name = raw.to_string_lossy().into_owned();
        let stat = match fs.stat(&path) {
            Ok(stat) => stat,
            Err(err) => {
                debug!(path = %err.path().display(), %err, "excluding entry from listing");
                continue;
            }
        };
        match stat.kind {
            StatKind::Dir => {
                let summary = match count_children(fs, &path) {
                    Ok(counts) => format!("({}D {}F)", counts.dirs, counts.files),
                    Err(_) => String::from("(dir)"),
                };
                dirs.push(Entry { name, path, kind: EntryKind::Dir, modified: stat.modified, summary });
            }
            StatKind::File => files.push(Entry {
                name,
                path,
                kind: EntryKind::File,
                modified: stat.modified,
                summary: format_size(stat.size),
            }),
            StatKind::Other => {}
        }
    }

    sort_by_name(&mut dirs);
    sort_by_name(&mut files);
    dirs.extend(files);
    Ok(dirs)
}

/// Stable, so equal lowercased names keep listing order.
pub fn sort_by_name(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| entry.name.to_lowercase());
}

/// Makes `path` absolute against `base` and resolves `.`/`..` lexically.
pub fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(Component::RootDir.as_os_str());
    }
    out
}

pub fn format_size(size: u64) -> String {
    if size == 0 {
        return String::from("0 B");
    }
    let mut value = size as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn local(time: SystemTime) -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::from(time).to_offset(offset)
}

/// `YYYY-MM-DD HH:MM`, the listing column format.
pub fn format_row_time(time: Option<SystemTime>) -> String {
    let Some(time) = time else {
        return String::new();
    };
    local(time)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS`, the details panel format.
pub fn format_detail_time(time: Option<SystemTime>) -> String {
    let Some(time) = time else {
        return String::from("N/A");
    };
    local(time)
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_default()
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime};

    use super::{FileSystem, Stat, StatKind};
    use crate::error::FsError;

    #[derive(Debug, Clone)]
    enum Node {
        Dir { children: Vec<OsString>, readable: bool },
        File { size: u64 },
        Dangling,
    }

    /// In-memory tree with deterministic listing order (insertion order).
    #[derive(Debug, Clone)]
    pub struct FakeFs {
        nodes: HashMap<PathBuf, Node>,
    }

    impl FakeFs {
        pub fn new() -> Self {
            let mut nodes = HashMap::new();
            nodes.insert(PathBuf::from("/"), Node::Dir { children: Vec::new(), readable: true });
            Self { nodes }
        }

        pub fn dir(mut self, path: &str) -> Self {
            self.insert(Path::new(path), Node::Dir { children: Vec::new(), readable: true });
            self
        }

        pub fn locked_dir(mut self, path: &str) -> Self {
            self.insert(Path::new(path), Node::Dir { children: Vec::new(), readable: false });
            self
        }

        pub fn file(mut self, path: &str, size: u64) -> Self {
            self.insert(Path::new(path), Node::File { size });
            self
        }

        /// Listed by its parent but fails to stat.
        pub fn dangling(mut self, path: &str) -> Self {
            self.insert(Path::new(path), Node::Dangling);
            self
        }

        fn insert(&mut self, path: &Path, node: Node) {
            if let Some(parent) = path.parent() {
                if !self.nodes.contains_key(parent) {
                    self.insert(parent, Node::Dir { children: Vec::new(), readable: true });
                }
                let name = path.file_name().map(OsString::from).unwrap_or_default();
                if let Some(Node::Dir { children, .. }) = self.nodes.get_mut(parent) {
                    if !children.contains(&name) {
                        children.push(name);
                    }
                }
            }
            let node = match (self.nodes.remove(path), node) {
                (Some(Node::Dir { children, .. }), Node::Dir { readable, .. }) => {
                    Node::Dir { children, readable }
                }
                (_, node) => node,
            };
            self.nodes.insert(path.to_path_buf(), node);
        }
    }

    fn mtime() -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }

    impl FileSystem for FakeFs {
        fn stat(&self, path: &Path) -> Result<Stat, FsError> {
            match self.nodes.get(path) {
                Some(Node::Dir { .. }) => Ok(Stat { kind: StatKind::Dir, size: 4096, modified: mtime() }),
                Some(Node::File { size }) => Ok(Stat { kind: StatKind::File, size: *size, modified: mtime() }),
                Some(Node::Dangling) | None => Err(FsError::NotFound(path.to_path_buf())),
            }
        }

        fn list_dir(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
            match self.nodes.get(path) {
                Some(Node::Dir { children, readable: true }) => Ok(children.clone()),
                Some(Node::Dir { readable: false, .. }) => {
                    Err(FsError::PermissionDenied(path.to_path_buf()))
                }
                Some(_) => Err(FsError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("not a directory"),
                }),
                None => Err(FsError::NotFound(path.to_path_buf())),
            }
        }

        fn canonicalize(&self, path: &Path) -> Result<PathBuf, FsError> {
            match self.nodes.get(path) {
                Some(Node::Dangling) | None => Err(FsError::NotFound(path.to_path_buf())),
                Some(_) => Ok(path.to_path_buf()),
            }
        }
    }
}
