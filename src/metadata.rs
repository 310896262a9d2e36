#![forbid(unsafe_code)]

//! Descriptions for the details panel.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::fs_ops::{FileSystem, StatKind, count_children, format_detail_time, group_thousands};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Bytes(u64),
    Children { total: usize, dirs: usize, files: usize },
    AccessDenied,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    Item { name: String, contents: Contents, modified: Option<SystemTime> },
    Parent { path: PathBuf },
    /// The entry was listed but its metadata can no longer be read.
    Unavailable { name: String, reason: String },
    Empty,
}

pub fn describe<F: FileSystem>(fs: &F, path: &Path) -> Details {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let stat = match fs.stat(path) {
        Ok(stat) => stat,
        Err(err) => return Details::Unavailable { name, reason: err.to_string() },
    };
    let contents = match stat.kind {
        StatKind::File => Contents::Bytes(stat.size),
        StatKind::Dir => match count_children(fs, path) {
            Ok(counts) => Contents::Children {
                total: counts.total,
                dirs: counts.dirs,
                files: counts.files,
            },
            Err(_) => Contents::AccessDenied,
        },
        StatKind::Other => Contents::Unknown,
    };
    Details::Item { name, contents, modified: stat.modified }
}

impl Details {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Details::Item { name, contents, modified } => {
                let mut lines = vec![format!("Name: {name}")];
                match contents {
                    Contents::Bytes(size) => {
                        lines.push(String::from("Type: File"));
                        lines.push(format!("Size: {} bytes", group_thousands(*size)));
                    }
                    Contents::Children { total, dirs, files } => {
                        lines.push(String::from("Type: Directory"));
                        lines.push(format!("Contains: {total} items ({dirs} dirs, {files} files)"));
                    }
                    Contents::AccessDenied => {
                        lines.push(String::from("Type: Directory"));
                        lines.push(String::from("Contains: Access denied"));
                    }
                    Contents::Unknown => {
                        lines.push(String::from("Type: Unknown"));
                        return lines;
                    }
                }
                lines.push(format!("Modified: {}", format_detail_time(*modified)));
                lines
            }
            Details::Parent { path } => vec![
                String::from("Name: .."),
                String::from("Type: Parent Directory"),
                format!("Path: {}", path.display()),
            ],
            Details::Unavailable { name, reason } => vec![
                format!("Name: {name}"),
                String::from("Type: N/A"),
                String::from("Size: N/A"),
                String::from("Modified: N/A"),
                format!("Error: {reason}"),
            ],
            Details::Empty => vec![String::from("No item selected")],
        }
    }
}
