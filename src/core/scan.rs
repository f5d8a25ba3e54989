//! Document scanner: mirrors the specification root as a `DirectoryNode` tree.
//!
//! Only two kinds of files are kept (structured `.toml`, long-form `.md`/`.markdown`);
//! everything else is ignored. A directory that cannot be read becomes an empty node
//! and a `ScanFailure`; only the root itself is fatal.

use crate::core::error::SpecError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    StructuredConfig,
    LongFormText,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(FileKind::StructuredConfig),
            Some("md") | Some("markdown") => Some(FileKind::LongFormText),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub size: u64,
    /// Unix-epoch seconds; `0` when the platform cannot report it.
    pub modified_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// `/`-separated path relative to the root
    pub path: String,
    pub name: String,
    pub kind: FileKind,
    pub metadata: FileMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// `/`-separated path relative to the root; empty for the root itself
    pub path: String,
    pub name: String,
    pub files: Vec<FileRef>,
    pub folders: Vec<DirectoryNode>,
}

impl DirectoryNode {
    fn empty(path: String, name: String) -> Self {
        Self {
            path,
            name,
            files: Vec::new(),
            folders: Vec::new(),
        }
    }

    /// Find a descendant node by its relative path.
    pub fn find(&self, rel: &str) -> Option<&DirectoryNode> {
        let rel = rel.trim_matches('/');
        if rel.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in rel.split('/') {
            node = node.folders.iter().find(|f| f.name == segment)?;
        }
        Some(node)
    }

    /// Depth-first, files before subfolders, in sorted order.
    pub fn walk_files(&self) -> Vec<&FileRef> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a FileRef>) {
        out.extend(self.files.iter());
        for folder in &self.folders {
            folder.collect_files(out);
        }
    }

    /// Every node of the tree, self first.
    pub fn walk_dirs(&self) -> Vec<&DirectoryNode> {
        let mut out = vec![self];
        for folder in &self.folders {
            out.extend(folder.walk_dirs());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub path: String,
    pub cause: String,
}

#[derive(Debug, Clone)]
pub struct Scan {
    pub root: PathBuf,
    pub tree: DirectoryNode,
    pub failures: Vec<ScanFailure>,
}

/// Join a relative parent path and a child name with `/`.
pub fn join_rel(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Directory lister used by the walk.
type ListDir = fn(&Path) -> io::Result<fs::ReadDir>;

fn list_dir(dir: &Path) -> io::Result<fs::ReadDir> {
    fs::read_dir(dir)
}

/// Scan `root` recursively. Fails only when `root` itself cannot be listed.
pub fn scan_tree(root: &Path) -> Result<Scan, SpecError> {
    scan_tree_with(root, list_dir)
}

fn scan_tree_with(root: &Path, list: ListDir) -> Result<Scan, SpecError> {
    let entries = list(root).map_err(|source| SpecError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let name = root
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut failures = Vec::new();
    let tree = build_node(root, String::new(), name, entries, list, &mut failures);
    Ok(Scan {
        root: root.to_path_buf(),
        tree,
        failures,
    })
}

/// Scan the directory at `root/rel`. Unreadable directories yield an empty node
/// and a recorded failure.
pub fn scan_folder(root: &Path, rel: &str, failures: &mut Vec<ScanFailure>) -> DirectoryNode {
    scan_folder_with(root, rel, list_dir, failures)
}

fn scan_folder_with(
    root: &Path,
    rel: &str,
    list: ListDir,
    failures: &mut Vec<ScanFailure>,
) -> DirectoryNode {
    let name = rel.rsplit('/').next().unwrap_or(rel).to_string();
    let dir = root.join(rel);
    match list(&dir) {
        Ok(entries) => build_node(root, rel.to_string(), name, entries, list, failures),
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
            failures.push(ScanFailure {
                path: rel.to_string(),
                cause: e.to_string(),
            });
            DirectoryNode::empty(rel.to_string(), name)
        }
    }
}

fn build_node(
    root: &Path,
    rel: String,
    name: String,
    entries: fs::ReadDir,
    list: ListDir,
    failures: &mut Vec<ScanFailure>,
) -> DirectoryNode {
    let mut node = DirectoryNode::empty(rel, name);
    let mut children: Vec<(String, PathBuf, fs::FileType)> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %node.path, error = %e, "skipping unreadable entry");
                failures.push(ScanFailure {
                    path: node.path.clone(),
                    cause: e.to_string(),
                });
                continue;
            }
        };
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with('.') {
            continue;
        }
        // Symlinks are not followed.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        children.push((file_name, entry.path(), file_type));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));

    for (file_name, path, file_type) in children {
        let child_rel = join_rel(&node.path, &file_name);
        if file_type.is_dir() {
            node.folders.push(scan_folder_with(root, &child_rel, list, failures));
        } else if file_type.is_file() {
            let Some(kind) = FileKind::from_path(&path) else {
                continue;
            };
            debug!(path = %child_rel, ?kind, "discovered document");
            node.files.push(FileRef {
                path: child_rel,
                name: file_name,
                kind,
                metadata: file_metadata(&path),
            });
        }
    }
    node
}

fn file_metadata(path: &Path) -> FileMetadata {
    match fs::metadata(path) {
        Ok(meta) => FileMetadata {
            size: meta.len(),
            modified_at: meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0),
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "metadata unavailable");
            FileMetadata {
                size: 0,
                modified_at: 0,
            }
        }
    }
}
