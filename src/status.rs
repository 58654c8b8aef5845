//! Folder classification.
//!
//! A lesson folder is in exactly one of three states, decided purely from
//! what is on disk:
//!
//! 1. folder missing (or not a directory) → [`FolderState::NotStarted`]
//! 2. a `DONE` / `DONE.md` marker, any letter case → [`FolderState::Completed`]
//! 3. at least one entry that is not hidden and not `.gitkeep`, `.DS_Store`
//!    or `Thumbs.db` (exact case) → [`FolderState::InProgress`]
//! 4. otherwise → [`FolderState::NotStarted`]
//!
//! A folder that cannot be listed (permission denied and the like) is
//! reported as `NotStarted` with a warning instead of failing the run.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::config::Topic;

/// Marker names, compared ASCII case-insensitively.
const DONE_MARKERS: &[&str] = &["DONE", "DONE.md"];

/// Placeholder and OS metadata files that never count as lesson content.
/// Compared case-sensitively.
const IGNORED_FILES: &[&str] = &[".gitkeep", ".DS_Store", "Thumbs.db"];

const HIDDEN_PREFIX: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderState {
    NotStarted,
    InProgress,
    Completed,
}

/// Classifies topic folders relative to a repository root.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    root: PathBuf,
}

impl StatusClassifier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Classify the folder of `topic` under the root.
    pub fn classify(&self, topic: &Topic) -> FolderState {
        let path = topic.folder_path(&self.root);
        let state = classify_dir(&path);
        debug!("Topic {} ({}) -> {:?}", topic.id, path.display(), state);
        state
    }
}

/// Classify a single directory on disk.
pub fn classify_dir(path: &Path) -> FolderState {
    if !path.is_dir() {
        return FolderState::NotStarted;
    }

    let listing = std::fs::read_dir(path).and_then(|entries| {
        entries
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<io::Result<Vec<OsString>>>()
    });

    if let Err(e) = &listing {
        warn!("Cannot list {}, treating as not started: {}", path.display(), e);
    }

    state_from_listing(listing)
}

/// Decide a state from the result of listing an existing directory.
pub fn state_from_listing(listing: io::Result<Vec<OsString>>) -> FolderState {
    let names = match listing {
        Ok(names) => names,
        Err(_) => return FolderState::NotStarted,
    };

    let names: Vec<_> = names.iter().map(|n| n.to_string_lossy()).collect();

    if names.iter().any(|name| is_done_marker(name)) {
        return FolderState::Completed;
    }

    if names.iter().any(|name| is_content(name)) {
        FolderState::InProgress
    } else {
        FolderState::NotStarted
    }
}

pub fn is_done_marker(name: &str) -> bool {
    DONE_MARKERS.iter().any(|marker| name.eq_ignore_ascii_case(marker))
}

fn is_ignored(name: &str) -> bool {
    is_done_marker(name) || IGNORED_FILES.iter().any(|f| *f == name)
}

fn is_content(name: &str) -> bool {
    !is_ignored(name) && !name.starts_with(HIDDEN_PREFIX)
}
