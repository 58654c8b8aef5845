use std::fs;
use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use crate::error::{Error, Result};

/// Matched as a prefix so the start line may carry a note after the tag.
pub const START_MARKER_PREFIX: &str = "<!-- PROGRESS:START";
pub const START_MARKER: &str =
    "<!-- PROGRESS:START - Tự động cập nhật bởi GitHub Actions, KHÔNG sửa tay phần này -->";
pub const END_MARKER: &str = "<!-- PROGRESS:END -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// An existing marker region was replaced in place.
    Replaced,
    /// No complete marker region was found; the block was appended.
    Appended,
}

impl PatchOutcome {
    pub fn describe(&self) -> &'static str {
        match self {
            PatchOutcome::Replaced => "replaced progress block",
            PatchOutcome::Appended => "appended progress block",
        }
    }
}

/// Byte range of the first marker region, both markers included.
///
/// The end marker must follow the start marker; an end marker that only
/// appears before the start does not close the region.
pub fn find_region(text: &str) -> Option<Range<usize>> {
    let start = text.find(START_MARKER_PREFIX)?;
    let after_start = start + START_MARKER_PREFIX.len();
    let end = after_start + text[after_start..].find(END_MARKER)?;
    Some(start..end + END_MARKER.len())
}

/// The current block, markers included, if present.
pub fn extract_block(text: &str) -> Option<&str> {
    find_region(text).map(|range| &text[range])
}

/// Separates an appended block from the rest of the document.
const APPEND_SEPARATOR: &str = "\n\n---\n\n";

/// Replace the marker region with `block`, or append `block` if there is none.
///
/// An appended block goes after the document with its trailing whitespace
/// trimmed, a horizontal rule between the two.
pub fn patch(existing: &str, block: &str) -> (String, PatchOutcome) {
    match find_region(existing) {
        Some(range) => {
            let mut text = String::with_capacity(existing.len() - range.len() + block.len());
            text.push_str(&existing[..range.start]);
            text.push_str(block);
            text.push_str(&existing[range.end..]);
            (text, PatchOutcome::Replaced)
        }
        None => {
            let head = existing.trim_end();
            let mut text = String::with_capacity(head.len() + APPEND_SEPARATOR.len() + block.len() + 1);
            text.push_str(head);
            text.push_str(APPEND_SEPARATOR);
            text.push_str(block);
            text.push('\n');
            (text, PatchOutcome::Appended)
        }
    }
}

pub fn read_readme(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        debug!("Failed to read {}: {}", path.display(), e);
        Error::ReadmeNotFound(path.to_path_buf())
    })
}

/// Write `contents` to a temp file next to `path`, then rename it over `path`.
///
/// Keeps the permissions of the file being replaced.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(tmp.path(), meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Cannot read permissions of {}: {}", path.display(), e),
    }

    tmp.persist(path).map_err(|e| e.error)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
