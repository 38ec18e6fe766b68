//! Multi-file response codec
//!
//! Pure functions for recovering a set of files from a single completion blob.
//! Files are delimited by marker lines of the form `<!-- File: <path> -->`; the
//! content of a file is everything between its marker and the next one (or the
//! end of the text), trimmed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// How marker lines are recognized inside a completion blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMode {
    /// A marker must occupy a whole line (surrounding whitespace allowed).
    #[default]
    Strict,
    /// Any `<!-- File: ... -->` occurrence is a boundary, even mid-line.
    Lenient,
}

/// One file recovered from a marker-delimited blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlock {
    pub path: String,
    pub content: String,
}

impl FileBlock {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Ordered collection of files in order of appearance in the source text.
///
/// Paths are not required to be unique. Lookups and [`ResponseBundle::to_map`]
/// resolve duplicates to the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseBundle {
    blocks: Vec<FileBlock>,
}

impl ResponseBundle {
    pub fn new(blocks: Vec<FileBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileBlock> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[FileBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<FileBlock> {
        self.blocks
    }

    /// Content of the last block with the given path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.blocks
            .iter()
            .rev()
            .find(|block| block.path == path)
            .map(|block| block.content.as_str())
    }

    /// Materialize the bundle as a path → content mapping (last occurrence wins).
    pub fn to_map(&self) -> HashMap<&str, &str> {
        self.blocks
            .iter()
            .map(|block| (block.path.as_str(), block.content.as_str()))
            .collect()
    }

    /// One entry per distinct path, ordered by first appearance, holding the
    /// content of the last appearance.
    pub fn unique_entries(&self) -> Vec<(&str, &str)> {
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &str> = HashMap::new();

        for block in &self.blocks {
            if latest
                .insert(block.path.as_str(), block.content.as_str())
                .is_none()
            {
                order.push(block.path.as_str());
            }
        }

        order
            .into_iter()
            .map(|path| (path, latest[path]))
            .collect()
    }
}

impl From<Vec<FileBlock>> for ResponseBundle {
    fn from(blocks: Vec<FileBlock>) -> Self {
        Self::new(blocks)
    }
}

impl<'a> IntoIterator for &'a ResponseBundle {
    type Item = &'a FileBlock;
    type IntoIter = std::slice::Iter<'a, FileBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl IntoIterator for ResponseBundle {
    type Item = FileBlock;
    type IntoIter = std::vec::IntoIter<FileBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

/// A marker found in the text, with the byte span it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker<'a> {
    path: &'a str,
    start: usize,
    end: usize,
}

fn lenient_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!-- File:\s*(.+?)\s*-->").unwrap())
}

/// Parse a single line as a marker, returning the trimmed path.
///
/// Accepts `<!-- File: css/styles.css -->` with any amount of whitespace around
/// the path or the line itself. Returns `None` for anything else, including a
/// marker with an empty path.
pub fn parse_marker_line(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix("<!--")?.strip_suffix("-->")?;
    let path = inner.trim().strip_prefix("File:")?.trim();

    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Render the marker line for a path.
pub fn marker_line(path: &str) -> String {
    format!("<!-- File: {} -->", path.trim())
}

fn scan_markers(text: &str, mode: MarkerMode) -> Vec<Marker<'_>> {
    match mode {
        MarkerMode::Strict => {
            let mut markers = Vec::new();
            let mut offset = 0;

            for line in text.split_inclusive('\n') {
                if let Some(path) = parse_marker_line(line) {
                    markers.push(Marker {
                        path,
                        start: offset,
                        end: offset + line.len(),
                    });
                }
                offset += line.len();
            }

            markers
        }
        MarkerMode::Lenient => lenient_marker_regex()
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let path = caps.get(1)?.as_str().trim();
                (!path.is_empty()).then_some(Marker {
                    path,
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect(),
    }
}

fn content_after<'a>(text: &'a str, markers: &[Marker<'_>], index: usize) -> &'a str {
    let start = markers[index].end;
    let end = markers
        .get(index + 1)
        .map(|next| next.start)
        .unwrap_or(text.len());

    text[start..end].trim()
}

/// Extract the content of the first file whose marker path equals `target_path`.
///
/// Returns `None` when no marker for the path exists; callers are expected to
/// render a fallback rather than fail.
pub fn extract_file(text: &str, target_path: &str, mode: MarkerMode) -> Option<String> {
    let target = target_path.trim();
    let markers = scan_markers(text, mode);

    markers
        .iter()
        .position(|marker| marker.path == target)
        .map(|index| content_after(text, &markers, index).to_string())
}

/// Split a blob into every file it contains, in order of appearance.
///
/// Text before the first marker is discarded. A blob without markers yields an
/// empty bundle.
pub fn split_all(text: &str, mode: MarkerMode) -> ResponseBundle {
    let markers = scan_markers(text, mode);

    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| FileBlock::new(marker.path, content_after(text, &markers, index)))
        .collect::<Vec<_>>()
        .into()
}

/// Join a bundle back into a marker-delimited blob.
pub fn join_all(bundle: &ResponseBundle) -> String {
    bundle
        .iter()
        .map(|block| format!("{}\n{}", marker_line(&block.path), block.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether a path can be written below an output root without escaping it.
///
/// Rejects absolute paths (drive prefixes included), `..` components,
/// backslashes and empty segments.
pub fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && !path.contains(':')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "..")
}
