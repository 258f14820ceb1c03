//! Poster rotation state machine.
//!
//! Walks the filtered poster list one entry per tick, wrapping around at the
//! end. A rotation is built fresh from each manifest load; restarting it
//! always begins again at the first poster.

use std::path::{Path, PathBuf};

use super::manifest::PosterEntry;

/// What the poster panel shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterFrame {
    /// Full path of the poster file under the configured base directory.
    pub source: PathBuf,
    pub caption: String,
    /// Whether the poster file was readable when the frame was produced.
    /// The panel keeps the frame dimmed until this is set.
    pub loaded: bool,
}

/// Cyclic cursor over the active posters.
#[derive(Debug)]
pub struct PosterRotation {
    items: Vec<PosterEntry>,
    idx: usize,
}

impl PosterRotation {
    pub fn new(items: Vec<PosterEntry>) -> Self {
        Self { items, idx: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Produce the frame for the current poster and step to the next one.
    /// `None` when there are no active posters (placeholder state).
    pub fn advance(&mut self, base_dir: &Path) -> Option<PosterFrame> {
        if self.items.is_empty() {
            return None;
        }
        let item = &self.items[self.idx];
        let frame = PosterFrame {
            source: base_dir.join(&item.file),
            caption: caption_for(item),
            loaded: false,
        };
        self.idx = (self.idx + 1) % self.items.len();
        Some(frame)
    }
}

/// Caption text: the entry caption, falling back to the file name, with the
/// expiry date appended for dated posters.
pub fn caption_for(entry: &PosterEntry) -> String {
    let base = if entry.caption.is_empty() {
        entry.file.as_str()
    } else {
        entry.caption.as_str()
    };
    match entry.expires_at {
        Some(expires_at) => format!("{} • until {}", base, expires_at.format("%d.%m.%Y")),
        None => base.to_string(),
    }
}
