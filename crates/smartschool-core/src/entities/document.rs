//! Nodes of a course's document tree, scraped from the folder browser.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::text::{filesystem_safe_filename, natural_sort_key};

/// A folder; `browse_url` lists its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    pub name: String,
    pub browse_url: String,
}

impl FolderItem {
    /// The root folder of a course (`/Documents/Index/Index/courseID/<id>/ssID/<platform>`).
    #[must_use]
    pub fn course_root(name: &str, course_id: i64, platform_id: i64) -> Self {
        Self {
            name: name.to_string(),
            browse_url: format!("/Documents/Index/Index/courseID/{course_id}/ssID/{platform_id}"),
        }
    }
}

/// A downloadable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: i64,
    pub name: String,
    /// Lowercase type token (`pdf`, `docx`, `html`).
    pub mime_type: String,
    pub size_kb: f64,
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub download_url: String,
    pub view_url: Option<String>,
}

impl FileItem {
    /// Name with the type as extension, made filesystem safe.
    #[must_use]
    pub fn filename(&self) -> String {
        let suffix = format!(".{}", self.mime_type);
        let name = if self.mime_type.is_empty()
            || self.name.to_lowercase().ends_with(&suffix)
        {
            self.name.clone()
        } else {
            format!("{}{suffix}", self.name)
        };
        filesystem_safe_filename(&name)
    }
}

/// An `html` document that only points elsewhere. Saved as a `.url` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternetShortcut {
    pub file: FileItem,
    pub link: String,
}

impl InternetShortcut {
    #[must_use]
    pub fn filename(&self) -> String {
        let name = if self.file.name.to_lowercase().ends_with(".url") {
            self.file.name.clone()
        } else {
            format!("{}.url", self.file.name)
        };
        filesystem_safe_filename(&name)
    }

    /// The Windows shortcut file body.
    #[must_use]
    pub fn content(&self) -> String {
        format!("[InternetShortcut]\r\nURL={}", self.link)
    }

    /// Write the shortcut into `dir`. An existing file is left alone unless
    /// `overwrite` is set. Returns the path either way.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from creating `dir` or writing the file.
    pub fn write_to(&self, dir: &Path, overwrite: bool) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.filename());
        if overwrite || !path.exists() {
            std::fs::write(&path, self.content())?;
        }
        Ok(path)
    }
}

/// One row of a folder listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentNode {
    Folder(FolderItem),
    File(FileItem),
    Shortcut(InternetShortcut),
}

impl DocumentNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::File(f) => &f.name,
            Self::Shortcut(s) => &s.file.name,
        }
    }

    #[must_use]
    pub const fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Folders first, then natural name order.
    #[must_use]
    pub fn listing_order(&self, other: &Self) -> Ordering {
        other
            .is_folder()
            .cmp(&self.is_folder())
            .then_with(|| natural_sort_key(self.name()).cmp(&natural_sort_key(other.name())))
    }
}
