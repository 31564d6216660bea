use log::{debug, warn};
use serde::Serialize;

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::constants::{display, files};

/// One entry of a folder preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub is_dir: bool,
    /// Lowercased extension including the dot, empty for none
    pub extension: String,
}

/// Pre-flight report on a folder of mark exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    pub path: PathBuf,
    pub exists: bool,
    pub is_dir: bool,
    pub readable: bool,
    /// Why the folder could not be listed
    pub read_error: Option<String>,
    pub item_count: usize,
    /// First entries by name
    pub preview: Vec<FolderEntry>,
    pub csv_files: Vec<String>,
    pub excel_files: Vec<String>,
    /// Existing variant of a missing path with its spaces removed
    pub suggestion: Option<PathBuf>,
}

impl FolderReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            exists: false,
            is_dir: false,
            readable: false,
            read_error: None,
            item_count: 0,
            preview: Vec::new(),
            csv_files: Vec::new(),
            excel_files: Vec::new(),
            suggestion: None,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.exists && self.is_dir && self.readable
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

fn without_spaces(path: &Path) -> Option<PathBuf> {
    let text = path.to_string_lossy();
    if !text.contains(' ') {
        return None;
    }
    let candidate = PathBuf::from(text.replace(' ', ""));
    candidate.exists().then_some(candidate)
}

/// Check that `path` is an existing, listable folder and summarize its contents
pub fn inspect_folder(path: &Path) -> FolderReport {
    let mut report = FolderReport::new(path);

    report.exists = path.exists();
    if !report.exists {
        warn!("Folder does not exist: {}", path.display());
        report.suggestion = without_spaces(path);
        return report;
    }

    report.is_dir = path.is_dir();
    if !report.is_dir {
        return report;
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read folder {}: {e}", path.display());
            report.read_error = Some(e.to_string());
            return report;
        }
    };
    report.readable = true;

    let mut items: Vec<FolderEntry> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            FolderEntry {
                extension: if is_dir {
                    String::new()
                } else {
                    extension_of(&name)
                },
                name,
                is_dir,
            }
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    report.item_count = items.len();
    for item in items.iter().filter(|item| !item.is_dir) {
        let ext = item.extension.trim_start_matches('.');
        if files::TABLE_EXTENSIONS.contains(&ext) {
            report.csv_files.push(item.name.clone());
        } else if files::EXCEL_EXTENSIONS.contains(&ext) {
            report.excel_files.push(item.name.clone());
        }
    }
    items.truncate(display::MAX_PREVIEW_ITEMS);
    report.preview = items;

    debug!(
        "Inspected {}: {} item(s), {} CSV, {} Excel",
        path.display(),
        report.item_count,
        report.csv_files.len(),
        report.excel_files.len()
    );

    report
}
