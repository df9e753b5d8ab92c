use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::fs::DirHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFolder {
    pub path: PathBuf,
    pub is_test: bool,
    pub package_prefix: String,
}

/// A registered root directory of a module. Source and exclude folders can
/// only be declared on an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEntry {
    root: PathBuf,
    source_folders: Vec<SourceFolder>,
    exclude_folders: Vec<PathBuf>,
}

impl ContentEntry {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            source_folders: Vec::new(),
            exclude_folders: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_source_folder(&mut self, dir: &DirHandle, is_test: bool, package_prefix: &str) {
        self.source_folders.push(SourceFolder {
            path: dir.path().to_path_buf(),
            is_test,
            package_prefix: package_prefix.to_string(),
        });
    }

    pub fn add_exclude_folder(&mut self, dir: &DirHandle) {
        self.exclude_folders.push(dir.path().to_path_buf());
    }

    pub fn source_folders(&self) -> &[SourceFolder] {
        &self.source_folders
    }

    pub fn exclude_folders(&self) -> &[PathBuf] {
        &self.exclude_folders
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude_folders.iter().any(|p| path.starts_with(p))
    }
}

/// The editable model of one module: its content entries plus compiler
/// output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RootModel {
    module_name: String,
    content_entries: Vec<ContentEntry>,
    exclude_output: bool,
}

impl RootModel {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Returns the content entry for `root`, adding it first if needed.
    pub fn add_content_entry(&mut self, root: &Path) -> &mut ContentEntry {
        let index = match self.content_entries.iter().position(|e| e.root == root) {
            Some(index) => index,
            None => {
                self.content_entries.push(ContentEntry::new(root.to_path_buf()));
                self.content_entries.len() - 1
            }
        };
        &mut self.content_entries[index]
    }

    pub fn content_entry(&self, root: &Path) -> Option<&ContentEntry> {
        self.content_entries.iter().find(|e| e.root == root)
    }

    pub fn content_entries(&self) -> &[ContentEntry] {
        &self.content_entries
    }

    /// Keep this module's build output out of the aggregated compiler output.
    pub fn set_exclude_output(&mut self, exclude: bool) {
        self.exclude_output = exclude;
    }

    pub fn exclude_output(&self) -> bool {
        self.exclude_output
    }
}
