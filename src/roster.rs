use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConvoyError, ConvoyResult};

/// A project enabled for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
}

impl Project {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Checkout location under the projects directory.
    #[must_use]
    pub fn repo_path(&self, projects_dir: &Path) -> PathBuf {
        projects_dir.join(&self.name)
    }
}

/// The enabled-projects file: a JSON object mapping project name
/// to an enabled flag, persisted between runs so a deselected
/// project stays deselected.
///
/// Loading tolerates a missing or corrupt file. Newly discovered
/// projects default to enabled.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    path: PathBuf,
    entries: BTreeMap<String, bool>,
}

impl Roster {
    /// Load the roster from `path`. A missing or unparseable file
    /// yields an empty roster rather than an error; the file is
    /// rewritten on the next save.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries = std::fs::read_to_string(path)
            .map(|content| parse_entries(&content))
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    /// Scan `projects_dir` for project checkouts and add any new
    /// ones as enabled, keeping saved flags for known ones.
    pub fn discover(&mut self, projects_dir: &Path) -> ConvoyResult<()> {
        if !projects_dir.is_dir() {
            return Err(ConvoyError::FileNotFound(
                projects_dir.display().to_string(),
            ));
        }

        let mut names: Vec<String> = std::fs::read_dir(projects_dir)?
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();

        merge_defaults(&mut self.entries, &names);
        Ok(())
    }

    /// Flip a project's enabled flag. Returns false if the
    /// project is not in the roster.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.get_mut(name) {
            Some(flag) => {
                *flag = enabled;
                true
            }
            None => false,
        }
    }

    /// Write the roster back to its file.
    pub fn save(&self) -> ConvoyResult<()> {
        std::fs::write(&self.path, render_entries(&self.entries))?;
        Ok(())
    }

    /// The enabled projects, in name order.
    #[must_use]
    pub fn enabled(&self) -> Vec<Project> {
        enabled_projects(&self.entries)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse roster file content. Anything that is not a JSON object
/// of booleans comes back empty.
#[must_use]
pub fn parse_entries(content: &str) -> BTreeMap<String, bool> {
    serde_json::from_str(content).unwrap_or_default()
}

/// Render roster entries as the persisted JSON object.
#[must_use]
pub fn render_entries(entries: &BTreeMap<String, bool>) -> String {
    serde_json::to_string_pretty(entries).expect("roster map serializes")
}

/// Add `names` to the roster, defaulting new entries to enabled
/// and leaving known flags untouched.
pub fn merge_defaults(entries: &mut BTreeMap<String, bool>, names: &[String]) {
    for name in names {
        entries.entry(name.clone()).or_insert(true);
    }
}

/// Projects whose flag is set, in name order.
#[must_use]
pub fn enabled_projects(entries: &BTreeMap<String, bool>) -> Vec<Project> {
    entries
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| Project::new(name))
        .collect()
}
