//! Upstream snapshot providers.
//!
//! The persistence layer owns loading; the engine only asks for a fully
//! hydrated `Project` by id. `Ok(None)` means the project does not exist,
//! which the service turns into a fatal error.
use super::Project;
use crate::error::SourceError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

pub trait ProjectSource: Send + Sync {
    fn fetch_project_snapshot(
        &self,
        project_id: &str,
        include_specifications: bool,
    ) -> Result<Option<Project>, SourceError>;
}

/// Holds snapshots in memory, keyed by project id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectSource {
    projects: HashMap<String, Project>,
}

impl InMemoryProjectSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: Project) {
        self.projects.insert(project.id.clone(), project);
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.insert(project);
        self
    }
}

impl ProjectSource for InMemoryProjectSource {
    fn fetch_project_snapshot(
        &self,
        project_id: &str,
        _include_specifications: bool,
    ) -> Result<Option<Project>, SourceError> {
        Ok(self.projects.get(project_id).cloned())
    }
}

/// Reads `<root>/<project_id>.json` exports.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, project_id: &str) -> Option<PathBuf> {
        // Ids are file stems; anything that could escape the root is not a project.
        if project_id.is_empty()
            || project_id.contains(['/', '\\'])
            || project_id.starts_with('.')
        {
            return None;
        }
        Some(self.root.join(format!("{project_id}.json")))
    }
}

impl ProjectSource for JsonDirectorySource {
    fn fetch_project_snapshot(
        &self,
        project_id: &str,
        _include_specifications: bool,
    ) -> Result<Option<Project>, SourceError> {
        let Some(path) = self.path_for(project_id) else {
            return Ok(None);
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let project = Project::from_json_str(&raw)?;
        Ok(Some(project))
    }
}
