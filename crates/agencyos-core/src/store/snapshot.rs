//! Full-collection snapshot persisted as one unit

use serde::{Deserialize, Serialize};

use crate::entities::{Asset, Client, ContentIdea, Project, Task, WeeklyMetric};

/// Snapshot format version written alongside the collections
pub const SNAPSHOT_VERSION: u32 = 1;

/// Every collection of the store, in collection order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub content: Vec<ContentIdea>,
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub assets: Vec<Asset>,
    pub metrics: Vec<WeeklyMetric>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.content.is_empty()
            && self.clients.is_empty()
            && self.projects.is_empty()
            && self.assets.is_empty()
            && self.metrics.is_empty()
    }

    /// The most recent ledger row, if any
    pub fn latest_metric(&self) -> Option<&WeeklyMetric> {
        self.metrics.last()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Tasks linked to `project_id`, in collection order
    pub fn project_tasks<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.project_id.as_deref() == Some(project_id))
    }
}
