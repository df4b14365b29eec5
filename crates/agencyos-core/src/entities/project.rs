//! Projects grouping pipeline tasks

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, normalize_key};

/// Project status
///
/// `Done` is derived by the store from the linked tasks; writing it by hand
/// only sticks until the next task mutation re-evaluates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Done,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "active" => Some(ProjectStatus::Active),
            "on_hold" | "hold" => Some(ProjectStatus::OnHold),
            "done" => Some(ProjectStatus::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub client_id: Option<String>,
    pub status: ProjectStatus,
    pub deadline: Option<NaiveDate>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub(crate) fn into_project(self) -> Project {
        Project {
            id: new_id(),
            name: self.name,
            client_id: self.client_id,
            status: self.status,
            deadline: self.deadline,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub client_id: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub deadline: Option<Option<NaiveDate>>,
}

impl ProjectPatch {
    pub(crate) fn merge_into(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(client) = self.client_id {
            project.client_id = client;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
    }
}
