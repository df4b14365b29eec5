//! Business entities tracked by the operations desk
//!
//! Every entity carries an opaque `id` assigned by the store at creation.
//! Status fields are closed enums; `parse` accepts the storage spelling and
//! a few human spellings so CLI input maps onto the same domain.

pub mod asset;
pub mod client;
pub mod content;
pub mod metric;
pub mod project;
pub mod task;

pub use asset::{Asset, AssetKind, AssetPatch, NewAsset};
pub use client::{Client, ClientPatch, ClientStatus, NewClient};
pub use content::{ContentIdea, ContentPatch, ContentStatus, NewContentIdea, Platform};
pub use metric::{MetricPatch, NewWeeklyMetric, WeeklyMetric};
pub use project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use task::{NewTask, OpalBlock, Priority, Role, Task, TaskPatch, TaskStatus};

use uuid::Uuid;

/// Generate a fresh entity identifier
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Case-insensitive substring containment used for fuzzy lookups
pub fn fuzzy_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalize user spelled enum values ("In Progress", "in-progress") to the
/// storage form ("in_progress")
pub(crate) fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_contains_ignores_case() {
        assert!(fuzzy_contains("Fix Login Bug", "login"));
        assert!(fuzzy_contains("acme corp", "ACME"));
        assert!(!fuzzy_contains("Acme", "globex"));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" In Progress "), "in_progress");
        assert_eq!(normalize_key("on-hold"), "on_hold");
    }

    #[test]
    fn test_new_id_unique() {
        assert_ne!(new_id(), new_id());
    }
}
