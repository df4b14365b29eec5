//! Entity store with automation rules
//!
//! The store owns all six collections. Every mutation goes through one entry
//! point per collection, fires the automation rules that apply to it, and
//! then saves a full snapshot through the persistence gateway.
//!
//! Updates and deletes on an unknown id are silent no-ops (logged at warn).
//! Save failures and timeouts are logged and remembered until the next
//! [`EntityStore::take_save_failure`] call; they never reach the caller.

pub mod automation;
pub mod seed;
pub mod snapshot;

pub use snapshot::{SNAPSHOT_VERSION, Snapshot};

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{AutomationConfig, Config};
use crate::entities::{
    Asset, AssetPatch, Client, ClientPatch, ContentIdea, ContentPatch, ContentStatus, MetricPatch,
    NewAsset, NewClient, NewContentIdea, NewProject, NewTask, NewWeeklyMetric, Project,
    ProjectPatch, Task, TaskPatch, TaskStatus, WeeklyMetric,
};
use crate::error::Error;
use crate::gateway::PersistenceGateway;
use crate::random::RandomSource;

/// Store handle shared by the agents and the interpreter
pub type SharedStore = Arc<Mutex<EntityStore>>;

/// Store construction options
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub automation: AutomationConfig,
    pub save_timeout: Duration,
    /// Load demo data when the store opens without tasks
    pub seed_when_empty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            automation: AutomationConfig::default(),
            save_timeout: Duration::from_secs(5),
            seed_when_empty: true,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            automation: config.automation.clone(),
            save_timeout: Duration::from_secs(config.storage.save_timeout_secs),
            seed_when_empty: true,
        }
    }

    /// Start empty even when nothing was persisted
    pub fn unseeded(mut self) -> Self {
        self.seed_when_empty = false;
        self
    }
}

/// Counts removed by [`EntityStore::clean_desk`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanDeskSummary {
    pub tasks: usize,
    pub content: usize,
}

pub struct EntityStore {
    data: Snapshot,
    gateway: Arc<dyn PersistenceGateway>,
    random: Arc<dyn RandomSource>,
    options: StoreOptions,
    save_failed: bool,
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("tasks", &self.data.tasks.len())
            .field("content", &self.data.content.len())
            .field("clients", &self.data.clients.len())
            .field("projects", &self.data.projects.len())
            .field("assets", &self.data.assets.len())
            .field("metrics", &self.data.metrics.len())
            .finish()
    }
}

impl EntityStore {
    /// Restore the last snapshot from `gateway`
    ///
    /// A load failure is logged and the store starts empty. An empty task
    /// list is seeded with demo data unless `options` says otherwise.
    pub async fn open(
        gateway: Arc<dyn PersistenceGateway>,
        random: Arc<dyn RandomSource>,
        options: StoreOptions,
    ) -> Self {
        let mut data = match gateway.load_snapshot().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => Snapshot::empty(),
            Err(e) => {
                error!(error = %e, code = e.code(), "Failed to load snapshot; starting empty");
                Snapshot::empty()
            }
        };
        data.metrics.sort_by_key(|m| m.week_ending);

        let mut store = Self {
            data,
            gateway,
            random,
            options,
            save_failed: false,
        };

        if store.options.seed_when_empty && store.data.tasks.is_empty() {
            info!("No tasks found; loading demo data");
            store.data = seed::demo_snapshot(Utc::now());
            store.persist().await;
        }

        info!(
            tasks = store.data.tasks.len(),
            clients = store.data.clients.len(),
            "Entity store ready"
        );
        store
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    pub fn content(&self) -> &[ContentIdea] {
        &self.data.content
    }

    pub fn clients(&self) -> &[Client] {
        &self.data.clients
    }

    pub fn projects(&self) -> &[Project] {
        &self.data.projects
    }

    pub fn assets(&self) -> &[Asset] {
        &self.data.assets
    }

    pub fn metrics(&self) -> &[WeeklyMetric] {
        &self.data.metrics
    }

    /// Random source shared with the agents
    pub fn random(&self) -> Arc<dyn RandomSource> {
        Arc::clone(&self.random)
    }

    pub fn automation(&self) -> &AutomationConfig {
        &self.options.automation
    }

    /// Whether a save failed since the last call; clears the flag
    pub fn take_save_failure(&mut self) -> bool {
        std::mem::take(&mut self.save_failed)
    }

    async fn persist(&mut self) {
        let timeout = self.options.save_timeout;
        match tokio::time::timeout(timeout, self.gateway.save_snapshot(&self.data)).await {
            Ok(Ok(())) => debug!("Snapshot saved"),
            Ok(Err(e)) => {
                warn!(error = %e, code = e.code(), "Snapshot save failed; keeping in-memory state");
                self.save_failed = true;
            }
            Err(_) => {
                let e = Error::GatewayTimeout(timeout.as_secs());
                warn!(error = %e, code = e.code(), "Snapshot save timed out; keeping in-memory state");
                self.save_failed = true;
            }
        }
    }

    fn derive_projects(&mut self, project_ids: [Option<String>; 2]) {
        let [first, second] = project_ids;
        if let Some(id) = &first {
            automation::derive_project_status(&mut self.data, id);
        }
        if let Some(id) = second.filter(|id| Some(id) != first.as_ref()) {
            automation::derive_project_status(&mut self.data, &id);
        }
    }

    // ---------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------

    pub async fn add_task(&mut self, new: NewTask) -> Task {
        let task = new.into_task();
        debug!(task_id = %task.id, name = %task.name, "Adding task");
        self.data.tasks.push(task.clone());
        self.derive_projects([task.project_id.clone(), None]);
        self.persist().await;
        task
    }

    /// Merge `patch` into the task, firing revenue booking on a transition
    /// into Live and re-deriving the linked projects
    pub async fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let Some(task) = self.data.tasks.iter_mut().find(|t| t.id == id) else {
            warn!(task_id = %id, "Update for unknown task ignored");
            return;
        };

        let touches_completion = patch.touches_completion();
        let old_status = task.status;
        let old_project = task.project_id.clone();
        patch.merge_into(task);
        let new_status = task.status;
        let new_project = task.project_id.clone();

        if automation::goes_live(old_status, new_status) {
            let cfg = &self.options.automation;
            let amount = self.random.amount_between(cfg.revenue_min, cfg.revenue_max);
            automation::credit_revenue(&mut self.data.metrics, amount, Utc::now().date_naive());
        }
        if touches_completion {
            self.derive_projects([old_project, new_project]);
        }
        self.persist().await;
    }

    pub async fn delete_task(&mut self, id: &str) {
        let Some(idx) = self.data.tasks.iter().position(|t| t.id == id) else {
            warn!(task_id = %id, "Delete for unknown task ignored");
            return;
        };
        let task = self.data.tasks.remove(idx);
        self.derive_projects([task.project_id, None]);
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------

    pub async fn add_content(&mut self, new: NewContentIdea) -> ContentIdea {
        let idea = new.into_idea();
        self.data.content.push(idea.clone());
        self.persist().await;
        idea
    }

    pub async fn update_content(&mut self, id: &str, patch: ContentPatch) {
        let Some(idea) = self.data.content.iter_mut().find(|c| c.id == id) else {
            warn!(content_id = %id, "Update for unknown content ignored");
            return;
        };
        patch.merge_into(idea);
        self.persist().await;
    }

    pub async fn delete_content(&mut self, id: &str) {
        let before = self.data.content.len();
        self.data.content.retain(|c| c.id != id);
        if self.data.content.len() == before {
            warn!(content_id = %id, "Delete for unknown content ignored");
            return;
        }
        self.persist().await;
    }

    /// Credit new users to the current week's ledger row
    pub async fn credit_new_users(&mut self, users: u64, top_item: &str) {
        automation::credit_new_users(
            &mut self.data.metrics,
            users,
            top_item,
            Utc::now().date_naive(),
        );
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Clients
    // ---------------------------------------------------------------------

    pub async fn add_client(&mut self, new: NewClient) -> Client {
        let client = new.into_client();
        self.data.clients.push(client.clone());
        self.persist().await;
        client
    }

    /// Merge `patch` into the client; a transition into Active creates the
    /// onboarding scaffold once per client
    pub async fn update_client(&mut self, id: &str, patch: ClientPatch) {
        let Some(client) = self.data.clients.iter_mut().find(|c| c.id == id) else {
            warn!(client_id = %id, "Update for unknown client ignored");
            return;
        };
        let old_status = client.status;
        patch.merge_into(client);
        let new_status = client.status;

        if automation::goes_active(old_status, new_status) {
            automation::onboard_client(
                &mut self.data,
                id,
                Utc::now().date_naive(),
                self.options.automation.onboarding_deadline_days,
            );
        }
        self.persist().await;
    }

    pub async fn delete_client(&mut self, id: &str) {
        let before = self.data.clients.len();
        self.data.clients.retain(|c| c.id != id);
        if self.data.clients.len() == before {
            warn!(client_id = %id, "Delete for unknown client ignored");
            return;
        }
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------

    pub async fn add_project(&mut self, new: NewProject) -> Project {
        let project = new.into_project();
        self.data.projects.push(project.clone());
        self.persist().await;
        project
    }

    pub async fn update_project(&mut self, id: &str, patch: ProjectPatch) {
        let Some(project) = self.data.projects.iter_mut().find(|p| p.id == id) else {
            warn!(project_id = %id, "Update for unknown project ignored");
            return;
        };
        patch.merge_into(project);
        // A manual status write must not break the Done invariant.
        automation::derive_project_status(&mut self.data, id);
        self.persist().await;
    }

    /// Remove the project; linked tasks keep their (now dangling) reference
    pub async fn delete_project(&mut self, id: &str) {
        let before = self.data.projects.len();
        self.data.projects.retain(|p| p.id != id);
        if self.data.projects.len() == before {
            warn!(project_id = %id, "Delete for unknown project ignored");
            return;
        }
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Assets
    // ---------------------------------------------------------------------

    pub async fn add_asset(&mut self, new: NewAsset) -> Asset {
        let asset = new.into_asset();
        self.data.assets.push(asset.clone());
        self.persist().await;
        asset
    }

    pub async fn update_asset(&mut self, id: &str, patch: AssetPatch) {
        let Some(asset) = self.data.assets.iter_mut().find(|a| a.id == id) else {
            warn!(asset_id = %id, "Update for unknown asset ignored");
            return;
        };
        patch.merge_into(asset);
        self.persist().await;
    }

    pub async fn delete_asset(&mut self, id: &str) {
        let before = self.data.assets.len();
        self.data.assets.retain(|a| a.id != id);
        if self.data.assets.len() == before {
            warn!(asset_id = %id, "Delete for unknown asset ignored");
            return;
        }
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Metrics
    // ---------------------------------------------------------------------

    pub async fn add_metric(&mut self, new: NewWeeklyMetric) -> WeeklyMetric {
        let metric = new.into_metric();
        automation::insert_metric(&mut self.data.metrics, metric.clone());
        self.persist().await;
        metric
    }

    pub async fn update_metric(&mut self, id: &str, patch: MetricPatch) {
        let Some(metric) = self.data.metrics.iter_mut().find(|m| m.id == id) else {
            warn!(metric_id = %id, "Update for unknown metric ignored");
            return;
        };
        patch.merge_into(metric);
        self.persist().await;
    }

    pub async fn delete_metric(&mut self, id: &str) {
        let before = self.data.metrics.len();
        self.data.metrics.retain(|m| m.id != id);
        if self.data.metrics.len() == before {
            warn!(metric_id = %id, "Delete for unknown metric ignored");
            return;
        }
        self.persist().await;
    }

    // ---------------------------------------------------------------------
    // Bulk operations
    // ---------------------------------------------------------------------

    /// Drop every collection and load the demo data again
    pub async fn reset(&mut self) {
        self.data = seed::demo_snapshot(Utc::now());
        info!("Store reset to demo data");
        self.persist().await;
    }

    /// Remove Live tasks and Posted content
    ///
    /// Projects that lose tasks are re-derived, so a Done project whose tasks
    /// were all cleared reverts to Active.
    pub async fn clean_desk(&mut self) -> CleanDeskSummary {
        let mut affected: Vec<String> = Vec::new();
        let tasks_before = self.data.tasks.len();
        self.data.tasks.retain(|t| {
            if t.status != TaskStatus::Live {
                return true;
            }
            if let Some(pid) = &t.project_id {
                if !affected.contains(pid) {
                    affected.push(pid.clone());
                }
            }
            false
        });
        let content_before = self.data.content.len();
        self.data
            .content
            .retain(|c| c.status != ContentStatus::Posted);

        for pid in &affected {
            automation::derive_project_status(&mut self.data, pid);
        }

        let summary = CleanDeskSummary {
            tasks: tasks_before - self.data.tasks.len(),
            content: content_before - self.data.content.len(),
        };
        info!(tasks = summary.tasks, content = summary.content, "Cleaned desk");
        self.persist().await;
        summary
    }
}
