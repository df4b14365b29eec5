//! Strategist agent - priorities, daily plans and project scaffolding

use chrono::Duration;
use tracing::{debug, info};

use super::AgentType;
use crate::entities::{
    NewContentIdea, NewProject, NewTask, Platform, Priority, Role, TaskPatch, TaskStatus,
    fuzzy_contains,
};
use crate::scheduler::today;
use crate::store::SharedStore;

/// Scaffold task template: (name prefix, owner, priority)
const SCAFFOLD_TASKS: &[(&str, Role, Priority)] = &[
    ("Design DB Schema for", Role::Architect, Priority::High),
    ("Setup GitHub Repo for", Role::Architect, Priority::High),
    ("Define MVP Features for", Role::Manager, Priority::Medium),
    ("Write Landing Page Copy for", Role::Merchant, Priority::Medium),
];

const CONTENT_STEPS: [&str; 4] = [
    "Script the hook and body",
    "Film raw footage (A-Roll)",
    "Edit with captions (CapCut)",
    "Create thumbnail and post",
];

const FIX_STEPS: [&str; 4] = [
    "Reproduce the issue locally",
    "Identify root cause in code",
    "Apply fix and regression test",
    "Push hotfix to production",
];

const GENERIC_STEPS: [&str; 4] = [
    "Research requirements",
    "Draft implementation plan",
    "Execute code changes",
    "Verify and deploy",
];

/// Step template for breaking down a task with this name
pub fn breakdown_steps(task_name: &str) -> &'static [&'static str; 4] {
    let lower = task_name.to_lowercase();
    if lower.contains("video") || lower.contains("content") {
        &CONTENT_STEPS
    } else if lower.contains("bug") || lower.contains("fix") {
        &FIX_STEPS
    } else {
        &GENERIC_STEPS
    }
}

pub struct StrategistAgent {
    store: SharedStore,
}

impl StrategistAgent {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Point at the next backlog task: high priority first, else the oldest
    pub async fn suggest_priorities(&self) -> String {
        let store = self.store.lock().await;
        let backlog: Vec<_> = store
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Backlog)
            .collect();

        let Some(oldest) = backlog.first() else {
            return "Backlog is empty! Amazing work. Maybe add some new ideas?".to_string();
        };

        let high: Vec<_> = backlog
            .iter()
            .filter(|t| t.priority == Priority::High)
            .collect();
        match high.first() {
            Some(first) => format!(
                "♟️ **Strategist Advice**: Crush the {} HIGH priority items first. Start with: \"**{}**\".",
                high.len(),
                first.name
            ),
            None => format!(
                "♟️ **Strategy**: All critical tasks cleared. Pick the oldest task from backlog: \"**{}**\"",
                oldest.name
            ),
        }
    }

    /// Recommend a working mode from open build work versus unposted content
    pub async fn recommend_mode(&self) -> String {
        let store = self.store.lock().await;
        let build = store
            .tasks()
            .iter()
            .filter(|t| t.is_open() && matches!(t.owner, Role::Architect | Role::Merchant))
            .count();
        let creative = store.content().iter().filter(|c| c.is_pending()).count();

        match build.cmp(&creative) {
            std::cmp::Ordering::Greater => format!(
                "♟️ **Mode Rec**: You have {} pending build tasks. Switch to **Workbench** mode and ship code.",
                build
            ),
            std::cmp::Ordering::Less => format!(
                "♟️ **Mode Rec**: You have {} content ideas. Switch to **Studio** mode and create.",
                creative
            ),
            std::cmp::Ordering::Equal => {
                "♟️ **Mode Rec**: Balanced load. Stay in **Normal** mode or pick your poison."
                    .to_string()
            }
        }
    }

    /// Three-part plan: one urgent task, one content idea, one revenue goal
    pub async fn plan_day(&self) -> String {
        let store = self.store.lock().await;
        let urgent = store
            .tasks()
            .iter()
            .find(|t| t.priority == Priority::High && t.is_open());
        let idea = store
            .content()
            .iter()
            .find(|c| c.status == crate::entities::ContentStatus::Idea);
        let revenue = store.snapshot().latest_metric().map_or(0, |m| m.revenue);
        let goal = revenue.saturating_mul(11) / 10;

        let mut plan = String::from("♟️ **Daily Battle Plan**:\n");
        match urgent {
            Some(task) => plan.push_str(&format!("1. 🔥 **Priority**: Squash \"{}\".\n", task.name)),
            None => plan.push_str("1. ✅ **Maintenance**: Review 'Live' tasks.\n"),
        }
        match idea {
            Some(idea) => plan.push_str(&format!(
                "2. 🎬 **Growth**: Script video for \"{}\".\n",
                idea.hook
            )),
            None => plan.push_str("2. 🧠 **Brainstorm**: Add 3 new content ideas.\n"),
        }
        plan.push_str(&format!(
            "3. 💰 **Revenue**: Goal is ${}. Check interactions.",
            goal
        ));
        plan
    }

    /// Create a project, its four backlog tasks and a launch content idea
    pub async fn scaffold_project(&self, name: &str) -> String {
        let name = name.trim();
        if name.is_empty() {
            return "Please name your project. e.g., 'Plan project Omega'.".to_string();
        }

        let mut store = self.store.lock().await;
        let today = today();
        let deadline = today + Duration::days(store.automation().project_deadline_days);
        let project = store
            .add_project(NewProject::new(name).with_deadline(deadline))
            .await;

        for (prefix, owner, priority) in SCAFFOLD_TASKS {
            store
                .add_task(
                    NewTask::new(format!("{} {}", prefix, name))
                        .owned_by(*owner)
                        .with_priority(*priority)
                        .deep()
                        .in_project(Some(project.id.clone())),
                )
                .await;
        }

        let hook = format!("Launch {}: Behind the scenes", name);
        store
            .add_content(NewContentIdea::new(hook.clone(), Platform::LinkedIn, today))
            .await;

        info!(agent = %AgentType::Strategist, project = %name, "Scaffolded project");
        format!(
            "🏗️ **Project Scaffolding Complete** for \"{}\".\n- Created **Project** entity.\n- Created {} Pipeline tasks linked to it.\n- Added 1 Content Idea (\"{}\").\n\nCheck the **Projects** tab!",
            name,
            SCAFFOLD_TASKS.len(),
            hook
        )
    }

    /// Break a task into four sub-tasks sharing its project
    pub async fn analyze_task(&self, fuzzy_name: &str) -> String {
        let fuzzy_name = fuzzy_name.trim();
        if fuzzy_name.is_empty() {
            return "Which task should I analyze? (e.g., 'Analyze Fix Login')".to_string();
        }

        let mut store = self.store.lock().await;
        let Some(parent) = store
            .tasks()
            .iter()
            .find(|t| fuzzy_contains(&t.name, fuzzy_name))
            .cloned()
        else {
            return format!("🤔 Task \"{}\" not found in Pipeline.", fuzzy_name);
        };

        let steps = breakdown_steps(&parent.name);
        for step in steps {
            store
                .add_task(
                    NewTask::new(format!("{} ({})", step, parent.name))
                        .owned_by(Role::Architect)
                        .in_project(parent.project_id.clone()),
                )
                .await;
        }

        debug!(agent = %AgentType::Strategist, task = %parent.name, steps = steps.len(), "Broke down task");
        let list = steps
            .iter()
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "🧬 **Deep Analysis Complete**:\nBroken down \"{}\" into {} executable steps.\n\n{}",
            parent.name,
            steps.len(),
            list
        )
    }

    /// Move the first open task matching `fuzzy_name` to Live
    pub async fn complete_task(&self, fuzzy_name: &str) -> String {
        let fuzzy_name = fuzzy_name.trim();
        if fuzzy_name.is_empty() {
            return "Which task did you finish? (e.g., 'Finish Database')".to_string();
        }

        let mut store = self.store.lock().await;
        let Some(task) = store
            .tasks()
            .iter()
            .find(|t| t.is_open() && fuzzy_contains(&t.name, fuzzy_name))
            .cloned()
        else {
            return format!(
                "🤔 I couldn't find an active task matching \"{}\".",
                fuzzy_name
            );
        };

        store
            .update_task(&task.id, TaskPatch::status(TaskStatus::Live))
            .await;
        format!("🚀 **Deployed**: \"{}\" is now LIVE. Great work!", task.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewWeeklyMetric, ProjectStatus};
    use crate::gateway::MemoryGateway;
    use crate::random::FixedRandom;
    use crate::store::{EntityStore, StoreOptions};
    use std::sync::Arc;

    async fn strategist() -> (StrategistAgent, SharedStore) {
        let store = EntityStore::open(
            Arc::new(MemoryGateway::new()),
            Arc::new(FixedRandom::new(300)),
            StoreOptions::default().unseeded(),
        )
        .await
        .into_shared();
        (StrategistAgent::new(store.clone()), store)
    }

    #[test]
    fn test_breakdown_templates() {
        assert_eq!(breakdown_steps("Record video intro")[0], "Script the hook and body");
        assert_eq!(breakdown_steps("Fix login bug")[0], "Reproduce the issue locally");
        assert_eq!(breakdown_steps("Pricing page")[0], "Research requirements");
    }

    #[tokio::test]
    async fn test_scaffold_links_everything() {
        let (agent, store) = strategist().await;
        let reply = agent.scaffold_project("Omega").await;
        assert!(reply.contains("\"Omega\""));

        let store = store.lock().await;
        assert_eq!(store.projects().len(), 1);
        let project = &store.projects()[0];
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(store.snapshot().project_tasks(&project.id).count(), 4);
        assert_eq!(store.tasks()[0].name, "Design DB Schema for Omega");
        assert_eq!(store.content()[0].hook, "Launch Omega: Behind the scenes");
        assert_eq!(store.content()[0].platform, Platform::LinkedIn);
    }

    #[tokio::test]
    async fn test_scaffold_requires_name() {
        let (agent, store) = strategist().await;
        let reply = agent.scaffold_project("   ").await;
        assert!(reply.starts_with("Please name your project"));
        assert!(store.lock().await.projects().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_creates_linked_subtasks() {
        let (agent, store) = strategist().await;
        {
            let mut s = store.lock().await;
            s.add_task(NewTask::new("Fix checkout bug").in_project(Some("p1".into())))
                .await;
        }
        let reply = agent.analyze_task("checkout").await;
        assert!(reply.contains("into 4 executable steps"));

        let s = store.lock().await;
        assert_eq!(s.tasks().len(), 5);
        let sub = &s.tasks()[1];
        assert_eq!(sub.name, "Reproduce the issue locally (Fix checkout bug)");
        assert_eq!(sub.project_id.as_deref(), Some("p1"));
        assert_eq!(sub.owner, Role::Architect);
    }

    #[tokio::test]
    async fn test_analyze_not_found() {
        let (agent, _) = strategist().await;
        let reply = agent.analyze_task("nothing").await;
        assert_eq!(reply, "🤔 Task \"nothing\" not found in Pipeline.");
    }

    #[tokio::test]
    async fn test_complete_books_revenue() {
        let (agent, store) = strategist().await;
        store.lock().await.add_task(NewTask::new("Ship landing page")).await;

        let reply = agent.complete_task("landing").await;
        assert!(reply.contains("is now LIVE"));
        let s = store.lock().await;
        assert_eq!(s.tasks()[0].status, TaskStatus::Live);
        assert_eq!(s.metrics()[0].revenue, 300);
    }

    #[tokio::test]
    async fn test_complete_skips_live_tasks() {
        let (agent, store) = strategist().await;
        store
            .lock()
            .await
            .add_task(NewTask::new("Shipped").with_status(TaskStatus::Live))
            .await;
        let reply = agent.complete_task("shipped").await;
        assert!(reply.starts_with("🤔"));
        assert!(store.lock().await.metrics().is_empty());
    }

    #[tokio::test]
    async fn test_priorities_prefer_high() {
        let (agent, store) = strategist().await;
        {
            let mut s = store.lock().await;
            s.add_task(NewTask::new("Old chore")).await;
            s.add_task(NewTask::new("Hot fix").with_priority(Priority::High))
                .await;
        }
        let reply = agent.suggest_priorities().await;
        assert!(reply.contains("Crush the 1 HIGH"));
        assert!(reply.contains("Hot fix"));
    }

    #[tokio::test]
    async fn test_plan_day_revenue_goal() {
        let (agent, store) = strategist().await;
        store
            .lock()
            .await
            .add_metric(NewWeeklyMetric {
                revenue: 1200,
                ..NewWeeklyMetric::opening(today())
            })
            .await;
        let plan = agent.plan_day().await;
        assert!(plan.contains("Goal is $1320"));
        assert!(plan.contains("Brainstorm"));
    }

    #[tokio::test]
    async fn test_recommend_mode_balanced_when_empty() {
        let (agent, _) = strategist().await;
        assert!(agent.recommend_mode().await.contains("Balanced load"));
    }
}
