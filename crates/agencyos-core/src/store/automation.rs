//! Automation rules fired synchronously inside store mutations
//!
//! Each rule works on the collections directly and is called by the store
//! while it still holds the mutation, so the check and the follow-on writes
//! form one logical step.

use chrono::{Duration, NaiveDate};
use tracing::info;

use super::Snapshot;
use crate::entities::{
    ClientStatus, NewProject, NewTask, NewWeeklyMetric, Priority, ProjectStatus, Role, TaskStatus,
    WeeklyMetric,
};

/// Name marker identifying a client's onboarding project
pub const ONBOARDING_MARKER: &str = "Onboarding";

/// Onboarding task template: (name, owner, priority)
pub const ONBOARDING_TASKS: &[(&str, Role, Priority)] = &[
    ("Send Contract", Role::Merchant, Priority::High),
    ("Setup Slack Channel", Role::Manager, Priority::Medium),
    ("Kickoff Call", Role::Strategist, Priority::High),
];

/// A task entered Live from any other status
pub fn goes_live(old: TaskStatus, new: TaskStatus) -> bool {
    old != TaskStatus::Live && new == TaskStatus::Live
}

/// A client entered Active from any other status
pub fn goes_active(old: ClientStatus, new: ClientStatus) -> bool {
    old != ClientStatus::Active && new == ClientStatus::Active
}

/// Insert `metric` in `week_ending` order, after rows with the same date
///
/// Returns the row's index.
pub(crate) fn insert_metric(metrics: &mut Vec<WeeklyMetric>, metric: WeeklyMetric) -> usize {
    let idx = metrics.partition_point(|m| m.week_ending <= metric.week_ending);
    metrics.insert(idx, metric);
    idx
}

/// Index of the ledger row open for the week containing `today`, opening a
/// new row dated `today` when no row covers that week
pub(crate) fn current_week_row(metrics: &mut Vec<WeeklyMetric>, today: NaiveDate) -> usize {
    if let Some(idx) = metrics.iter().rposition(|m| m.covers(today)) {
        return idx;
    }
    let idx = insert_metric(metrics, NewWeeklyMetric::opening(today).into_metric());
    info!(week_ending = %today, "Opened ledger row for current week");
    idx
}

/// Book `amount` of revenue on the current week's row
pub(crate) fn credit_revenue(metrics: &mut Vec<WeeklyMetric>, amount: u64, today: NaiveDate) {
    let idx = current_week_row(metrics, today);
    let row = &mut metrics[idx];
    row.revenue = row.revenue.saturating_add(amount);
    info!(amount, week_ending = %row.week_ending, total = row.revenue, "Booked revenue for completed task");
}

/// Credit `users` new users to the current week and record the top item
pub(crate) fn credit_new_users(
    metrics: &mut Vec<WeeklyMetric>,
    users: u64,
    top_item: &str,
    today: NaiveDate,
) {
    let idx = current_week_row(metrics, today);
    let row = &mut metrics[idx];
    row.new_users = row.new_users.saturating_add(users);
    row.top_item = top_item.to_string();
}

/// Re-derive a project's completion from its linked tasks
///
/// Done holds iff the project has at least one task and all of them are Live.
/// Returns the `(old, new)` status pair when it changed.
pub(crate) fn derive_project_status(
    data: &mut Snapshot,
    project_id: &str,
) -> Option<(ProjectStatus, ProjectStatus)> {
    let (linked, live) = data
        .project_tasks(project_id)
        .fold((0usize, 0usize), |(n, live), t| {
            (n + 1, live + usize::from(t.status == TaskStatus::Live))
        });
    let complete = linked > 0 && live == linked;

    let project = data.projects.iter_mut().find(|p| p.id == project_id)?;
    let old = project.status;
    let new = match (complete, old) {
        (true, _) => ProjectStatus::Done,
        (false, ProjectStatus::Done) => ProjectStatus::Active,
        (false, other) => other,
    };
    if new == old {
        return None;
    }

    project.status = new;
    info!(project = %project.name, from = %old, to = %new, linked, live, "Derived project status");
    Some((old, new))
}

/// Create the onboarding project and its task template for a newly active
/// client, unless one already exists
///
/// Returns the new project's id, or `None` when the client is unknown or
/// already onboarded.
pub(crate) fn onboard_client(
    data: &mut Snapshot,
    client_id: &str,
    today: NaiveDate,
    deadline_days: i64,
) -> Option<String> {
    let company = data.client(client_id)?.company.clone();

    let already_onboarded = data.projects.iter().any(|p| {
        p.client_id.as_deref() == Some(client_id) && p.name.contains(ONBOARDING_MARKER)
    });
    if already_onboarded {
        info!(client = %company, "Client re-activated; onboarding already exists");
        return None;
    }

    let project = NewProject::new(format!("{} {}", company, ONBOARDING_MARKER))
        .for_client(client_id)
        .with_deadline(today + Duration::days(deadline_days))
        .into_project();
    let project_id = project.id.clone();
    data.projects.push(project);

    for (name, owner, priority) in ONBOARDING_TASKS {
        let task = NewTask::new(*name)
            .owned_by(*owner)
            .with_priority(*priority)
            .in_project(Some(project_id.clone()))
            .into_task();
        data.tasks.push(task);
    }

    info!(client = %company, tasks = ONBOARDING_TASKS.len(), "Created onboarding scaffold");
    Some(project_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewClient, TaskPatch};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project_with_tasks(statuses: &[TaskStatus]) -> (Snapshot, String) {
        let mut data = Snapshot::empty();
        let project = NewProject::new("Omega").into_project();
        let id = project.id.clone();
        data.projects.push(project);
        for (i, status) in statuses.iter().enumerate() {
            data.tasks.push(
                NewTask::new(format!("step {}", i))
                    .with_status(*status)
                    .in_project(Some(id.clone()))
                    .into_task(),
            );
        }
        (data, id)
    }

    #[test]
    fn test_transitions() {
        assert!(goes_live(TaskStatus::Testing, TaskStatus::Live));
        assert!(!goes_live(TaskStatus::Live, TaskStatus::Live));
        assert!(goes_active(ClientStatus::Lead, ClientStatus::Active));
        assert!(!goes_active(ClientStatus::Active, ClientStatus::Active));
    }

    #[test]
    fn test_insert_keeps_week_order() {
        let mut metrics = vec![NewWeeklyMetric::opening(date(2026, 1, 16)).into_metric()];
        let idx = insert_metric(
            &mut metrics,
            NewWeeklyMetric::opening(date(2026, 1, 9)).into_metric(),
        );
        assert_eq!(idx, 0);
        assert_eq!(metrics[1].week_ending, date(2026, 1, 16));
    }

    #[test]
    fn test_credit_finds_covering_row_before_tail() {
        let mut metrics = vec![
            NewWeeklyMetric::opening(date(2026, 1, 14)).into_metric(),
            NewWeeklyMetric::opening(date(2026, 1, 21)).into_metric(),
        ];
        credit_revenue(&mut metrics, 300, date(2026, 1, 15));
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].revenue, 300);
    }

    #[test]
    fn test_credit_opens_row_for_new_week() {
        let mut metrics = vec![NewWeeklyMetric::opening(date(2026, 1, 9)).into_metric()];
        credit_revenue(&mut metrics, 250, date(2026, 1, 14));
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[1].week_ending, date(2026, 1, 14));
        assert_eq!(metrics[1].revenue, 250);
        assert_eq!(metrics[0].revenue, 0);
    }

    #[test]
    fn test_credit_accumulates_within_week() {
        let mut metrics = Vec::new();
        credit_revenue(&mut metrics, 100, date(2026, 1, 12));
        credit_revenue(&mut metrics, 150, date(2026, 1, 15));
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].revenue, 250);
    }

    #[test]
    fn test_project_done_iff_all_live() {
        let (mut data, id) = project_with_tasks(&[TaskStatus::Live, TaskStatus::Backlog]);
        assert_eq!(derive_project_status(&mut data, &id), None);

        let pending = data.tasks[1].id.clone();
        let task = data.tasks.iter_mut().find(|t| t.id == pending).unwrap();
        TaskPatch::status(TaskStatus::Live).merge_into(task);
        assert_eq!(
            derive_project_status(&mut data, &id),
            Some((ProjectStatus::Active, ProjectStatus::Done))
        );

        data.tasks[0].status = TaskStatus::Testing;
        assert_eq!(
            derive_project_status(&mut data, &id),
            Some((ProjectStatus::Done, ProjectStatus::Active))
        );
    }

    #[test]
    fn test_project_without_tasks_is_never_done() {
        let (mut data, id) = project_with_tasks(&[]);
        data.projects[0].status = ProjectStatus::Done;
        assert_eq!(
            derive_project_status(&mut data, &id),
            Some((ProjectStatus::Done, ProjectStatus::Active))
        );
    }

    #[test]
    fn test_on_hold_kept_until_complete() {
        let (mut data, id) = project_with_tasks(&[TaskStatus::Backlog]);
        data.projects[0].status = ProjectStatus::OnHold;
        assert_eq!(derive_project_status(&mut data, &id), None);
        assert_eq!(data.projects[0].status, ProjectStatus::OnHold);
    }

    #[test]
    fn test_onboarding_is_created_once() {
        let mut data = Snapshot::empty();
        let client = NewClient::new("Jane", "Globex", 8000).into_client();
        let client_id = client.id.clone();
        data.clients.push(client);

        let project_id = onboard_client(&mut data, &client_id, date(2026, 1, 10), 7).unwrap();
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.projects[0].name, "Globex Onboarding");
        assert_eq!(data.projects[0].deadline, Some(date(2026, 1, 17)));
        assert_eq!(data.project_tasks(&project_id).count(), ONBOARDING_TASKS.len());

        assert!(onboard_client(&mut data, &client_id, date(2026, 2, 1), 7).is_none());
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.tasks.len(), ONBOARDING_TASKS.len());
    }

    #[test]
    fn test_onboarding_unknown_client() {
        let mut data = Snapshot::empty();
        assert!(onboard_client(&mut data, "ghost", date(2026, 1, 10), 7).is_none());
        assert!(data.projects.is_empty());
    }
}
