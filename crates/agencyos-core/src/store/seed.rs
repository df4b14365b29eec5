//! Demo data loaded into an empty store and on reset

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::Snapshot;
use crate::entities::{
    AssetKind, ClientStatus, NewAsset, NewClient, NewContentIdea, NewProject, NewTask,
    NewWeeklyMetric, Platform, Priority, Role, TaskStatus,
};

/// Build the demo snapshot with dates relative to `now`
pub fn demo_snapshot(now: DateTime<Utc>) -> Snapshot {
    let today: NaiveDate = now.date_naive();
    let mut data = Snapshot::empty();

    let acme = NewClient::new("John Doe", "Acme Corp", 5000)
        .with_status(ClientStatus::Active)
        .with_email("john@acme.com")
        .into_client();
    let stealth = NewClient::new("StartUp Inc", "Stealth AI", 12000)
        .with_status(ClientStatus::Negotiation)
        .into_client();

    let agency_os = NewProject::new("Agency OS V1")
        .with_deadline(today + Duration::days(30))
        .into_project();
    let website = NewProject::new("Client Website")
        .for_client(acme.id.clone())
        .with_deadline(today + Duration::days(14))
        .into_project();

    data.tasks.push(
        NewTask::new("Build Lean Agency Dashboard")
            .owned_by(Role::Architect)
            .with_status(TaskStatus::InProgress)
            .with_priority(Priority::High)
            .deep()
            .due(now)
            .in_project(Some(agency_os.id.clone()))
            .into_task(),
    );
    data.tasks.push(
        NewTask::new("Update Shop UI")
            .owned_by(Role::Merchant)
            .in_project(Some(website.id.clone()))
            .into_task(),
    );

    data.content.push(
        NewContentIdea::new(
            "How I built my agency in 4 hours",
            Platform::TikTok,
            today + Duration::days(3),
        )
        .with_link("/blueprint")
        .in_batch("A1")
        .into_idea(),
    );

    data.assets.push(
        NewAsset::new("Brand Guide", AssetKind::Document, "gdrive.com/brand")
            .with_keywords(["colors", "fonts"])
            .into_asset(),
    );

    data.metrics.push(
        NewWeeklyMetric {
            revenue: 1200,
            new_users: 45,
            top_item: "Viral TikTok #4".to_string(),
            ..NewWeeklyMetric::opening(today - Duration::days(7))
        }
        .into_metric(),
    );

    data.clients.push(acme);
    data.clients.push(stealth);
    data.projects.push(agency_os);
    data.projects.push(website);
    data
}
