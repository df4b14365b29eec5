//! Creator agent - drafting, scheduling and publishing content

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::AgentType;
use crate::entities::{ContentPatch, ContentStatus, NewContentIdea, Platform, fuzzy_contains};
use crate::error::Error;
use crate::gateway::{ExportRow, SheetGateway};
use crate::scheduler::{DEFAULT_HORIZON_DAYS, next_available_date, today};
use crate::store::SharedStore;

/// Platform-specific draft for `idea`
pub fn draft_script(idea: &str, platform: Platform) -> String {
    match platform {
        Platform::TikTok | Platform::Instagram | Platform::YouTube => {
            let teaser: String = idea.chars().take(20).collect();
            format!(
                "**Hook**: \"{}... (Wait for it)\"\n**Body**: 3 Quick tips about {}.\n**CTA**: \"Follow for more!\"",
                teaser, idea
            )
        }
        Platform::LinkedIn => format!(
            "**Hook**: \"Unpopular opinion about {}...\"\n**Body**: detailed breakdown of why this matters for B2B.\n**CTA**: \"What do you think? 👇\"",
            idea
        ),
        Platform::Web => format!(
            "**Headline**: \"{}\"\n**Section 1**: Introduction\n**Section 2**: Deep Dive\n**CTA**: \"Subscribe\"",
            idea
        ),
    }
}

fn render_draft(header: &str, saved: bool, date: NaiveDate, platform: Platform, draft: &str) -> String {
    let sheet = if saved {
        "✅ **Saved to Sheet**"
    } else {
        "⚠️ **Not Saved to Sheet** (check export settings)"
    };
    format!(
        "{}\n{}\n📅 **Date**: {}\n📱 **Platform**: {}\n\n{}\n",
        header, sheet, date, platform, draft
    )
}

pub struct CreatorAgent {
    store: SharedStore,
    sheet: Arc<dyn SheetGateway>,
    horizon_days: u32,
    export_timeout: Duration,
}

impl CreatorAgent {
    pub fn new(store: SharedStore, sheet: Arc<dyn SheetGateway>) -> Self {
        Self {
            store,
            sheet,
            horizon_days: DEFAULT_HORIZON_DAYS,
            export_timeout: Duration::from_secs(10),
        }
    }

    /// Number of days scanned for a free posting slot
    pub fn with_horizon(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    async fn next_slot(&self) -> NaiveDate {
        let store = self.store.lock().await;
        next_available_date(store.content(), today(), self.horizon_days)
    }

    async fn export(&self, row: &ExportRow) -> bool {
        match tokio::time::timeout(self.export_timeout, self.sheet.append_row(row)).await {
            Ok(saved) => saved,
            Err(_) => {
                let e = Error::GatewayTimeout(self.export_timeout.as_secs());
                warn!(error = %e, code = e.code(), "Sheet export timed out");
                false
            }
        }
    }

    /// Draft `idea` for the next free day and export it
    ///
    /// Export failure only changes the marker in the reply.
    pub async fn draft_content(&self, idea: &str, platform: Platform) -> String {
        let date = self.next_slot().await;
        let draft = draft_script(idea, platform);
        let saved = self
            .export(&ExportRow::draft(date.to_string(), platform.as_str(), idea, &draft))
            .await;
        render_draft("💡 **Idea Drafted!**", saved, date, platform, &draft)
    }

    /// Draft `idea`, export it and record it on the drafted date
    pub async fn capture_idea(&self, idea: &str, platform: Platform) -> String {
        let date = self.next_slot().await;
        let draft = draft_script(idea, platform);
        let saved = self
            .export(&ExportRow::draft(date.to_string(), platform.as_str(), idea, &draft))
            .await;

        self.store
            .lock()
            .await
            .add_content(NewContentIdea::new(idea, platform, date))
            .await;
        info!(agent = %AgentType::Creator, %platform, %date, exported = saved, "Captured content idea");

        render_draft("💡 **Idea Saved & Drafted!**", saved, date, platform, &draft)
    }

    /// Mark the first pending idea matching `fuzzy_name` as posted today
    pub async fn post_content(&self, fuzzy_name: &str) -> String {
        let fuzzy_name = fuzzy_name.trim();
        if fuzzy_name.is_empty() {
            return "Which content did you post? (e.g., 'Posted viral video')".to_string();
        }

        let mut store = self.store.lock().await;
        let Some(idea) = store
            .content()
            .iter()
            .find(|c| c.is_pending() && fuzzy_contains(&c.hook, fuzzy_name))
            .cloned()
        else {
            return format!(
                "🤔 I couldn't find a pending content idea matching \"{}\".",
                fuzzy_name
            );
        };

        store
            .update_content(
                &idea.id,
                ContentPatch {
                    status: Some(ContentStatus::Posted),
                    post_date: Some(today()),
                    ..Default::default()
                },
            )
            .await;
        let bump = store.automation().posting_user_bump;
        store.credit_new_users(bump, &idea.hook).await;

        format!(
            "🎨 **Published**: \"{}\" is now Live! (+{} New Users estimated)",
            idea.hook, bump
        )
    }

    /// Counts of raw ideas and posted content
    pub async fn content_stats(&self) -> String {
        let store = self.store.lock().await;
        let ideas = store
            .content()
            .iter()
            .filter(|c| c.status == ContentStatus::Idea)
            .count();
        let posted = store
            .content()
            .iter()
            .filter(|c| c.status == ContentStatus::Posted)
            .count();
        format!("🎨 **Studio Status**:\n- 📝 Ideas: {}\n- 🚀 Posted: {}", ideas, posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryGateway, RecordingSheetGateway};
    use crate::random::FixedRandom;
    use crate::store::{EntityStore, StoreOptions};
    use async_trait::async_trait;
    use chrono::Duration as Days;

    async fn creator(sheet: Arc<dyn SheetGateway>) -> (CreatorAgent, SharedStore) {
        let store = EntityStore::open(
            Arc::new(MemoryGateway::new()),
            Arc::new(FixedRandom::new(100)),
            StoreOptions::default().unseeded(),
        )
        .await
        .into_shared();
        (CreatorAgent::new(store.clone(), sheet), store)
    }

    struct StalledSheet;

    #[async_trait]
    impl SheetGateway for StalledSheet {
        async fn append_row(&self, _row: &ExportRow) -> bool {
            std::future::pending::<()>().await;
            true
        }
    }

    #[test]
    fn test_tiktok_teaser_is_char_safe() {
        let draft = draft_script("Čau čau, tu je náš nový produkt", Platform::TikTok);
        assert!(draft.starts_with("**Hook**: \"Čau čau, tu je náš n... (Wait for it)\""));
    }

    #[test]
    fn test_templates_differ_by_platform() {
        assert!(draft_script("AI", Platform::LinkedIn).contains("Unpopular opinion about AI"));
        assert!(draft_script("AI", Platform::Web).starts_with("**Headline**: \"AI\""));
    }

    #[tokio::test]
    async fn test_capture_exports_and_records() {
        let sheet = Arc::new(RecordingSheetGateway::accepting());
        let (agent, store) = creator(sheet.clone()).await;

        let reply = agent.capture_idea("AI for dentists", Platform::TikTok).await;
        assert!(reply.contains("✅ **Saved to Sheet**"));

        let tomorrow = today() + Days::days(1);
        let rows = sheet.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, tomorrow.to_string());
        assert_eq!(rows[0].platform, "TikTok");

        let s = store.lock().await;
        assert_eq!(s.content()[0].post_date, tomorrow);
    }

    #[tokio::test]
    async fn test_consecutive_captures_take_distinct_days() {
        let (agent, store) = creator(Arc::new(RecordingSheetGateway::accepting())).await;
        agent.capture_idea("one", Platform::Web).await;
        agent.capture_idea("two", Platform::Web).await;
        let s = store.lock().await;
        assert_ne!(s.content()[0].post_date, s.content()[1].post_date);
    }

    #[tokio::test]
    async fn test_rejected_export_still_answers() {
        let (agent, store) = creator(Arc::new(RecordingSheetGateway::rejecting())).await;
        let reply = agent.draft_content("Launch", Platform::LinkedIn).await;
        assert!(reply.contains("Not Saved to Sheet"));
        assert!(store.lock().await.content().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_export_times_out() {
        let (agent, _) = creator(Arc::new(StalledSheet)).await;
        let agent = agent.with_export_timeout(Duration::from_secs(2));
        let reply = agent.draft_content("Launch", Platform::Web).await;
        assert!(reply.contains("Not Saved to Sheet"));
    }

    #[tokio::test]
    async fn test_post_content_bumps_current_week() {
        let (agent, store) = creator(Arc::new(RecordingSheetGateway::accepting())).await;
        agent.capture_idea("Viral reel about coffee", Platform::TikTok).await;

        let reply = agent.post_content("coffee").await;
        assert!(reply.contains("+5 New Users"));

        let s = store.lock().await;
        assert_eq!(s.content()[0].status, ContentStatus::Posted);
        assert_eq!(s.content()[0].post_date, today());
        assert_eq!(s.metrics().len(), 1);
        assert_eq!(s.metrics()[0].new_users, 5);
        assert_eq!(s.metrics()[0].top_item, "Viral reel about coffee");
    }

    #[tokio::test]
    async fn test_post_content_not_found() {
        let (agent, _) = creator(Arc::new(RecordingSheetGateway::accepting())).await;
        let reply = agent.post_content("ghost").await;
        assert!(reply.starts_with("🤔"));
    }

    #[tokio::test]
    async fn test_content_stats() {
        let (agent, _) = creator(Arc::new(RecordingSheetGateway::accepting())).await;
        agent.capture_idea("a", Platform::Web).await;
        agent.capture_idea("b", Platform::Web).await;
        agent.post_content("a").await;
        assert_eq!(
            agent.content_stats().await,
            "🎨 **Studio Status**:\n- 📝 Ideas: 1\n- 🚀 Posted: 1"
        );
    }
}
