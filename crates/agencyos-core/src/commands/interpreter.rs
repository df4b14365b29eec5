//! Command interpreter - free text in, reply text out
//!
//! One `interpret` call runs under the command gate, so the store never
//! sees two commands interleave. Composite workflows re-dispatch internally
//! while still holding the gate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::intent::Intent;
use super::rules::classify;
use crate::agents::{AnalystAgent, CreatorAgent, MerchantAgent, StrategistAgent};
use crate::config::Config;
use crate::entities::{NewTask, Platform};
use crate::error::{Error, Result};
use crate::gateway::SheetGateway;
use crate::random::{RandomSource, SeededRandom};
use crate::store::SharedStore;

/// Fixed command the campaign workflow runs as its second step
pub const AUTO_PILOT_COMMAND: &str = "auto pilot";

pub const GREETING: &str = "👋 Ahoj! This is your Agency OS. What are we working on today?";

pub const HELP: &str = "🤖 **Manager**: Try writing naturally:\n\
- \"task: call the accountant\" / \"uloha kupit mlieko\"\n\
- \"idea: video about AI agents\" / \"napad na b2b post\"\n\
- \"analyze: login page\" / \"rozober onboarding\"\n\
- \"invoice for Acme\" / \"faktura: Google\"\n\
- \"done landing page\" / \"posted: AI agents\"\n\
- \"plan project Omega\" / \"setup campaign Spring Launch\"\n\
- \"daily briefing\", \"weekly report\", \"auto pilot\", \"check invoices\", \"clean desk\", \"status\"";

const SAVE_FAILED_NOTE: &str =
    "\n\n⚠️ _Changes are kept in memory but could not be saved. Check the storage settings._";

type BoxedReply<'a> = Pin<Box<dyn Future<Output = String> + Send + 'a>>;

/// Wires the store and the agents; every collaborator must be supplied
#[derive(Default)]
pub struct InterpreterBuilder {
    store: Option<SharedStore>,
    sheet: Option<Arc<dyn SheetGateway>>,
    random: Option<Arc<dyn RandomSource>>,
    config: Config,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sheet(mut self, sheet: Arc<dyn SheetGateway>) -> Self {
        self.sheet = Some(sheet);
        self
    }

    /// Random source for trend sampling and invoice numbers
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Fails with [`Error::MissingCollaborator`] when the store or the export
    /// gateway was not supplied
    pub fn build(self) -> Result<Interpreter> {
        let store = self.store.ok_or(Error::MissingCollaborator("entity store"))?;
        let sheet = self
            .sheet
            .ok_or(Error::MissingCollaborator("sheet export gateway"))?;
        let random = self
            .random
            .unwrap_or_else(|| Arc::new(SeededRandom::from_entropy()));
        let config = self.config;

        Ok(Interpreter {
            strategist: StrategistAgent::new(store.clone()),
            analyst: AnalystAgent::new(store.clone(), random.clone(), config.analyst.clone()),
            creator: CreatorAgent::new(store.clone(), sheet)
                .with_horizon(config.scheduler.horizon_days)
                .with_export_timeout(Duration::from_secs(config.export.timeout_secs)),
            merchant: MerchantAgent::new(store.clone(), random, config.merchant.clone()),
            store,
            gate: Mutex::new(()),
        })
    }
}

pub struct Interpreter {
    store: SharedStore,
    strategist: StrategistAgent,
    analyst: AnalystAgent,
    creator: CreatorAgent,
    merchant: MerchantAgent,
    gate: Mutex<()>,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// Shared store handle
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Answer one free-text command; always returns a reply
    pub async fn interpret(&self, text: &str) -> String {
        let _gate = self.gate.lock().await;
        let intent = classify(text);
        debug!(intent = %intent, agent = ?intent.agent(), "Classified command");

        let mutates = intent.mutates();
        let mut reply = self.dispatch(intent).await;
        if mutates && self.store.lock().await.take_save_failure() {
            reply.push_str(SAVE_FAILED_NOTE);
        }
        reply
    }

    fn dispatch(&self, intent: Intent) -> BoxedReply<'_> {
        Box::pin(async move {
            match intent {
                Intent::Greeting => GREETING.to_string(),
                Intent::Help => HELP.to_string(),
                Intent::CreateTask { text, owner } => {
                    self.store
                        .lock()
                        .await
                        .add_task(NewTask::new(text.clone()).owned_by(owner))
                        .await;
                    format!(
                        "✅ **Manager**: Task saved.\n- Brief: \"{}\"\n- Assigned: **{}**",
                        text, owner
                    )
                }
                Intent::CaptureIdea { text, platform } => {
                    self.creator.capture_idea(&text, platform).await
                }
                Intent::AnalyzeTask(name) => self.strategist.analyze_task(&name).await,
                Intent::Invoice(name) => self.merchant.generate_invoice(&name).await,
                Intent::CompleteTask(name) => self.strategist.complete_task(&name).await,
                Intent::PlanProject(name) => self.strategist.scaffold_project(&name).await,
                Intent::PostContent(name) => self.creator.post_content(&name).await,
                Intent::Campaign(name) => {
                    let project = self.strategist.scaffold_project(&name).await;
                    let automation = self.dispatch(classify(AUTO_PILOT_COMMAND)).await;
                    format!(
                        "⚡ **Workflow \"Campaign Sprint\" Executed**\n\n{}\n\n{}\n\n**Next Step**: Your pipeline is primed for \"{}\".",
                        project, automation, name
                    )
                }
                Intent::Reset => {
                    self.store.lock().await.reset().await;
                    "♻️ **System Reset**: Data cleared and re-seeded.".to_string()
                }
                Intent::WeeklyReport => self.analyst.generate_weekly_report().await,
                Intent::DailyBriefing => self.daily_briefing().await,
                Intent::AutoPilot => self.auto_pilot().await,
                Intent::CheckInvoices => self.merchant.check_unpaid_invoices().await,
                Intent::TrendWatch => self.analyst.check_trends().await,
                Intent::Forecast => self.merchant.project_revenue().await,
                Intent::AuditAssets => self.merchant.audit_assets().await,
                Intent::Priorities => self.strategist.suggest_priorities().await,
                Intent::Overdue => self.analyst.overdue_tasks().await,
                Intent::Health => self.analyst.system_health().await,
                Intent::Mode => self.strategist.recommend_mode().await,
                Intent::ContentStats => self.creator.content_stats().await,
                Intent::CleanDesk => {
                    let summary = self.store.lock().await.clean_desk().await;
                    format!(
                        "🧹 **Clean Desk Protocol**:\nArchived {} completed tasks and {} posted content items. Pipeline is clean.",
                        summary.tasks, summary.content
                    )
                }
                Intent::Status => self.analyst.analyze_pulse().await,
            }
        })
    }

    async fn daily_briefing(&self) -> String {
        let health = self.analyst.system_health().await;
        let pulse = self.analyst.analyze_pulse().await;
        let overdue = self.analyst.overdue_tasks().await;
        let plan = self.strategist.plan_day().await;
        format!(
            "🌅 **Daily Briefing**\n\n{}\n\n{}\n\n{}\n\n**Strategy**:\n{}",
            health, pulse, overdue, plan
        )
    }

    /// Draft one post per sampled trend; video-flavoured trends go to TikTok
    async fn auto_pilot(&self) -> String {
        let trends = self.analyst.raw_trends();
        let mut lines = Vec::with_capacity(trends.len());
        for trend in &trends {
            let lower = trend.to_lowercase();
            let platform = if lower.contains("video") || lower.contains("short") {
                Platform::TikTok
            } else {
                Platform::LinkedIn
            };
            self.creator.capture_idea(trend, platform).await;
            lines.push(format!("- Drafted for **{}**: \"{}\"", platform, trend));
        }

        info!(drafts = lines.len(), "Auto-pilot drafted trend posts");
        format!(
            "🤖 **Auto-Pilot Executed**\nI've analyzed the market and drafted {} new posts based on active trends:\n\n{}\n\nCheck your **Content Engine** or the export sheet for details.",
            lines.len(),
            lines.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryGateway, RecordingSheetGateway};
    use crate::random::FixedRandom;
    use crate::store::{EntityStore, StoreOptions};

    async fn shared_store() -> SharedStore {
        EntityStore::open(
            Arc::new(MemoryGateway::new()),
            Arc::new(FixedRandom::new(200)),
            StoreOptions::default().unseeded(),
        )
        .await
        .into_shared()
    }

    #[tokio::test]
    async fn test_build_requires_store() {
        let err = Interpreter::builder()
            .sheet(Arc::new(RecordingSheetGateway::accepting()))
            .build()
            .err()
            .unwrap();
        assert_eq!(err.code(), "E001");
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_build_requires_sheet() {
        let err = Interpreter::builder()
            .store(shared_store().await)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingCollaborator("sheet export gateway")));
    }

    #[tokio::test]
    async fn test_greeting_and_help() {
        let interpreter = Interpreter::builder()
            .store(shared_store().await)
            .sheet(Arc::new(RecordingSheetGateway::accepting()))
            .build()
            .unwrap();
        assert_eq!(interpreter.interpret("ahoj").await, GREETING);
        assert_eq!(interpreter.interpret("").await, HELP);
    }

    #[tokio::test]
    async fn test_task_reply_names_role() {
        let store = shared_store().await;
        let interpreter = Interpreter::builder()
            .store(store.clone())
            .sheet(Arc::new(RecordingSheetGateway::accepting()))
            .build()
            .unwrap();
        let reply = interpreter.interpret("new task send client contract").await;
        assert!(reply.contains("**Merchant**"));
        assert_eq!(store.lock().await.tasks()[0].name, "send client contract");
    }
}
