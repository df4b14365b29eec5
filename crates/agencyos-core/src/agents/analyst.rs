//! Analyst agent - health scoring, ledger reports and trend watching

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::AgentType;
use crate::config::AnalystConfig;
use crate::entities::{NewContentIdea, Platform};
use crate::random::RandomSource;
use crate::scheduler::today;
use crate::store::SharedStore;

/// Topics the trend watcher samples from
pub const TREND_POOL: [&str; 6] = [
    "AI Agents for SMBs",
    "Micro-SaaS 2026",
    "React 21 Features",
    "Sustainable Tech",
    "DeepSeek vs OpenAI",
    "Local-First Software",
];

/// Percentage change from `previous` to `current`; `None` when `previous` is 0
pub fn percent_change(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) * 100.0 / previous as f64)
}

fn format_change(change: Option<f64>, up: &str, down: &str) -> String {
    match change {
        Some(pct) if pct >= 0.0 => format!("{} {:+.1}%", up, pct),
        Some(pct) => format!("{} {:+.1}%", down, pct),
        None => "n/a, no baseline".to_string(),
    }
}

pub struct AnalystAgent {
    store: SharedStore,
    random: Arc<dyn RandomSource>,
    config: AnalystConfig,
}

impl AnalystAgent {
    pub fn new(store: SharedStore, random: Arc<dyn RandomSource>, config: AnalystConfig) -> Self {
        Self {
            store,
            random,
            config,
        }
    }

    /// Latest ledger row at a glance
    pub async fn analyze_pulse(&self) -> String {
        let store = self.store.lock().await;
        let Some(latest) = store.snapshot().latest_metric() else {
            return "No sufficient data to analyze trends yet.".to_string();
        };

        let status = if latest.revenue > self.config.healthy_revenue {
            "Healthy 🟢"
        } else {
            "Needs Attention 🔴"
        };
        format!(
            "📊 **Analyst Report**\n- Revenue Status: {} (${})\n- Growth: +{} users\n- Top Performer: \"{}\"",
            status, latest.revenue, latest.new_users, latest.top_item
        )
    }

    /// Week-over-week deltas between the two most recent ledger rows
    pub async fn generate_weekly_report(&self) -> String {
        let store = self.store.lock().await;
        let [.., previous, current] = store.metrics() else {
            return "📊 **Weekly Report**: Not enough historical data yet. Check back next week!"
                .to_string();
        };

        let revenue_change = percent_change(previous.revenue, current.revenue);
        let users_change = percent_change(previous.new_users, current.new_users);
        let insight = if revenue_change.is_some_and(|pct| pct > 5.0) {
            "Momentum is strong. Scale ad spend."
        } else {
            "Growth is stalling. Optimize retention."
        };

        format!(
            "📑 **Weekly Performance Report** (Week Ending {})\n\n---\n💰 **Revenue**: ${} ({})\n👥 **New Users**: {} ({})\n🏆 **Top Content**: \"{}\"\n\n**Analyst Insight**: {}",
            current.week_ending,
            current.revenue,
            format_change(revenue_change, "📈", "📉"),
            current.new_users,
            format_change(users_change, "🚀", "🔻"),
            current.top_item,
            insight
        )
    }

    /// Open tasks whose due date is strictly in the past
    pub async fn overdue_tasks(&self) -> String {
        let store = self.store.lock().await;
        let now = Utc::now();
        let overdue: Vec<String> = store
            .tasks()
            .iter()
            .filter(|t| t.is_overdue(now))
            .map(|t| format!("- {} ({})", t.name, t.owner))
            .collect();

        if overdue.is_empty() {
            return "✅ No overdue tasks found. We are on track.".to_string();
        }
        format!("⚠️ **Overdue Items Detected**:\n{}", overdue.join("\n"))
    }

    /// Score starting at 100 with deductions, banded green/yellow/red
    pub async fn system_health(&self) -> String {
        let store = self.store.lock().await;
        let cfg = &self.config;
        let mut score: i64 = 100;
        let mut report = Vec::new();

        let now = Utc::now();
        let overdue = store.tasks().iter().filter(|t| t.is_overdue(now)).count();
        if overdue > 0 {
            let penalty = (overdue as i64 * i64::from(cfg.overdue_penalty))
                .min(i64::from(cfg.overdue_penalty_cap));
            score -= penalty;
            report.push(format!("⚠️ -{}pts: {} overdue task(s).", penalty, overdue));
        }

        if store.tasks().len() < cfg.thin_pipeline {
            score -= 20;
            report.push(format!(
                "📉 -20pts: Pipeline is thin (<{} items).",
                cfg.thin_pipeline
            ));
        }

        let low_revenue = store
            .snapshot()
            .latest_metric()
            .is_none_or(|m| m.revenue < cfg.low_revenue);
        if low_revenue {
            score -= 10;
            report.push("💸 -10pts: Low revenue momentum.".to_string());
        }

        let score = score.max(0);
        if score == 100 {
            return "🟢 **System Health: 100%**\nPerfect score. You are operating at peak efficiency."
                .to_string();
        }
        let band = match score {
            s if s > 80 => "🟢",
            s if s > 50 => "🟡",
            _ => "🔴",
        };
        format!("{} **System Health: {}%**\n{}", band, score, report.join("\n"))
    }

    /// A random sample of the trend pool
    pub fn raw_trends(&self) -> Vec<String> {
        let mut trends: Vec<String> = TREND_POOL.iter().map(|t| t.to_string()).collect();
        self.random.shuffle(&mut trends);
        trends.truncate(self.config.trend_sample);
        trends
    }

    /// Record one LinkedIn idea per sampled trend
    pub async fn check_trends(&self) -> String {
        let picked = self.raw_trends();
        let mut store = self.store.lock().await;
        let today = today();
        for trend in &picked {
            store
                .add_content(NewContentIdea::new(
                    format!("Trend Watch: Why {} is exploding", trend),
                    Platform::LinkedIn,
                    today,
                ))
                .await;
        }

        info!(agent = %AgentType::Analyst, count = picked.len(), "Recorded trend ideas");
        let list = picked
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "📈 **Trend Watcher Executed**:\nAdded {} new trending topics to your Content Idea list.\n\n{}",
            picked.len(),
            list
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewTask, NewWeeklyMetric};
    use crate::gateway::MemoryGateway;
    use crate::random::{FixedRandom, SeededRandom};
    use crate::store::{EntityStore, StoreOptions};
    use chrono::{Duration, NaiveDate};

    async fn analyst_with(random: Arc<dyn RandomSource>) -> (AnalystAgent, SharedStore) {
        let store = EntityStore::open(
            Arc::new(MemoryGateway::new()),
            random.clone(),
            StoreOptions::default().unseeded(),
        )
        .await
        .into_shared();
        (
            AnalystAgent::new(store.clone(), random, AnalystConfig::default()),
            store,
        )
    }

    async fn analyst() -> (AnalystAgent, SharedStore) {
        analyst_with(Arc::new(FixedRandom::new(100))).await
    }

    fn row(day: u32, revenue: u64, users: u64) -> NewWeeklyMetric {
        NewWeeklyMetric {
            revenue,
            new_users: users,
            top_item: "Post".into(),
            ..NewWeeklyMetric::opening(NaiveDate::from_ymd_opt(2026, 1, day).unwrap())
        }
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(1000, 1200), Some(20.0));
        assert_eq!(percent_change(0, 50), None);
        assert_eq!(format_change(Some(20.0), "📈", "📉"), "📈 +20.0%");
        assert_eq!(format_change(Some(-12.5), "📈", "📉"), "📉 -12.5%");
    }

    #[tokio::test]
    async fn test_weekly_report_delta() {
        let (agent, store) = analyst().await;
        {
            let mut s = store.lock().await;
            s.add_metric(row(9, 1000, 40)).await;
            s.add_metric(row(16, 1200, 50)).await;
        }
        let report = agent.generate_weekly_report().await;
        assert!(report.contains("+20.0%"));
        assert!(report.contains("+25.0%"));
        assert!(report.contains("Momentum is strong"));
    }

    #[tokio::test]
    async fn test_weekly_report_zero_baseline() {
        let (agent, store) = analyst().await;
        {
            let mut s = store.lock().await;
            s.add_metric(row(9, 0, 0)).await;
            s.add_metric(row(16, 300, 5)).await;
        }
        let report = agent.generate_weekly_report().await;
        assert!(report.contains("n/a"));
        assert!(report.contains("Growth is stalling"));
    }

    #[tokio::test]
    async fn test_weekly_report_needs_two_rows() {
        let (agent, store) = analyst().await;
        store.lock().await.add_metric(row(9, 1000, 40)).await;
        assert!(agent.generate_weekly_report().await.contains("Not enough"));
    }

    #[tokio::test]
    async fn test_pulse_bands() {
        let (agent, store) = analyst().await;
        assert!(agent.analyze_pulse().await.starts_with("No sufficient data"));
        store.lock().await.add_metric(row(9, 1000, 40)).await;
        assert!(agent.analyze_pulse().await.contains("Needs Attention"));
        store.lock().await.add_metric(row(16, 1001, 40)).await;
        assert!(agent.analyze_pulse().await.contains("Healthy"));
    }

    #[tokio::test]
    async fn test_health_deductions() {
        let (agent, store) = analyst().await;
        {
            let mut s = store.lock().await;
            let past = Utc::now() - Duration::days(2);
            for i in 0..4 {
                s.add_task(NewTask::new(format!("late {}", i)).due(past)).await;
            }
        }
        // four overdue capped at 30, no metric row -10
        let health = agent.system_health().await;
        assert!(health.starts_with("🟡 **System Health: 60%**"));
        assert!(health.contains("-30pts: 4 overdue"));
    }

    #[tokio::test]
    async fn test_health_empty_store() {
        let (agent, _) = analyst().await;
        let health = agent.system_health().await;
        assert!(health.starts_with("🟡 **System Health: 70%**"));
    }

    #[tokio::test]
    async fn test_health_perfect() {
        let (agent, store) = analyst().await;
        {
            let mut s = store.lock().await;
            for i in 0..3 {
                s.add_task(NewTask::new(format!("t{}", i))).await;
            }
            s.add_metric(row(9, 800, 1)).await;
        }
        assert!(agent.system_health().await.contains("Perfect score"));
    }

    #[tokio::test]
    async fn test_overdue_listing() {
        let (agent, store) = analyst().await;
        assert!(agent.overdue_tasks().await.starts_with("✅"));
        store
            .lock()
            .await
            .add_task(NewTask::new("Late").due(Utc::now() - Duration::hours(1)))
            .await;
        assert!(agent.overdue_tasks().await.contains("- Late (Architect)"));
    }

    #[tokio::test]
    async fn test_trends_sample_distinct_topics() {
        let (agent, store) = analyst_with(Arc::new(SeededRandom::with_seed(7))).await;
        let picked = agent.raw_trends();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|t| TREND_POOL.contains(&t.as_str())));

        let reply = agent.check_trends().await;
        assert!(reply.contains("Added 3 new trending topics"));
        let s = store.lock().await;
        assert_eq!(s.content().len(), 3);
        assert!(s.content()[0].hook.starts_with("Trend Watch: Why "));
    }
}
