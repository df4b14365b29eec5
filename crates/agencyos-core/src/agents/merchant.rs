//! Merchant agent - assets, forecasts and invoicing

use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::info;

use super::AgentType;
use crate::config::MerchantConfig;
use crate::entities::{ClientStatus, fuzzy_contains};
use crate::random::RandomSource;
use crate::store::SharedStore;

pub struct MerchantAgent {
    store: SharedStore,
    random: Arc<dyn RandomSource>,
    config: MerchantConfig,
}

impl MerchantAgent {
    pub fn new(store: SharedStore, random: Arc<dyn RandomSource>, config: MerchantConfig) -> Self {
        Self {
            store,
            random,
            config,
        }
    }

    /// Count assets whose link is missing or a placeholder
    pub async fn audit_assets(&self) -> String {
        let store = self.store.lock().await;
        let assets = store.assets();
        if assets.is_empty() {
            return "📉 **Asset Audit**: Library is empty. Upload brand guides or code snippets."
                .to_string();
        }

        let missing = assets.iter().filter(|a| a.has_placeholder_link()).count();
        let status = if missing == 0 {
            "Clean ✅"
        } else {
            "Needs Review ⚠️"
        };
        format!(
            "💼 **Merchant Audit**:\n- Total Assets: {}\n- Broken/Missing Links: {}\n- Status: {}",
            assets.len(),
            missing,
            status
        )
    }

    /// Weighted pipeline forecast on top of last week's realized revenue
    pub async fn project_revenue(&self) -> String {
        let store = self.store.lock().await;
        let last_week = store.snapshot().latest_metric().map_or(0, |m| m.revenue);

        let mut potential: u64 = 0;
        let mut weighted: f64 = 0.0;
        for client in store.clients() {
            weighted += client.deal_value as f64 * client.status.forecast_weight();
            if matches!(client.status, ClientStatus::Lead | ClientStatus::Negotiation) {
                potential += client.deal_value;
            }
        }
        let weighted = weighted.floor() as u64;

        format!(
            "💰 **Financial Forecast**:\n- 📉 Last Week: ${}\n- 🔮 Weighted Pipeline: **${}**\n- 📊 Projected Total: ${}\n- 🎲 Total Potential: ${}\n\n*Value based on {} deal(s).*",
            last_week,
            weighted,
            weighted + last_week,
            potential + last_week,
            store.clients().len()
        )
    }

    /// Invoice the first client whose name or company matches
    pub async fn generate_invoice(&self, fuzzy_name: &str) -> String {
        let fuzzy_name = fuzzy_name.trim();
        if fuzzy_name.is_empty() {
            return "Which client should I invoice? (e.g., 'Invoice for Acme')".to_string();
        }

        let store = self.store.lock().await;
        let Some(client) = store.clients().iter().find(|c| {
            fuzzy_contains(&c.name, fuzzy_name) || fuzzy_contains(&c.company, fuzzy_name)
        }) else {
            return format!(
                "⚠️ Client \"{}\" not found. Cannot generate invoice.",
                fuzzy_name
            );
        };

        let invoice_id = format!("INV-{}-{}", Utc::now().year(), self.random.below(1000));
        info!(agent = %AgentType::Merchant, client = %client.company, %invoice_id, "Generated invoice");
        format!(
            "📄 **Invoice Generated**\n- Client: {} ({})\n- Amount: **${}**\n- ID: {}\n- Status: Sent ✉️",
            client.company, client.name, client.deal_value, invoice_id
        )
    }

    /// Active clients above the deal threshold, flagged as pending
    pub async fn check_unpaid_invoices(&self) -> String {
        let store = self.store.lock().await;
        let pending: Vec<String> = store
            .clients()
            .iter()
            .filter(|c| {
                c.status == ClientStatus::Active && c.deal_value > self.config.unpaid_threshold
            })
            .map(|c| format!("- **{}**: ${} pending", c.company, c.deal_value))
            .collect();

        if pending.is_empty() {
            return "✅ **Merchant Scan**: All high-value client accounts appear up to date."
                .to_string();
        }
        format!(
            "💸 **Pending Accounts Detected**:\n{}\n\nShall I send a follow-up reminder to these clients?",
            pending.join("\n")
        )
    }
}
