//! Spreadsheet-style export of drafted content

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// One exported content row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub date: String,
    pub platform: String,
    pub idea: String,
    pub script: String,
    pub status: String,
}

impl ExportRow {
    /// A freshly drafted row
    pub fn draft(
        date: impl Into<String>,
        platform: impl Into<String>,
        idea: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            platform: platform.into(),
            idea: idea.into(),
            script: script.into(),
            status: "Draft".to_string(),
        }
    }
}

/// Appends rows to an external sheet
///
/// Implementations never fail loudly: `false` covers a disabled export,
/// a rejected row and a transport error alike.
#[async_trait]
pub trait SheetGateway: Send + Sync {
    async fn append_row(&self, row: &ExportRow) -> bool;
}

/// Export switched off (no endpoint configured)
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSheetGateway;

#[async_trait]
impl SheetGateway for DisabledSheetGateway {
    async fn append_row(&self, _row: &ExportRow) -> bool {
        false
    }
}

/// POSTs each row as JSON to a webhook (e.g. a sheet's script endpoint)
#[derive(Debug, Clone)]
pub struct WebhookSheetGateway {
    client: reqwest::Client,
    url: String,
}

impl WebhookSheetGateway {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, row: &ExportRow) -> Result<()> {
        let response = self.client.post(&self.url).json(row).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ExportFailed(format!("webhook answered {}", status)));
        }
        Ok(())
    }
}

#[async_trait]
impl SheetGateway for WebhookSheetGateway {
    async fn append_row(&self, row: &ExportRow) -> bool {
        match self.post(row).await {
            Ok(()) => {
                info!(date = %row.date, platform = %row.platform, "Exported draft to sheet");
                true
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "Sheet export failed");
                false
            }
        }
    }
}

/// Captures rows in memory; answers with a fixed outcome
#[derive(Debug)]
pub struct RecordingSheetGateway {
    rows: Mutex<Vec<ExportRow>>,
    accept: bool,
}

impl RecordingSheetGateway {
    pub fn accepting() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            accept: true,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            accept: false,
        }
    }

    pub fn rows(&self) -> Vec<ExportRow> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SheetGateway for RecordingSheetGateway {
    async fn append_row(&self, row: &ExportRow) -> bool {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        self.accept
    }
}

/// Pick the export gateway for `config`
///
/// A missing or unusable webhook is the valid "disabled" state.
pub fn sheet_gateway_from_config(config: &Config) -> Arc<dyn SheetGateway> {
    let Some(url) = config.export.resolved_webhook_url() else {
        warn!("Sheet export not configured; drafts will not be exported");
        return Arc::new(DisabledSheetGateway);
    };

    match WebhookSheetGateway::new(url, Duration::from_secs(config.export.timeout_secs)) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            warn!(error = %e, "Could not build sheet export client; export disabled");
            Arc::new(DisabledSheetGateway)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_returns_false() {
        let row = ExportRow::draft("2026-01-20", "TikTok", "AI agents", "script");
        assert!(!DisabledSheetGateway.append_row(&row).await);
    }

    #[tokio::test]
    async fn test_recording_keeps_rows() {
        let gateway = RecordingSheetGateway::rejecting();
        let row = ExportRow::draft("2026-01-20", "Web", "Launch", "body");
        assert!(!gateway.append_row(&row).await);
        assert_eq!(gateway.rows(), vec![row]);
    }

    #[test]
    fn test_row_serializes_with_sheet_headers() {
        let row = ExportRow::draft("2026-01-20", "LinkedIn", "Idea", "Script");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Date"], "2026-01-20");
        assert_eq!(json["Status"], "Draft");
    }

    #[tokio::test]
    async fn test_unreachable_webhook_returns_false() {
        let gateway =
            WebhookSheetGateway::new("http://127.0.0.1:9/hook", Duration::from_millis(200)).unwrap();
        let row = ExportRow::draft("2026-01-20", "Web", "Launch", "body");
        assert!(!gateway.append_row(&row).await);
    }
}
