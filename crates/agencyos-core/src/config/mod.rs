//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the export webhook URL
pub const SHEET_WEBHOOK_ENV: &str = "AGENCYOS_SHEET_WEBHOOK";

/// Agency OS configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub automation: AutomationConfig,
    pub analyst: AnalystConfig,
    pub merchant: MerchantConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file; `None` means `<data_dir>/agencyos/snapshot.json`
    pub snapshot_path: Option<PathBuf>,
    pub save_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

/// Knobs for the automation rules fired by store mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Inclusive lower bound of revenue booked when a task goes live
    pub revenue_min: u64,
    /// Exclusive upper bound of revenue booked when a task goes live
    pub revenue_max: u64,
    /// New users credited to the current week when content is posted
    pub posting_user_bump: u64,
    pub onboarding_deadline_days: i64,
    pub project_deadline_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalystConfig {
    /// Weekly revenue above which the pulse reads healthy
    pub healthy_revenue: u64,
    /// Weekly revenue below which system health is docked
    pub low_revenue: u64,
    pub overdue_penalty: u32,
    pub overdue_penalty_cap: u32,
    /// Pipelines with fewer tasks than this are docked as thin
    pub thin_pipeline: usize,
    pub trend_sample: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    /// Active deals above this value are flagged as pending accounts
    pub unpaid_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub horizon_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            save_timeout_secs: 5,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            revenue_min: 100,
            revenue_max: 500,
            posting_user_bump: 5,
            onboarding_deadline_days: 7,
            project_deadline_days: 14,
        }
    }
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            healthy_revenue: 1000,
            low_revenue: 500,
            overdue_penalty: 10,
            overdue_penalty_cap: 30,
            thin_pipeline: 3,
            trend_sample: 3,
        }
    }
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            unpaid_threshold: 2000,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { horizon_days: 30 }
    }
}

impl StorageConfig {
    /// Resolve the snapshot file location
    pub fn resolved_snapshot_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.snapshot_path {
            return Ok(path.clone());
        }
        let dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join("agencyos");
        Ok(dir.join("snapshot.json"))
    }
}

impl ExportConfig {
    /// Webhook URL from the environment, falling back to the config file
    pub fn resolved_webhook_url(&self) -> Option<String> {
        env::var(SHEET_WEBHOOK_ENV)
            .ok()
            .or_else(|| self.webhook_url.clone())
            .filter(|url| !url.trim().is_empty())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("AGENCYOS_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("agencyos")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.automation.revenue_min >= self.automation.revenue_max {
            return Err(anyhow!(
                "automation.revenue_min ({}) must be below automation.revenue_max ({})",
                self.automation.revenue_min,
                self.automation.revenue_max
            ));
        }
        if self.scheduler.horizon_days == 0 {
            return Err(anyhow!("scheduler.horizon_days must be at least 1"));
        }
        if self.storage.save_timeout_secs == 0 || self.export.timeout_secs == 0 {
            return Err(anyhow!("Gateway timeouts must be at least one second"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "storage.snapshot_path" => Ok(self
                .storage
                .resolved_snapshot_path()?
                .display()
                .to_string()),
            "storage.save_timeout_secs" => Ok(self.storage.save_timeout_secs.to_string()),

            "export.webhook_url" => Ok(self
                .export
                .resolved_webhook_url()
                .unwrap_or_else(|| format!("(not set - export disabled; use {})", SHEET_WEBHOOK_ENV))),
            "export.timeout_secs" => Ok(self.export.timeout_secs.to_string()),

            "automation.revenue_min" => Ok(self.automation.revenue_min.to_string()),
            "automation.revenue_max" => Ok(self.automation.revenue_max.to_string()),
            "automation.posting_user_bump" => Ok(self.automation.posting_user_bump.to_string()),
            "automation.onboarding_deadline_days" => {
                Ok(self.automation.onboarding_deadline_days.to_string())
            }
            "automation.project_deadline_days" => {
                Ok(self.automation.project_deadline_days.to_string())
            }

            "analyst.healthy_revenue" => Ok(self.analyst.healthy_revenue.to_string()),
            "analyst.low_revenue" => Ok(self.analyst.low_revenue.to_string()),
            "analyst.overdue_penalty" => Ok(self.analyst.overdue_penalty.to_string()),
            "analyst.overdue_penalty_cap" => Ok(self.analyst.overdue_penalty_cap.to_string()),
            "analyst.thin_pipeline" => Ok(self.analyst.thin_pipeline.to_string()),
            "analyst.trend_sample" => Ok(self.analyst.trend_sample.to_string()),

            "merchant.unpaid_threshold" => Ok(self.merchant.unpaid_threshold.to_string()),

            "scheduler.horizon_days" => Ok(self.scheduler.horizon_days.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `agencyos config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        fn num<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value: {}", key, value))
        }

        match key {
            "storage.snapshot_path" => {
                self.storage.snapshot_path = Some(PathBuf::from(value));
            }
            "storage.save_timeout_secs" => self.storage.save_timeout_secs = num(key, value)?,

            "export.webhook_url" => {
                let url = value.trim();
                if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(anyhow!("Webhook URL must start with http:// or https://"));
                }
                self.export.webhook_url = (!url.is_empty()).then(|| url.to_string());
            }
            "export.timeout_secs" => self.export.timeout_secs = num(key, value)?,

            "automation.revenue_min" => self.automation.revenue_min = num(key, value)?,
            "automation.revenue_max" => self.automation.revenue_max = num(key, value)?,
            "automation.posting_user_bump" => self.automation.posting_user_bump = num(key, value)?,
            "automation.onboarding_deadline_days" => {
                self.automation.onboarding_deadline_days = num(key, value)?
            }
            "automation.project_deadline_days" => {
                self.automation.project_deadline_days = num(key, value)?
            }

            "analyst.healthy_revenue" => self.analyst.healthy_revenue = num(key, value)?,
            "analyst.low_revenue" => self.analyst.low_revenue = num(key, value)?,
            "analyst.overdue_penalty" => self.analyst.overdue_penalty = num(key, value)?,
            "analyst.overdue_penalty_cap" => self.analyst.overdue_penalty_cap = num(key, value)?,
            "analyst.thin_pipeline" => self.analyst.thin_pipeline = num(key, value)?,
            "analyst.trend_sample" => self.analyst.trend_sample = num(key, value)?,

            "merchant.unpaid_threshold" => self.merchant.unpaid_threshold = num(key, value)?,

            "scheduler.horizon_days" => self.scheduler.horizon_days = num(key, value)?,

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `agencyos config list` to see available keys.",
                    key
                ));
            }
        }
        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "storage.snapshot_path",
            "storage.save_timeout_secs",
            "export.webhook_url",
            "export.timeout_secs",
            "automation.revenue_min",
            "automation.revenue_max",
            "automation.posting_user_bump",
            "automation.onboarding_deadline_days",
            "automation.project_deadline_days",
            "analyst.healthy_revenue",
            "analyst.low_revenue",
            "analyst.overdue_penalty",
            "analyst.overdue_penalty_cap",
            "analyst.thin_pipeline",
            "analyst.trend_sample",
            "merchant.unpaid_threshold",
            "scheduler.horizon_days",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
