//! Classified purpose of a free-text command

use crate::agents::AgentType;
use crate::entities::{Platform, Role};

/// What a command asks for, with its extracted argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    CreateTask { text: String, owner: Role },
    CaptureIdea { text: String, platform: Platform },
    AnalyzeTask(String),
    Invoice(String),
    CompleteTask(String),
    PlanProject(String),
    PostContent(String),
    Campaign(String),
    Reset,
    WeeklyReport,
    DailyBriefing,
    AutoPilot,
    CheckInvoices,
    TrendWatch,
    Forecast,
    AuditAssets,
    Priorities,
    Overdue,
    Health,
    Mode,
    ContentStats,
    CleanDesk,
    Status,
    Help,
}

impl Intent {
    /// Stable name used in logs and JSON output
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::CreateTask { .. } => "create_task",
            Intent::CaptureIdea { .. } => "capture_idea",
            Intent::AnalyzeTask(_) => "analyze_task",
            Intent::Invoice(_) => "invoice",
            Intent::CompleteTask(_) => "complete_task",
            Intent::PlanProject(_) => "plan_project",
            Intent::PostContent(_) => "post_content",
            Intent::Campaign(_) => "campaign",
            Intent::Reset => "reset",
            Intent::WeeklyReport => "weekly_report",
            Intent::DailyBriefing => "daily_briefing",
            Intent::AutoPilot => "auto_pilot",
            Intent::CheckInvoices => "check_invoices",
            Intent::TrendWatch => "trend_watch",
            Intent::Forecast => "forecast",
            Intent::AuditAssets => "audit_assets",
            Intent::Priorities => "priorities",
            Intent::Overdue => "overdue",
            Intent::Health => "health",
            Intent::Mode => "mode",
            Intent::ContentStats => "content_stats",
            Intent::CleanDesk => "clean_desk",
            Intent::Status => "status",
            Intent::Help => "help",
        }
    }

    /// Agent that answers this intent; `None` for interpreter-level replies
    pub fn agent(&self) -> Option<AgentType> {
        match self {
            Intent::AnalyzeTask(_)
            | Intent::CompleteTask(_)
            | Intent::PlanProject(_)
            | Intent::Campaign(_)
            | Intent::Priorities
            | Intent::Mode => Some(AgentType::Strategist),
            Intent::WeeklyReport
            | Intent::DailyBriefing
            | Intent::TrendWatch
            | Intent::Overdue
            | Intent::Health
            | Intent::Status => Some(AgentType::Analyst),
            Intent::CaptureIdea { .. }
            | Intent::PostContent(_)
            | Intent::AutoPilot
            | Intent::ContentStats => Some(AgentType::Creator),
            Intent::Invoice(_)
            | Intent::CheckInvoices
            | Intent::Forecast
            | Intent::AuditAssets => Some(AgentType::Merchant),
            Intent::Greeting
            | Intent::CreateTask { .. }
            | Intent::Reset
            | Intent::CleanDesk
            | Intent::Help => None,
        }
    }

    /// Whether handling this intent may change the store
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Intent::CreateTask { .. }
                | Intent::CaptureIdea { .. }
                | Intent::AnalyzeTask(_)
                | Intent::CompleteTask(_)
                | Intent::PlanProject(_)
                | Intent::PostContent(_)
                | Intent::Campaign(_)
                | Intent::Reset
                | Intent::AutoPilot
                | Intent::TrendWatch
                | Intent::CleanDesk
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
