//! Ordered rule table mapping free text to an [`Intent`]
//!
//! Rules are evaluated top to bottom against the trimmed input and the first
//! rule that matches wins. Prefix rules come first and require a non-empty
//! argument, then exact phrases, then keyword rules (more specific phrases
//! before the generic ones they contain), then clean desk, the single-word
//! commands and status. When nothing matches the result is [`Intent::Help`].

use super::intent::Intent;
use crate::entities::{Platform, Role};

/// How a rule recognizes its command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Any listed word appears as a whole word
    Words(&'static [&'static str]),
    /// Prefix, at least one whitespace, then a non-empty argument
    Prefix(&'static [&'static str]),
    /// Prefix, at least one `:` or whitespace, then a non-empty argument
    PrefixLoose(&'static [&'static str]),
    /// Whole input equals one of the phrases
    Exact(&'static [&'static str]),
    /// Input contains one of the phrases
    Keyword(&'static [&'static str]),
}

/// Which intent a rule produces once matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Greeting,
    CreateTask,
    CaptureIdea,
    AnalyzeTask,
    Invoice,
    CompleteTask,
    PlanProject,
    PostContent,
    Campaign,
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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub kind: IntentKind,
    pub matcher: Matcher,
}

const fn rule(kind: IntentKind, matcher: Matcher) -> Rule {
    Rule { kind, matcher }
}

/// The command grammar, in evaluation order
pub const RULES: &[Rule] = &[
    // Greeting wins over every prefix rule: "task: say hi" greets
    rule(
        IntentKind::Greeting,
        Matcher::Words(&["hello", "hi", "hey", "ahoj", "cau", "čau", "servus"]),
    ),
    rule(
        IntentKind::CreateTask,
        Matcher::Prefix(&[
            "uloha:",
            "úloha:",
            "task:",
            "pridaj ulohu",
            "new task",
            "task",
            "uloha",
        ]),
    ),
    rule(
        IntentKind::CaptureIdea,
        Matcher::Prefix(&["napada:", "idea:", "napad:", "mam napad", "idea", "napad"]),
    ),
    rule(
        IntentKind::AnalyzeTask,
        Matcher::Prefix(&[
            "analyze:",
            "rozober:",
            "breakdown:",
            "analyzuj",
            "rozober",
            "checkni",
        ]),
    ),
    rule(
        IntentKind::Invoice,
        Matcher::Prefix(&[
            "invoice:",
            "faktura:",
            "bill:",
            "fakturu pre",
            "invoice for",
            "vystav fakturu",
        ]),
    ),
    rule(
        IntentKind::CompleteTask,
        Matcher::PrefixLoose(&["complete", "done", "hotovo", "dokonci", "finish"]),
    ),
    rule(
        IntentKind::PlanProject,
        Matcher::Prefix(&["plan project", "novy projekt", "new project"]),
    ),
    rule(
        IntentKind::PostContent,
        Matcher::Prefix(&["posted:", "published:", "zverejnene:"]),
    ),
    rule(
        IntentKind::Campaign,
        Matcher::Prefix(&["setup campaign", "nova kampan"]),
    ),
    rule(IntentKind::Reset, Matcher::Exact(&["prepare data", "reset data"])),
    rule(
        IntentKind::WeeklyReport,
        Matcher::Keyword(&["weekly report", "tyzdenny report"]),
    ),
    rule(
        IntentKind::DailyBriefing,
        Matcher::Keyword(&["daily briefing", "ranny prehlad", "briefing"]),
    ),
    rule(
        IntentKind::AutoPilot,
        Matcher::Keyword(&["auto pilot", "autopilot", "auto draft", "draft trends"]),
    ),
    rule(
        IntentKind::CheckInvoices,
        Matcher::Keyword(&["check invoices", "pending money", "dlhy"]),
    ),
    rule(
        IntentKind::TrendWatch,
        Matcher::Keyword(&["trend watch", "check trends"]),
    ),
    rule(
        IntentKind::AuditAssets,
        Matcher::Keyword(&["audit assets", "asset audit"]),
    ),
    rule(
        IntentKind::Priorities,
        Matcher::Keyword(&["priorities", "what next"]),
    ),
    rule(
        IntentKind::ContentStats,
        Matcher::Keyword(&["content stats", "studio status"]),
    ),
    rule(
        IntentKind::CleanDesk,
        Matcher::Keyword(&["clean desk", "upratať", "upratat", "cleanup"]),
    ),
    // Single-word commands match whole words only and yield to clean desk
    rule(IntentKind::Forecast, Matcher::Words(&["forecast"])),
    rule(IntentKind::Overdue, Matcher::Words(&["overdue"])),
    rule(IntentKind::Health, Matcher::Words(&["health"])),
    rule(IntentKind::Mode, Matcher::Words(&["mode"])),
    rule(
        IntentKind::Status,
        Matcher::Keyword(&["status", "pulse", "report", "analysis"]),
    ),
    rule(IntentKind::Status, Matcher::Exact(&["info"])),
];

/// Strip `prefix` from the start of `text`, ignoring case
///
/// The remainder keeps the original casing of `text`.
pub fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    match rest.next() {
        Some((idx, _)) => Some(&text[idx..]),
        None => Some(""),
    }
}

/// Argument after a separator run; `None` when the separator or the
/// argument is missing
fn argument_after(rest: &str, loose: bool) -> Option<&str> {
    let is_separator = |c: char| c.is_whitespace() || (loose && c == ':');
    if !rest.starts_with(is_separator) {
        return None;
    }
    let arg = rest.trim_start_matches(is_separator).trim();
    (!arg.is_empty()).then_some(arg)
}

fn has_word(lower: &str, words: &[&str]) -> bool {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}

impl Matcher {
    /// Match against trimmed `text` (and its lowercase form)
    ///
    /// Returns the extracted argument, empty for argument-less matchers.
    pub fn matches<'a>(&self, text: &'a str, lower: &str) -> Option<&'a str> {
        match self {
            Matcher::Words(words) => has_word(lower, words).then_some(""),
            Matcher::Prefix(prefixes) => prefixes
                .iter()
                .filter_map(|p| strip_prefix_ci(text, p))
                .find_map(|rest| argument_after(rest, false)),
            Matcher::PrefixLoose(prefixes) => prefixes
                .iter()
                .filter_map(|p| strip_prefix_ci(text, p))
                .find_map(|rest| argument_after(rest, true)),
            Matcher::Exact(phrases) => phrases.contains(&lower).then_some(""),
            Matcher::Keyword(phrases) => phrases.iter().any(|p| lower.contains(p)).then_some(""),
        }
    }
}

/// Owner for a new task: finance-flavoured work goes to the Merchant
pub fn route_task_owner(text: &str) -> Role {
    let lower = text.to_lowercase();
    if ["faktur", "client", "zmluv", "invoice"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Role::Merchant
    } else {
        Role::Architect
    }
}

/// Platform for a new idea; web keywords win over business keywords
pub fn route_idea_platform(text: &str) -> Platform {
    let lower = text.to_lowercase();
    let any = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));
    if any(&["navrh", "web", "site"]) {
        Platform::Web
    } else if any(&["linkedin", "biznis", "b2b"]) {
        Platform::LinkedIn
    } else {
        Platform::TikTok
    }
}

fn build(kind: IntentKind, arg: &str) -> Intent {
    let arg = arg.to_string();
    match kind {
        IntentKind::Greeting => Intent::Greeting,
        IntentKind::CreateTask => Intent::CreateTask {
            owner: route_task_owner(&arg),
            text: arg,
        },
        IntentKind::CaptureIdea => Intent::CaptureIdea {
            platform: route_idea_platform(&arg),
            text: arg,
        },
        IntentKind::AnalyzeTask => Intent::AnalyzeTask(arg),
        IntentKind::Invoice => Intent::Invoice(arg),
        IntentKind::CompleteTask => Intent::CompleteTask(arg),
        IntentKind::PlanProject => Intent::PlanProject(arg),
        IntentKind::PostContent => Intent::PostContent(arg),
        IntentKind::Campaign => Intent::Campaign(arg),
        IntentKind::Reset => Intent::Reset,
        IntentKind::WeeklyReport => Intent::WeeklyReport,
        IntentKind::DailyBriefing => Intent::DailyBriefing,
        IntentKind::AutoPilot => Intent::AutoPilot,
        IntentKind::CheckInvoices => Intent::CheckInvoices,
        IntentKind::TrendWatch => Intent::TrendWatch,
        IntentKind::Forecast => Intent::Forecast,
        IntentKind::AuditAssets => Intent::AuditAssets,
        IntentKind::Priorities => Intent::Priorities,
        IntentKind::Overdue => Intent::Overdue,
        IntentKind::Health => Intent::Health,
        IntentKind::Mode => Intent::Mode,
        IntentKind::ContentStats => Intent::ContentStats,
        IntentKind::CleanDesk => Intent::CleanDesk,
        IntentKind::Status => Intent::Status,
    }
}

/// Classify free text; first matching rule wins
pub fn classify(text: &str) -> Intent {
    let text = text.trim();
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find_map(|r| r.matcher.matches(text, &lower).map(|arg| build(r.kind, arg)))
        .unwrap_or(Intent::Help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_routing() {
        assert_eq!(
            classify("task: fix login bug"),
            Intent::CreateTask {
                text: "fix login bug".into(),
                owner: Role::Architect
            }
        );
        assert_eq!(
            classify("Pridaj ulohu poslat fakturu Acme"),
            Intent::CreateTask {
                text: "poslat fakturu Acme".into(),
                owner: Role::Merchant
            }
        );
    }

    #[test]
    fn test_argument_keeps_case() {
        assert_eq!(
            classify("ÚLOHA: Call Bob"),
            Intent::CreateTask {
                text: "Call Bob".into(),
                owner: Role::Architect
            }
        );
    }

    #[test]
    fn test_idea_platforms() {
        let platform = |s: &str| match classify(s) {
            Intent::CaptureIdea { platform, .. } => platform,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(platform("idea: AI tools"), Platform::TikTok);
        assert_eq!(platform("napad b2b outreach"), Platform::LinkedIn);
        assert_eq!(platform("mam napad b2b web redesign"), Platform::Web);
    }

    #[test]
    fn test_prefix_needs_argument() {
        assert_eq!(classify("task"), Intent::Help);
        assert_eq!(classify("task:   "), Intent::Help);
        assert_eq!(classify("invoice:"), Intent::Help);
    }

    #[test]
    fn test_prefix_needs_separator() {
        // "tasks" is not "task" followed by an argument
        assert_eq!(classify("tasks overview"), Intent::Help);
    }

    #[test]
    fn test_loose_completion() {
        assert_eq!(
            classify("done:landing page"),
            Intent::CompleteTask("landing page".into())
        );
        assert_eq!(
            classify("Hotovo   databaza"),
            Intent::CompleteTask("databaza".into())
        );
    }

    #[test]
    fn test_invoice_for() {
        assert_eq!(classify("invoice for Acme"), Intent::Invoice("Acme".into()));
    }

    #[test]
    fn test_campaign_beats_keywords() {
        assert_eq!(
            classify("setup campaign status report"),
            Intent::Campaign("status report".into())
        );
    }

    #[test]
    fn test_specific_keywords_first() {
        assert_eq!(classify("send the weekly report"), Intent::WeeklyReport);
        assert_eq!(classify("studio status please"), Intent::ContentStats);
        assert_eq!(classify("status"), Intent::Status);
        assert_eq!(classify("INFO"), Intent::Status);
        assert_eq!(classify("more info"), Intent::Help);
    }

    #[test]
    fn test_single_words_do_not_steal_commands() {
        assert_eq!(classify("cleanup overdue tasks"), Intent::CleanDesk);
        assert_eq!(classify("status of the model launch"), Intent::Status);
        assert_eq!(classify("healthcare client status"), Intent::Status);
        assert_eq!(classify("show overdue"), Intent::Overdue);
        assert_eq!(classify("system health"), Intent::Health);
        assert_eq!(classify("focus mode?"), Intent::Mode);
        assert_eq!(classify("revenue forecast"), Intent::Forecast);
    }

    #[test]
    fn test_greeting_beats_prefixes() {
        assert_eq!(classify("task: say hi to Acme"), Intent::Greeting);
    }

    #[test]
    fn test_exact_reset() {
        assert_eq!(classify("  Reset Data "), Intent::Reset);
        assert_eq!(classify("please reset data"), Intent::Help);
    }

    #[test]
    fn test_greeting_whole_words() {
        assert_eq!(classify("Hi there"), Intent::Greeting);
        assert_eq!(classify("čau"), Intent::Greeting);
        assert_eq!(classify("this archive"), Intent::Help);
    }

    #[test]
    fn test_empty_is_help() {
        assert_eq!(classify(""), Intent::Help);
        assert_eq!(classify("   \t"), Intent::Help);
    }

    #[test]
    fn test_strip_prefix_ci() {
        assert_eq!(strip_prefix_ci("New Task Buy", "new task"), Some(" Buy"));
        assert_eq!(strip_prefix_ci("new", "new task"), None);
        assert_eq!(strip_prefix_ci("task", "task"), Some(""));
    }
}
