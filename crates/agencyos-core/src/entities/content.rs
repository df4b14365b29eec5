//! Content ideas moving through the studio

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, normalize_key};

/// Content production status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Idea,
    Scripting,
    Filming,
    Editing,
    Posted,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Idea => "idea",
            ContentStatus::Scripting => "scripting",
            ContentStatus::Filming => "filming",
            ContentStatus::Editing => "editing",
            ContentStatus::Posted => "posted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "idea" => Some(ContentStatus::Idea),
            "scripting" => Some(ContentStatus::Scripting),
            "filming" => Some(ContentStatus::Filming),
            "editing" => Some(ContentStatus::Editing),
            "posted" => Some(ContentStatus::Posted),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publishing platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    #[default]
    TikTok,
    YouTube,
    LinkedIn,
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::LinkedIn => "LinkedIn",
            Platform::Web => "Web",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "instagram" | "ig" => Some(Platform::Instagram),
            "tiktok" => Some(Platform::TikTok),
            "youtube" | "yt" => Some(Platform::YouTube),
            "linkedin" => Some(Platform::LinkedIn),
            "web" | "blog" => Some(Platform::Web),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post in the content calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIdea {
    pub id: String,
    /// Scheduled (or actual, once posted) publication date
    pub post_date: NaiveDate,
    pub platform: Platform,
    /// Opening line the post is built around
    pub hook: String,
    /// Landing link the post promotes
    pub link: String,
    pub status: ContentStatus,
    pub batch_id: Option<String>,
}

impl ContentIdea {
    /// Whether the idea still holds a calendar slot
    pub fn is_pending(&self) -> bool {
        self.status != ContentStatus::Posted
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContentIdea {
    pub post_date: NaiveDate,
    pub platform: Platform,
    pub hook: String,
    pub link: String,
    pub status: ContentStatus,
    pub batch_id: Option<String>,
}

impl NewContentIdea {
    /// An unscripted idea for `platform` on `post_date`
    pub fn new(hook: impl Into<String>, platform: Platform, post_date: NaiveDate) -> Self {
        Self {
            post_date,
            platform,
            hook: hook.into(),
            link: String::new(),
            status: ContentStatus::Idea,
            batch_id: None,
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn in_batch(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }

    pub(crate) fn into_idea(self) -> ContentIdea {
        ContentIdea {
            id: new_id(),
            post_date: self.post_date,
            platform: self.platform,
            hook: self.hook,
            link: self.link,
            status: self.status,
            batch_id: self.batch_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
    pub post_date: Option<NaiveDate>,
    pub platform: Option<Platform>,
    pub hook: Option<String>,
    pub link: Option<String>,
    pub status: Option<ContentStatus>,
    pub batch_id: Option<Option<String>>,
}

impl ContentPatch {
    pub(crate) fn merge_into(self, idea: &mut ContentIdea) {
        if let Some(date) = self.post_date {
            idea.post_date = date;
        }
        if let Some(platform) = self.platform {
            idea.platform = platform;
        }
        if let Some(hook) = self.hook {
            idea.hook = hook;
        }
        if let Some(link) = self.link {
            idea.link = link;
        }
        if let Some(status) = self.status {
            idea.status = status;
        }
        if let Some(batch) = self.batch_id {
            idea.batch_id = batch;
        }
    }
}
