//! Brand and code assets in the library

use serde::{Deserialize, Serialize};

use super::{new_id, normalize_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Logo,
    Code,
    Video,
    #[default]
    Document,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Code => "code",
            AssetKind::Video => "video",
            AssetKind::Document => "document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "logo" => Some(AssetKind::Logo),
            "code" => Some(AssetKind::Code),
            "video" => Some(AssetKind::Video),
            "document" | "doc" => Some(AssetKind::Document),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
    pub link: String,
    pub keywords: Vec<String>,
}

impl Asset {
    /// Empty or `#` links are placeholders left over from drafting
    pub fn has_placeholder_link(&self) -> bool {
        let link = self.link.trim();
        link.is_empty() || link == "#"
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub kind: AssetKind,
    pub link: String,
    pub keywords: Vec<String>,
}

impl NewAsset {
    pub fn new(name: impl Into<String>, kind: AssetKind, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            link: link.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_asset(self) -> Asset {
        Asset {
            id: new_id(),
            name: self.name,
            kind: self.kind,
            link: self.link,
            keywords: self.keywords,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPatch {
    pub name: Option<String>,
    pub kind: Option<AssetKind>,
    pub link: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl AssetPatch {
    pub(crate) fn merge_into(self, asset: &mut Asset) {
        if let Some(name) = self.name {
            asset.name = name;
        }
        if let Some(kind) = self.kind {
            asset.kind = kind;
        }
        if let Some(link) = self.link {
            asset.link = link;
        }
        if let Some(keywords) = self.keywords {
            asset.keywords = keywords;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_links() {
        let blank = NewAsset::new("Logo", AssetKind::Logo, "").into_asset();
        let hash = NewAsset::new("Deck", AssetKind::Document, " # ").into_asset();
        let real = NewAsset::new("Guide", AssetKind::Document, "gdrive.com/brand").into_asset();
        assert!(blank.has_placeholder_link());
        assert!(hash.has_placeholder_link());
        assert!(!real.has_placeholder_link());
    }
}
