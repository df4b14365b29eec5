//! Domain agents - intent handlers over the shared store
//!
//! Each agent is constructed once with a handle to the store and returns
//! plain reply strings. A lookup miss is a reply too, never an error.

pub mod analyst;
pub mod creator;
pub mod merchant;
pub mod strategist;

pub use analyst::{AnalystAgent, TREND_POOL};
pub use creator::{CreatorAgent, draft_script};
pub use merchant::MerchantAgent;
pub use strategist::StrategistAgent;

/// Agent types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    Strategist,
    Analyst,
    Creator,
    Merchant,
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strategist => write!(f, "strategist"),
            Self::Analyst => write!(f, "analyst"),
            Self::Creator => write!(f, "creator"),
            Self::Merchant => write!(f, "merchant"),
        }
    }
}
