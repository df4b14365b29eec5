//! Agency OS Core Library
//!
//! This crate provides the core functionality for Agency OS, including:
//! - Entities (tasks, content, clients, projects, assets, weekly metrics)
//! - Entity store with automation rules (revenue, project status, onboarding)
//! - Persistence and sheet export gateways
//! - Domain agents (strategist, analyst, creator, merchant)
//! - Free-text command interpreter
//! - Content scheduler
//! - Configuration and manual entry validation

pub mod agents;
pub mod commands;
pub mod config;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod random;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commands::{Intent, Interpreter, InterpreterBuilder, classify};
    pub use crate::config::Config;
    pub use crate::entities::*;
    pub use crate::error::{Error, Result};
    pub use crate::gateway::{
        JsonFileGateway, MemoryGateway, PersistenceGateway, SheetGateway, sheet_gateway_from_config,
    };
    pub use crate::random::{FixedRandom, RandomSource, SeededRandom};
    pub use crate::store::{EntityStore, SharedStore, StoreOptions};
}
