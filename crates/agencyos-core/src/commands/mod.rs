//! Free-text command handling
//!
//! - `rules`: the ordered rule table and the pure `classify` step
//! - `intent`: what a classified command asks for
//! - `interpreter`: dispatches intents to the agents

pub mod intent;
pub mod interpreter;
pub mod rules;

pub use intent::Intent;
pub use interpreter::{AUTO_PILOT_COMMAND, GREETING, HELP, Interpreter, InterpreterBuilder};
pub use rules::{
    IntentKind, Matcher, RULES, Rule, classify, route_idea_platform, route_task_owner,
    strip_prefix_ci,
};
