//! Rule registry, scoring helpers, the platform's built-in rules and click
//! automation.

pub mod automation;
pub mod builtin;
pub mod logic;
mod registry;

pub use automation::{automated_actions, classify_error, infer_intent, ErrorClass, ErrorPatterns};
pub use builtin::{evaluate_application, register_builtin_rules};
pub use registry::{Rule, RuleError, RuleOutcome, RuleSet};
