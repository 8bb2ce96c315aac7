//! Fact base: named, static JSON data consulted by rules.

mod defaults;
mod store;

pub use defaults::{
    install_defaults, COURSE_CATALOG, ERROR_PATTERNS, INVESTOR_NETWORK, MARKET_CONDITIONS,
    PLATFORM_STATE, USER_INTENT, USER_PREFERENCES,
};
pub use store::FactStore;
