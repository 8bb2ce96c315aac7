pub mod config;
pub mod context;
pub mod error;
pub mod facts;
pub mod kernel;
pub mod notify;
pub mod rules;
pub mod services;

pub use error::{HeraldError, Result};
pub use kernel::reactor::{Engine, EngineHandle, RoundReport};
