pub mod action;
pub mod dispatcher;
pub mod event;
pub mod reactor;
pub mod telemetry;
pub mod time;
