//! Engine telemetry.
//!
//! Read-only side channel: nothing in the inference loop or the queue reads it.
//! Events carry ids and counts, never notification text or profile data.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{CallOutcome, LifecycleEvent, NotificationEventKind, TelemetryEvent};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
