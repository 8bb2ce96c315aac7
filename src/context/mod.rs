//! Context snapshot assembly and the durable client-side state it reads.

mod activity;
mod builder;
mod kv;
mod types;

pub use activity::{ActivityEvent, ActivityTracker, USER_ACTIVITY_KEY};
pub use builder::{build_context, current_user, CURRENT_USER_KEY};
pub use kv::{FileKv, KvStore, MemoryKv};
pub use types::{ActivityCounters, ContextSnapshot, UserProfile};
