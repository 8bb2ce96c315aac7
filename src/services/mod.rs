//! External collaborators reached from dispatched actions.

pub mod jobs;
pub mod wallet;

use std::sync::Arc;

pub use jobs::{Connection, HttpJobsApi, Job, JobFilters, JobsApi, OfflineJobsApi};
pub use wallet::{DetachedWallet, WalletBridge};

use crate::config::EngineConfig;

/// Shared handles to every collaborator the dispatcher may call.
#[derive(Clone)]
pub struct Collaborators {
    pub jobs: Arc<dyn JobsApi>,
    pub wallet: Arc<dyn WalletBridge>,
}

impl Collaborators {
    pub fn offline() -> Self {
        Self {
            jobs: Arc::new(OfflineJobsApi),
            wallet: Arc::new(DetachedWallet),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let jobs: Arc<dyn JobsApi> = match &config.jobs_api_url {
            Some(url) => Arc::new(HttpJobsApi::new(url.clone())),
            None => Arc::new(OfflineJobsApi),
        };
        Self {
            jobs,
            wallet: Arc::new(DetachedWallet),
        }
    }
}
