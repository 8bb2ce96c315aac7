use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Job board and networking backend.
#[async_trait]
pub trait JobsApi: Send + Sync {
    async fn get_jobs(&self, filters: JobFilters) -> Result<Vec<Job>>;
    async fn get_connection_recommendations(
        &self,
        email: &str,
        user_type: Option<&str>,
    ) -> Result<Vec<Connection>>;
}

#[derive(Clone)]
pub struct HttpJobsApi {
    client: Client,
    base_url: String,
}

impl HttpJobsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl JobsApi for HttpJobsApi {
    async fn get_jobs(&self, filters: JobFilters) -> Result<Vec<Job>> {
        let response = self
            .client
            .get(format!("{}/jobs", self.base_url))
            .query(&filters)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("jobs api error: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    async fn get_connection_recommendations(
        &self,
        email: &str,
        user_type: Option<&str>,
    ) -> Result<Vec<Connection>> {
        let mut query = vec![("email", email)];
        if let Some(kind) = user_type {
            query.push(("type", kind));
        }

        let response = self
            .client
            .get(format!("{}/connections", self.base_url))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("connections api error: {}", response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Used when no API is configured. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineJobsApi;

#[async_trait]
impl JobsApi for OfflineJobsApi {
    async fn get_jobs(&self, _filters: JobFilters) -> Result<Vec<Job>> {
        Err(anyhow!("jobs api unavailable"))
    }

    async fn get_connection_recommendations(
        &self,
        _email: &str,
        _user_type: Option<&str>,
    ) -> Result<Vec<Connection>> {
        Err(anyhow!("jobs api unavailable"))
    }
}
