//! Supervisor view over orientation completions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SubmissionConfig;
use crate::orientation::OrientationState;

const RECORDS_CACHE_KEY: &str = "completions";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("No dashboard endpoint configured")]
    NotConfigured,
    #[error("Invalid dashboard endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("Dashboard request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Dashboard endpoint answered HTTP {0}")]
    HttpStatus(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Completed,
    InProgress,
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionStatus::Completed => write!(f, "Completed"),
            CompletionStatus::InProgress => write!(f, "In Progress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: String,
    pub worker_name: String,
    pub hire_date: String,
    pub supervisor: String,
    pub site: String,
    pub quiz_attempts: u32,
    pub completed_at: Option<String>,
    pub status: CompletionStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CompletionStatus),
}

impl StatusFilter {
    fn admits(&self, status: CompletionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" => Ok(StatusFilter::Only(CompletionStatus::Completed)),
            "in_progress" => Ok(StatusFilter::Only(CompletionStatus::InProgress)),
            other => Err(format!(
                "unknown status filter '{other}' (expected all, completed or in_progress)"
            )),
        }
    }
}

/// Records whose worker, supervisor or site contains `search`
/// (case-insensitive) and whose status passes `status`
pub fn filter<'a>(
    records: &'a [CompletionRecord],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a CompletionRecord> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            needle.is_empty()
                || [&record.worker_name, &record.supervisor, &record.site]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .filter(|record| status.admits(record.status))
        .collect()
}

/// Headline counts, always over the unfiltered records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

impl DashboardSummary {
    pub fn of(records: &[CompletionRecord]) -> Self {
        let completed = records
            .iter()
            .filter(|r| r.status == CompletionStatus::Completed)
            .count();
        Self {
            total: records.len(),
            completed,
            in_progress: records.len() - completed,
        }
    }
}

/// Describe the local worker's orientation as a dashboard row
pub fn record_from_state(
    state: &OrientationState,
    completed_at: Option<DateTime<Utc>>,
) -> Option<CompletionRecord> {
    let info = state.worker_info.as_ref()?;
    let complete = state.is_complete();
    Some(CompletionRecord {
        id: state
            .session_id
            .clone()
            .unwrap_or_else(|| "local".to_string()),
        worker_name: info.full_name.clone(),
        hire_date: info.hire_date.clone(),
        supervisor: info.supervisor_name.clone(),
        site: info.site_id.clone(),
        quiz_attempts: state.quiz_attempts,
        completed_at: completed_at
            .filter(|_| complete)
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
        status: if complete {
            CompletionStatus::Completed
        } else {
            CompletionStatus::InProgress
        },
    })
}

#[async_trait]
pub trait CompletionSource: Send + Sync {
    async fn records(&self) -> Result<Vec<CompletionRecord>, DashboardError>;
}

/// Fixed demonstration records
#[derive(Debug, Default, Clone, Copy)]
pub struct MockCompletionSource;

#[async_trait]
impl CompletionSource for MockCompletionSource {
    async fn records(&self) -> Result<Vec<CompletionRecord>, DashboardError> {
        let record = |id: &str,
                      worker: &str,
                      hired: &str,
                      supervisor: &str,
                      site: &str,
                      attempts: u32,
                      completed_at: Option<&str>| CompletionRecord {
            id: id.to_string(),
            worker_name: worker.to_string(),
            hire_date: hired.to_string(),
            supervisor: supervisor.to_string(),
            site: site.to_string(),
            quiz_attempts: attempts,
            completed_at: completed_at.map(str::to_string),
            status: if completed_at.is_some() {
                CompletionStatus::Completed
            } else {
                CompletionStatus::InProgress
            },
        };
        Ok(vec![
            record("1", "John Smith", "2026-01-28", "Mike Johnson", "Milestone Project", 1, Some("2026-01-28 14:30")),
            record("2", "Sarah Williams", "2026-01-27", "Mike Johnson", "Downtown Tower", 2, Some("2026-01-27 10:15")),
            record("3", "James Brown", "2026-01-29", "Lisa Chen", "Milestone Project", 1, None),
        ])
    }
}

/// Records fetched from the dashboard endpoint.
///
/// The network is tried first; when it fails, the last successful response
/// is served from cache until it expires.
pub struct HttpCompletionSource {
    client: Client,
    endpoint: Url,
    cache: Cache<String, Vec<CompletionRecord>>,
}

impl HttpCompletionSource {
    pub fn new(config: &SubmissionConfig) -> Result<Self, DashboardError> {
        let url = config
            .dashboard_endpoint
            .as_deref()
            .ok_or(DashboardError::NotConfigured)?;
        let endpoint = Url::parse(url).map_err(|e| DashboardError::InvalidEndpoint {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.dashboard_cache_ttl())
            .build();
        Ok(Self {
            client,
            endpoint,
            cache,
        })
    }

    async fn fetch(&self) -> Result<Vec<CompletionRecord>, DashboardError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::HttpStatus(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CompletionSource for HttpCompletionSource {
    async fn records(&self) -> Result<Vec<CompletionRecord>, DashboardError> {
        match self.fetch().await {
            Ok(records) => {
                debug!(count = records.len(), "Fetched completion records");
                self.cache
                    .insert(RECORDS_CACHE_KEY.to_string(), records.clone())
                    .await;
                Ok(records)
            }
            Err(e) => match self.cache.get(RECORDS_CACHE_KEY).await {
                Some(cached) => {
                    warn!(error = %e, "Dashboard endpoint failed, serving cached records");
                    Ok(cached)
                }
                None => Err(e),
            },
        }
    }
}
