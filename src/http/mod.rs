// HTTP delivery of submissions to the orientation endpoint

use async_trait::async_trait;
use thiserror::Error;

use crate::offline::PendingSubmission;

pub mod client;

pub use client::HttpSubmissionClient;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Endpoint rejected submission with HTTP {0}")]
    HttpStatus(u16),
    #[error("Invalid endpoint URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl DeliveryError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            DeliveryError::HttpStatus(status) => *status >= 500 || *status == 429,
            DeliveryError::InvalidEndpoint { .. } => false,
        }
    }
}

/// Transport for pending submissions
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Deliver one submission; `Ok` only when the endpoint accepted it
    async fn deliver(&self, submission: &PendingSubmission) -> Result<(), DeliveryError>;

    /// Whether the endpoint answers at all
    async fn is_reachable(&self) -> bool;
}
