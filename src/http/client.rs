use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{Client, Url};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, warn};

use super::{DeliveryError, SubmissionClient};
use crate::config::SubmissionConfig;
use crate::offline::PendingSubmission;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Rate-limited submission client with retry on transient failures
#[derive(Debug)]
pub struct HttpSubmissionClient {
    client: Client,
    endpoint: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    max_retries: usize,
    base_delay_ms: u64,
}

impl HttpSubmissionClient {
    pub fn new(config: &SubmissionConfig) -> Result<Self, DeliveryError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| DeliveryError::InvalidEndpoint {
            url: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("safety-orientation/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            rate_limiter,
            max_retries: config.max_retries as usize,
            base_delay_ms: config.base_delay_ms,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Delays of base, 2*base, 4*base... capped, with jitter
    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor((self.base_delay_ms / 2).max(1))
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.max_retries)
    }

    async fn post_once(&self, submission: &PendingSubmission) -> Result<(), DeliveryError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Idempotency-Key", &submission.id)
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::HttpStatus(status.as_u16()))
        }
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn deliver(&self, submission: &PendingSubmission) -> Result<(), DeliveryError> {
        debug!(submission_id = %submission.id, endpoint = %self.endpoint, "Posting submission");
        RetryIf::spawn(
            self.retry_strategy(),
            || self.post_once(submission),
            |e: &DeliveryError| {
                let retry = e.is_retryable();
                if retry {
                    warn!(submission_id = %submission.id, error = %e, "Transient delivery failure, retrying");
                }
                retry
            },
        )
        .await
    }

    async fn is_reachable(&self) -> bool {
        self.rate_limiter.until_ready().await;
        match self.client.head(self.endpoint.clone()).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(endpoint = %self.endpoint, error = %e, "Endpoint unreachable");
                false
            }
        }
    }
}
