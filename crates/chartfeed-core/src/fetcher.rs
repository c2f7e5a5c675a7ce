use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::data_source::{IndicatorRequest, IndicatorSource};
use crate::pacing::Pacer;
use crate::retry::RetryPolicy;
use crate::{FeedConfig, FeedError, IndicatorSnapshot, Query};

/// Paced, retrying access to the live-indicator provider.
///
/// Every attempt, retries included, goes through the shared [`Pacer`] before
/// it is dispatched.
#[derive(Clone)]
pub struct IndicatorFetcher {
    source: Arc<dyn IndicatorSource>,
    pacer: Pacer,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl IndicatorFetcher {
    pub fn new(
        source: Arc<dyn IndicatorSource>,
        pacer: Pacer,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            pacer,
            retry,
            clock,
        }
    }

    pub fn from_config(
        source: Arc<dyn IndicatorSource>,
        config: &FeedConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let pacer = Pacer::new(config.min_spacing, clock.clone());
        Self::new(source, pacer, config.retry.clone(), clock)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches one snapshot for `query`, retrying per the policy.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Upstream`] with the provider's last message once
    /// every attempt has failed.
    pub async fn fetch_indicators(&self, query: &Query) -> Result<IndicatorSnapshot, FeedError> {
        let request = IndicatorRequest::from_query(query);
        let max_attempts = self.retry.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.pacer.acquire().await;
            debug!(
                provider = %self.source.id(),
                ticker = %request.ticker(),
                interval = request.interval,
                attempt,
                "dispatching indicator request"
            );

            let error = match self.source.indicators(request.clone()).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(error) => error,
            };

            warn!(
                provider = %self.source.id(),
                ticker = %request.ticker(),
                attempt,
                max_attempts,
                error = %error,
                "indicator request failed"
            );

            match self.retry.delay_after(attempt) {
                Some(delay) => self.clock.sleep(delay).await,
                None => return Err(FeedError::upstream(error.message())),
            }
        }
    }
}
