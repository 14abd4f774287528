//! Dashboard analytics.

use dryklin_core::{AnalyticsSummary, RevenuePeriod, RevenuePoint};
use tracing::instrument;

use crate::http::{ApiClient, ApiError, ApiRequest};

/// Analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Headline counters for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<AnalyticsSummary, ApiError> {
        self.client.get("/analytics/summary").await
    }

    /// Revenue series bucketed by `period`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn revenue(&self, period: RevenuePeriod) -> Result<Vec<RevenuePoint>, ApiError> {
        self.client
            .request(&ApiRequest::get("/analytics/revenue").query("period", period.as_str()))
            .await
    }
}
