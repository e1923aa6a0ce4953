use std::sync::Arc;

use super::{build_stats, DashboardStats};
use crate::api::{ApiClient, ApiError};

#[derive(Clone)]
pub struct DashboardRepository {
    api: Arc<ApiClient>,
}

impl DashboardRepository {
    pub fn new_with_client(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Fetches the three collections concurrently; the first failure aborts
    /// the whole load.
    pub async fn fetch_stats(&self) -> Result<DashboardStats, ApiError> {
        let (users, events, bookings) = tokio::try_join!(
            self.api.list_users(),
            self.api.list_all_events(),
            self.api.list_bookings(),
        )?;
        tracing::debug!(
            users = users.len(),
            events = events.len(),
            bookings = bookings.len(),
            "aggregating dashboard statistics"
        );
        Ok(build_stats(&users, &events, &bookings))
    }
}
