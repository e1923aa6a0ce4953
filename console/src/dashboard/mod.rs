//! Dashboard statistics, aggregated client-side from the users, events and
//! bookings collections. There is no backend summary endpoint; every load
//! recomputes everything.

mod aggregate;
mod repository;

pub use aggregate::{build_stats, RECENT_BOOKINGS_LIMIT};
pub use repository::DashboardRepository;

use serde::{Deserialize, Serialize};

use crate::api::Booking;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_events: usize,
    pub total_bookings: usize,
    pub total_revenue: f64,
    pub recent_bookings: Vec<Booking>,
    pub events_by_category: Vec<CategoryCount>,
    pub revenue_by_month: Vec<MonthlyRevenue>,
}
