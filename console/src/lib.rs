pub mod admin;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError, LoginRedirect};
pub use dashboard::{DashboardRepository, DashboardStats};
pub use state::auth::{AuthState, SessionGate};
