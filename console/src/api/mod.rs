mod auth;
mod bookings;
pub mod client;
pub mod error;
mod events;
mod tickets;
pub mod types;
mod users;

pub use client::*;
pub use error::ApiError;
pub use types::*;
