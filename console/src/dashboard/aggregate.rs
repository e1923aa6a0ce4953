use super::{CategoryCount, DashboardStats, MonthlyRevenue};
use crate::{
    api::{Booking, Event, User},
    utils::time::month_label,
};

pub const RECENT_BOOKINGS_LIMIT: usize = 10;

pub fn build_stats(users: &[User], events: &[Event], bookings: &[Booking]) -> DashboardStats {
    DashboardStats {
        total_users: users.len(),
        total_events: events.len(),
        total_bookings: bookings.len(),
        total_revenue: total_revenue(bookings),
        recent_bookings: recent_bookings(bookings, RECENT_BOOKINGS_LIMIT),
        events_by_category: events_by_category(events),
        revenue_by_month: revenue_by_month(bookings),
    }
}

fn total_revenue(bookings: &[Booking]) -> f64 {
    bookings
        .iter()
        .filter(|b| b.is_confirmed())
        .map(|b| b.total_amount)
        .sum()
}

/// Counts per category in order of first appearance.
fn events_by_category(events: &[Event]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for event in events {
        match counts.iter_mut().find(|c| c.category == event.category) {
            Some(existing) => existing.count += 1,
            None => counts.push(CategoryCount {
                category: event.category.clone(),
                count: 1,
            }),
        }
    }
    counts
}

/// Confirmed revenue per calendar month (UTC), in order of first appearance
/// over the newest-first bookings, so the latest month leads.
fn revenue_by_month(bookings: &[Booking]) -> Vec<MonthlyRevenue> {
    let mut months: Vec<MonthlyRevenue> = Vec::new();
    for booking in newest_first(bookings)
        .into_iter()
        .filter(|b| b.is_confirmed())
    {
        let month = month_label(&booking.created_at);
        match months.iter_mut().find(|m| m.month == month) {
            Some(existing) => existing.revenue += booking.total_amount,
            None => months.push(MonthlyRevenue {
                month,
                revenue: booking.total_amount,
            }),
        }
    }
    months
}

fn recent_bookings(bookings: &[Booking], limit: usize) -> Vec<Booking> {
    newest_first(bookings)
        .into_iter()
        .take(limit)
        .cloned()
        .collect()
}

/// Stable: bookings created at the same instant keep server order.
fn newest_first(bookings: &[Booking]) -> Vec<&Booking> {
    let mut sorted: Vec<&Booking> = bookings.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}
