use super::{
    client::{segment, ApiClient},
    error::ApiError,
    types::Booking,
};

impl ApiClient {
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get_json("/bookings/").await
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, ApiError> {
        self.get_json(&format!("/bookings/{}", segment(id))).await
    }

    pub async fn list_event_bookings(&self, event_id: &str) -> Result<Vec<Booking>, ApiError> {
        self.get_json(&format!("/bookings/event/{}", segment(event_id)))
            .await
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, ApiError> {
        self.post_empty(&format!("/bookings/{}/cancel", segment(id)))
            .await
    }
}
