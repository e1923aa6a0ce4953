use super::{
    client::{segment, ApiClient},
    error::ApiError,
    types::{CreateEvent, Event, UpdateEvent},
};

impl ApiClient {
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get_json("/events/").await
    }

    /// Includes drafts and other unpublished events.
    pub async fn list_all_events(&self) -> Result<Vec<Event>, ApiError> {
        self.get_json_with_query("/events/", &[("all", "true")])
            .await
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, ApiError> {
        self.get_json(&format!("/events/{}", segment(id))).await
    }

    pub async fn create_event(&self, request: &CreateEvent) -> Result<Event, ApiError> {
        self.post_json("/events/", request).await
    }

    pub async fn update_event(&self, id: &str, request: &UpdateEvent) -> Result<Event, ApiError> {
        self.put_json(&format!("/events/{}", segment(id)), request)
            .await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/events/{}", segment(id))).await
    }

    pub async fn publish_event(&self, id: &str) -> Result<Event, ApiError> {
        self.post_empty(&format!("/events/{}/publish", segment(id)))
            .await
    }
}
