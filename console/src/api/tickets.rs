use super::{
    client::{segment, ApiClient},
    error::ApiError,
    types::{CreateTicket, Ticket, UpdateTicket},
};

impl ApiClient {
    pub async fn list_tickets(&self, event_id: Option<&str>) -> Result<Vec<Ticket>, ApiError> {
        match event_id {
            Some(event_id) => {
                self.get_json(&format!("/tickets/event/{}", segment(event_id)))
                    .await
            }
            None => self.get_json("/tickets/").await,
        }
    }

    pub async fn get_ticket(&self, id: &str) -> Result<Ticket, ApiError> {
        self.get_json(&format!("/tickets/{}", segment(id))).await
    }

    pub async fn create_ticket(&self, request: &CreateTicket) -> Result<Ticket, ApiError> {
        self.post_json("/tickets/", request).await
    }

    pub async fn update_ticket(&self, id: &str, request: &UpdateTicket) -> Result<Ticket, ApiError> {
        self.put_json(&format!("/tickets/{}", segment(id)), request)
            .await
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/tickets/{}", segment(id))).await
    }
}
