use crate::api::{ApiClient, ApiError, Event};

pub const MISSING_TICKETS_MESSAGE: &str = "Add tickets to the event before publishing";

/// Publishes an event only once it has at least one ticket type.
pub async fn publish_checked(api: &ApiClient, event_id: &str) -> Result<Event, ApiError> {
    let tickets = api.list_tickets(Some(event_id)).await?;
    if tickets.is_empty() {
        tracing::info!(event_id, "refusing to publish event without tickets");
        return Err(ApiError::validation(MISSING_TICKETS_MESSAGE));
    }
    let event = api.publish_event(event_id).await?;
    tracing::info!(event_id, tickets = tickets.len(), "event published");
    Ok(event)
}

#[cfg(all(test, not(coverage)))]
mod tests {
    use super::*;
    use crate::{
        api::EventStatus,
        test_support::helpers::{event_json, harness, ticket_json},
    };
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn refuses_to_publish_without_tickets() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tickets/event/e1");
                then.status(200).json_body(json!([]));
            })
            .await;
        let publish = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/events/e1/publish");
                then.status(200).json_body(event_json("e1", "music"));
            })
            .await;

        let h = harness(&server, Some("a1"), Some("r1"));
        let err = publish_checked(&h.api, "e1").await.unwrap_err();

        assert_eq!(err.to_string(), MISSING_TICKETS_MESSAGE);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        publish.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn publishes_when_tickets_exist() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tickets/event/e1");
                then.status(200).json_body(json!([ticket_json("t1", "e1")]));
            })
            .await;
        let publish = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/events/e1/publish");
                then.status(200).json_body(event_json("e1", "music"));
            })
            .await;

        let h = harness(&server, Some("a1"), Some("r1"));
        let event = publish_checked(&h.api, "e1").await.unwrap();

        assert_eq!(event.status, EventStatus::Published);
        publish.assert_hits_async(1).await;
    }
}
