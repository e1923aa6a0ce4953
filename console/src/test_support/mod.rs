#[cfg(test)]
pub mod helpers {
    use crate::api::{ApiClient, LoginRedirect};
    use crate::utils::storage::MemorySessionStore;
    use httpmock::MockServer;
    use serde_json::{json, Value};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[derive(Debug, Default)]
    pub struct RecordingRedirect {
        count: AtomicUsize,
    }

    impl RecordingRedirect {
        pub fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl LoginRedirect for RecordingRedirect {
        fn redirect_to_login(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct Harness {
        pub api: Arc<ApiClient>,
        pub store: Arc<MemorySessionStore>,
        pub redirect: Arc<RecordingRedirect>,
    }

    pub fn harness(
        server: &MockServer,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Harness {
        let store = Arc::new(MemorySessionStore::with_tokens(access_token, refresh_token));
        let redirect = Arc::new(RecordingRedirect::default());
        let api = ApiClient::new(server.url("/api"), store.clone())
            .with_redirect(redirect.clone());
        Harness {
            api: Arc::new(api),
            store,
            redirect,
        }
    }

    pub fn auth_user_json(role: &str) -> Value {
        json!({
            "_id": "u-admin",
            "email": "ops@example.com",
            "full_name": "Ops Admin",
            "role": role,
            "is_active": true
        })
    }

    pub fn user_json(id: &str) -> Value {
        json!({
            "_id": id,
            "email": format!("{}@example.com", id),
            "full_name": "Example User",
            "role": "end_user",
            "is_active": true,
            "created_at": "2024-01-05T09:00:00",
            "updated_at": "2024-01-05T09:00:00"
        })
    }

    pub fn event_json(id: &str, category: &str) -> Value {
        json!({
            "_id": id,
            "name": format!("Event {}", id),
            "description": "",
            "creator_id": "u-creator",
            "category": category,
            "status": "published",
            "location": "Main Hall",
            "images": [],
            "functions": [{
                "id": "f1",
                "date_time": "2024-07-01T20:00:00",
                "duration_minutes": 120,
                "capacity": 300,
                "available_seats": 120
            }],
            "created_at": "2024-02-01T12:00:00",
            "updated_at": "2024-02-01T12:00:00"
        })
    }

    pub fn ticket_json(id: &str, event_id: &str) -> Value {
        json!({
            "_id": id,
            "event_id": event_id,
            "function_id": "f1",
            "type": "general",
            "name": "General Admission",
            "price": 25.0,
            "currency": "USD",
            "quantity_available": 100,
            "quantity_sold": 10,
            "max_per_order": 6,
            "is_active": true,
            "created_at": "2024-02-02T12:00:00",
            "updated_at": "2024-02-02T12:00:00"
        })
    }

    pub fn booking_json(id: &str, status: &str, amount: f64, created_at: &str) -> Value {
        json!({
            "_id": id,
            "user_id": "u1",
            "event_id": "e1",
            "function_id": "f1",
            "tickets": [],
            "total_amount": amount,
            "currency": "USD",
            "status": status,
            "payment_method": "stripe",
            "created_at": created_at,
            "updated_at": created_at
        })
    }
}
