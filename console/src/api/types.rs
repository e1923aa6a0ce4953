use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::utils::time::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Creator,
    EndUser,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Creator => "creator",
            UserRole::EndUser => "end_user",
            UserRole::Unknown => "unknown",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "creator" => Ok(UserRole::Creator),
            "end_user" => Ok(UserRole::EndUser),
            other => Err(format!(
                "unknown role `{}` (expected admin, creator or end_user)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Identity returned by `/auth/me`; only used to gate the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFunction {
    pub id: String,
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub capacity: u32,
    pub available_seats: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventFunction {
    #[serde(with = "timestamp")]
    pub date_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub capacity: u32,
    pub available_seats: u32,
}

/// `category` stays an open string: the dashboard groups by whatever the
/// backend reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub creator_id: String,
    pub category: String,
    pub status: EventStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub functions: Vec<EventFunction>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub functions: Vec<NewEventFunction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    General,
    Vip,
    EarlyBird,
    Student,
    Senior,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub event_id: String,
    pub function_id: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub quantity_available: u32,
    #[serde(default)]
    pub quantity_sold: u32,
    #[serde(default)]
    pub max_per_order: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicket {
    pub event_id: String,
    pub function_id: String,
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub quantity_available: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_order: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTicket {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<TicketType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_available: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Stripe,
    Mercadopago,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingTicket {
    pub ticket_id: String,
    pub ticket_name: String,
    pub ticket_type: TicketType,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    #[serde(default)]
    pub function_id: String,
    #[serde(default)]
    pub tickets: Vec<BookingTicket>,
    pub total_amount: f64,
    pub currency: String,
    pub status: BookingStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_metadata: Option<Value>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Refunded => "refunded",
            BookingStatus::Unknown => "unknown",
        }
    }
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_user_accepts_mongo_and_plain_ids() {
        let mongo: AuthUser = serde_json::from_value(json!({
            "_id": "65f0",
            "email": "ops@example.com",
            "full_name": "Ops",
            "role": "admin",
            "is_active": true
        }))
        .unwrap();
        assert_eq!(mongo.id, "65f0");
        assert!(mongo.role.is_admin());

        let plain: AuthUser = serde_json::from_value(json!({
            "id": "u1",
            "email": "fan@example.com",
            "full_name": "Fan",
            "role": "end_user"
        }))
        .unwrap();
        assert_eq!(plain.id, "u1");
        assert!(plain.is_active);
        assert!(!plain.role.is_admin());
    }

    #[test]
    fn unknown_enum_values_do_not_fail_decoding() {
        let role: UserRole = serde_json::from_value(json!("superuser")).unwrap();
        assert_eq!(role, UserRole::Unknown);
        assert!(!role.is_admin());

        let status: BookingStatus = serde_json::from_value(json!("on_hold")).unwrap();
        assert_eq!(status, BookingStatus::Unknown);

        let kind: TicketType = serde_json::from_value(json!("platinum")).unwrap();
        assert_eq!(kind, TicketType::Other);
    }

    #[test]
    fn booking_decodes_naive_timestamps() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b1",
            "user_id": "u1",
            "event_id": "e1",
            "function_id": "f1",
            "tickets": [{
                "ticket_id": "t1",
                "ticket_name": "VIP",
                "ticket_type": "vip",
                "quantity": 2,
                "unit_price": 50.0,
                "subtotal": 100.0
            }],
            "total_amount": 100.0,
            "currency": "USD",
            "status": "confirmed",
            "payment_method": "mercadopago",
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-01T10:05:00.250",
            "confirmed_at": null
        }))
        .unwrap();
        assert!(booking.is_confirmed());
        assert_eq!(booking.payment_method, PaymentMethod::Mercadopago);
        assert_eq!(booking.tickets[0].ticket_type, TicketType::Vip);
        assert!(booking.confirmed_at.is_none());
    }

    #[test]
    fn partial_updates_skip_unset_fields() {
        let update = UpdateUser {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "is_active": false })
        );

        let ticket = UpdateTicket {
            ticket_type: Some(TicketType::EarlyBird),
            price: Some(12.5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            json!({ "type": "early_bird", "price": 12.5 })
        );
    }

    #[test]
    fn role_parses_from_cli_text() {
        assert_eq!("creator".parse::<UserRole>().unwrap(), UserRole::Creator);
        assert!("root".parse::<UserRole>().is_err());
    }
}
