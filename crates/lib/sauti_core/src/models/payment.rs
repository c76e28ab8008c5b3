//! Mobile-money payment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mobile-money network operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    Mtn,
    Airtel,
}

/// Payment lifecycle status.
///
/// `"SUCCESS"` is accepted on input for older backend responses; the
/// canonical wire spelling is `"SUCCESSFUL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    #[serde(alias = "SUCCESS")]
    Successful,
    Failed,
}

/// Subscription period purchased by a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionType {
    Weekly,
    Monthly,
}

/// A subscription payment with its validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub amount: i64,
    pub phone_number: String,
    pub provider: Provider,
    pub status: PaymentStatus,
    pub user_id: String,
    pub subscription_type: SubscriptionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Payload for `initiate-payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub amount: i64,
    pub phone_number: String,
    pub provider: Provider,
    pub subscription_type: SubscriptionType,
    pub user_id: String,
}
