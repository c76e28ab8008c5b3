//! User identity and subscription models.

use serde::{Deserialize, Serialize};

/// Subscription gate for premium content.
///
/// Absent on the wire means [`SubscriptionStatus::Inactive`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    #[default]
    Inactive,
}

/// Authenticated account holder.
///
/// Owned exclusively by the session store; other stores read it by
/// snapshot and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar image URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
}

impl User {
    /// Merge a partial edit into this user. Unset fields are left untouched.
    pub fn apply(&mut self, updates: &UserUpdate) {
        if let Some(email) = &updates.email {
            self.email = email.clone();
        }
        if let Some(first_name) = &updates.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &updates.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(phone) = &updates.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(avatar) = &updates.avatar {
            self.avatar = Some(avatar.clone());
        }
    }
}

/// Partial user edit, merged by `SessionStore::update_user` and sent as the
/// `update-user` request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
