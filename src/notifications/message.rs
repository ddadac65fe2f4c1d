//! Notification messages
//!
//! Structured payloads handed to the external notification service
//! after account creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Sms,
}

/// A single message for the notification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub priority: Priority,
    pub channel: Channel,
    /// Email address or phone number, when one is known
    pub recipient: Option<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(
        priority: Priority,
        channel: Channel,
        recipient: Option<String>,
        subject: String,
        body: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            priority,
            channel,
            recipient,
            subject,
            body,
            created_at: Utc::now(),
        }
    }

    /// Welcome message sent after a user account is created
    pub fn account_created(first_name: &str, last_name: &str, email: Option<&str>) -> Self {
        Self::new(
            Priority::Medium,
            Channel::Email,
            email.map(String::from),
            "Your account".to_string(),
            format!(
                "Hi {} {}, your account was created successfully. Welcome aboard.",
                first_name, last_name
            ),
        )
    }

    /// Message sent after an administrative account is created
    pub fn admin_created(first_name: &str, last_name: &str, email: &str) -> Self {
        Self::new(
            Priority::Medium,
            Channel::Email,
            Some(email.to_string()),
            "Administrator access".to_string(),
            format!(
                "Hi {} {}, your account was created successfully. You now have administrator access.",
                first_name, last_name
            ),
        )
    }
}
