//! Outbound notifications
//!
//! Best-effort side channel fired after successful account creation.

pub mod client;
pub mod message;

pub use client::{dispatch, DisabledNotifier, Notifier, WebhookNotifier};
pub use message::{Channel, Notification, Priority};
