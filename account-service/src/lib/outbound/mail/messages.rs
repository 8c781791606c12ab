use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::models::MailMessage;

/// Serializable mail request consumed by the mail renderer.
///
/// Infrastructure representation of a [`MailMessage`]; the template context
/// is forwarded untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MailRequestMessage {
    pub message_id: String,
    pub subject: String,
    pub recipient: String,
    pub template: String,
    pub context: serde_json::Value,
    pub requested_at: DateTime<Utc>,
}

impl From<&MailMessage> for MailRequestMessage {
    fn from(message: &MailMessage) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            subject: message.subject.clone(),
            recipient: message.recipient.clone(),
            template: message.template.clone(),
            context: message.context.clone(),
            requested_at: Utc::now(),
        }
    }
}
