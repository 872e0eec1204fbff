//! Audit events
//!
//! Token creation and deletion are recorded as activities owned by the acting
//! user, carrying the application label.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::UserId;

/// Auditable actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    #[serde(rename = "application_token.created")]
    ApplicationTokenCreated,
    #[serde(rename = "application_token.destroy")]
    ApplicationTokenDestroyed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationTokenCreated => "application_token.created",
            Self::ApplicationTokenDestroyed => "application_token.destroy",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub actor_id: UserId,
    pub action: AuditAction,
    pub application: String,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(actor_id: UserId, action: AuditAction, application: impl Into<String>) -> Self {
        Self {
            actor_id,
            action,
            application: application.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Consumer of audit events
///
/// Recording is fire-and-forget: a sink must not fail the operation that
/// produced the event.
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    fn record(&self, event: AuditEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_keys() {
        assert_eq!(
            AuditAction::ApplicationTokenCreated.to_string(),
            "application_token.created"
        );

        let event = AuditEvent::new(
            UserId::new(1),
            AuditAction::ApplicationTokenDestroyed,
            "ci-runner",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "application_token.destroy");
        assert_eq!(json["application"], "ci-runner");
    }
}
