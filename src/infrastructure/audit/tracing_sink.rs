use tracing::info;

use crate::domain::audit::{AuditEvent, AuditSink};

/// Writes audit events to the `audit` tracing target
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        info!(
            target: "audit",
            actor_id = %event.actor_id,
            action = %event.action,
            application = %event.application,
            occurred_at = %event.occurred_at.to_rfc3339(),
            "Audit event"
        );
    }
}
