use std::sync::Mutex;

use crate::domain::audit::{AuditEvent, AuditSink};

/// Keeps audit events in memory, in recording order
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::AuditAction;
    use crate::domain::user::UserId;

    #[test]
    fn test_records_in_order() {
        let sink = RecordingAuditSink::new();
        sink.record(AuditEvent::new(
            UserId::new(1),
            AuditAction::ApplicationTokenCreated,
            "ci-runner",
        ));
        sink.record(AuditEvent::new(
            UserId::new(1),
            AuditAction::ApplicationTokenDestroyed,
            "ci-runner",
        ));

        let actions: Vec<_> = sink.events().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::ApplicationTokenCreated,
                AuditAction::ApplicationTokenDestroyed
            ]
        );
    }
}
