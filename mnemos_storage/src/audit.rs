//! Best-effort audit sink backed by the tracing pipeline.

use async_trait::async_trait;
use mnemos_core::repository::{AuditEvent, AuditSink};
use tracing::{info, warn};

/// Emits audit events as structured log lines. Infallible by construction,
/// which keeps the fire-and-forget contract honest.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn notify(&self, event: AuditEvent) {
        match event {
            AuditEvent::Lapse { user_id, card_id } => {
                info!(user = %user_id, card = %card_id, "review lapse, streak reset");
            }
            AuditEvent::RecordCreated { user_id, card_id } => {
                info!(user = %user_id, card = %card_id, "due record created");
            }
            AuditEvent::AssemblyDegraded { user_id, card_id } => {
                warn!(user = %user_id, card = %card_id, "review card degraded during assembly");
            }
        }
    }
}
