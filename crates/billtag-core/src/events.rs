//! Tag definition life-cycle events and the broadcast bus that carries them.
//!
//! The DAO holds an [`EventBus`] as its notification integration point.
//! Consumers subscribe independently and receive [`EventEnvelope`]s.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::call_context::CallContext;

/// Default broadcast buffer for production use.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

// ============================================================================
// Event Envelope
// ============================================================================

/// Versioned wrapper around a [`TagDefinitionEvent`].
///
/// `event_type` is dot-namespaced (e.g. `"tag_definition.created"`).
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// UUIDv7 for temporal ordering.
    pub event_id: Uuid,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    /// Token of the call that caused this event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_token: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub payload_version: u32,
    pub payload: TagDefinitionEvent,
}

impl EventEnvelope {
    /// Envelope with no caller attribution.
    pub fn new(event: TagDefinitionEvent) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            event_type: event.namespaced_event_type().to_string(),
            occurred_at: Utc::now(),
            user_token: None,
            user_name: None,
            payload_version: 1,
            payload: event,
        }
    }

    /// Envelope attributed to the caller described by `ctx`.
    pub fn with_context(event: TagDefinitionEvent, ctx: &CallContext) -> Self {
        Self {
            user_token: Some(ctx.user_token),
            user_name: Some(ctx.user_name.clone()),
            ..Self::new(event)
        }
    }
}

// ============================================================================
// Tag definition events
// ============================================================================

/// Serialized with a `type` tag field, e.g.
/// `{"type":"TagDefinitionCreated","name":"promo",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TagDefinitionEvent {
    TagDefinitionCreated {
        name: String,
        description: String,
        is_control_tag: bool,
    },
    TagDefinitionDeleted {
        name: String,
        is_control_tag: bool,
    },
}

impl TagDefinitionEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            TagDefinitionEvent::TagDefinitionCreated { .. } => "TagDefinitionCreated",
            TagDefinitionEvent::TagDefinitionDeleted { .. } => "TagDefinitionDeleted",
        }
    }

    pub fn namespaced_event_type(&self) -> &'static str {
        match self {
            TagDefinitionEvent::TagDefinitionCreated { .. } => "tag_definition.created",
            TagDefinitionEvent::TagDefinitionDeleted { .. } => "tag_definition.deleted",
        }
    }

    /// Name of the tag definition this event relates to.
    pub fn definition_name(&self) -> &str {
        match self {
            TagDefinitionEvent::TagDefinitionCreated { name, .. }
            | TagDefinitionEvent::TagDefinitionDeleted { name, .. } => name,
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast-based event bus.
///
/// Slow receivers that fall behind get a `Lagged` error and miss events.
pub struct EventBus {
    tx: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit without caller attribution. Dropped silently if nobody listens.
    pub fn emit(&self, event: TagDefinitionEvent) {
        self.send(EventEnvelope::new(event));
    }

    /// Emit attributed to the caller described by `ctx`.
    pub fn emit_with_context(&self, event: TagDefinitionEvent, ctx: &CallContext) {
        self.send(EventEnvelope::with_context(event, ctx));
    }

    fn send(&self, envelope: EventEnvelope) {
        tracing::debug!(
            event_type = %envelope.event_type,
            event_id = %envelope.event_id,
            subscriber_count = self.tx.receiver_count(),
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive enveloped events.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUS_CAPACITY)
    }
}
