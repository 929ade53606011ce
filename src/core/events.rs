//! Change notifications from a collection to the views that render it
//!
//! The EventBus decouples collection mutations from the views observing
//! them. It uses `tokio::sync::broadcast`, so any number of views can hold a
//! [`Subscription`] and each receives every event published after it
//! subscribed.
//!
//! # Architecture
//!
//! ```text
//! AppCollection::apply_response ──┐
//! SortableCollection::{add,..}  ──┴──▶ EventBus::publish() ──▶ Subscription (view A)
//!                                                         ──▶ Subscription (view B)
//! ```
//!
//! Teardown is explicit: a view calls [`Subscription::unsubscribe`] when it
//! goes away (dropping the subscription has the same effect).

use crate::core::entity::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by a collection after a mutation completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionEvent {
    /// The whole contents were replaced
    Reset { count: usize },
    /// Records were inserted or replaced in place
    Added { ids: Vec<RecordId> },
    /// A record was removed
    Removed { id: RecordId },
    /// The contents were reordered
    Sorted { directive: String },
}

impl CollectionEvent {
    /// Get the action name (reset, added, removed, sorted)
    pub fn action(&self) -> &str {
        match self {
            CollectionEvent::Reset { .. } => "reset",
            CollectionEvent::Added { .. } => "added",
            CollectionEvent::Removed { .. } => "removed",
            CollectionEvent::Sorted { .. } => "sorted",
        }
    }
}

/// Envelope wrapping a collection event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: CollectionEvent,
}

impl EventEnvelope {
    pub fn new(event: CollectionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus owned by a collection
///
/// The bus is cheap to clone (Arc internally).
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow subscribers start losing events (lagged). A capacity of 0 is
    /// raised to 1.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. With no subscribers the event is dropped. Returns the
    /// number of subscribers that will receive it.
    pub fn publish(&self, event: CollectionEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Register a new subscriber
    ///
    /// Events published before this call are not received.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A view's registration on an [`EventBus`]
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<EventEnvelope>,
}

impl Subscription {
    /// Wait for the next event
    pub async fn recv(&mut self) -> Result<EventEnvelope, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_recv(&mut self) -> Result<EventEnvelope, broadcast::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every queued event
    pub fn drain(&mut self) -> Vec<CollectionEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => events.push(envelope.event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagged, events dropped");
                }
                Err(_) => break,
            }
        }
        events
    }

    /// Tear down the subscription
    pub fn unsubscribe(self) {
        drop(self.receiver);
    }
}
