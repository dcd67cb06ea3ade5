use super::types::{DatabaseEvent, EventPayload, EventPriority, EventSource, EventType};
use crate::models::RecordKind;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::trace;

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<DatabaseEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    /// Create a new subscriber with an optional filter
    pub fn new(receiver: broadcast::Receiver<DatabaseEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter
    pub async fn recv(&mut self) -> Result<DatabaseEvent> {
        loop {
            let event = self.receiver.recv().await?;

            if let Some(ref filter) = self.filter {
                if filter.matches(&event) {
                    return Ok(event);
                }
            } else {
                return Ok(event);
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Result<Option<DatabaseEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(ref filter) = self.filter {
                        if filter.matches(&event) {
                            return Ok(Some(event));
                        }
                    } else {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Event filter for selective subscription
#[derive(Debug, Clone)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
    record_kinds: Option<Vec<RecordKind>>,
    min_priority: Option<EventPriority>,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventFilter {
    pub fn new() -> Self {
        Self {
            event_types: None,
            record_kinds: None,
            min_priority: None,
        }
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    /// Only record events about these tables
    pub fn with_record_kinds(mut self, kinds: Vec<RecordKind>) -> Self {
        self.record_kinds = Some(kinds);
        self
    }

    pub fn with_min_priority(mut self, priority: EventPriority) -> Self {
        self.min_priority = Some(priority);
        self
    }

    pub fn matches(&self, event: &DatabaseEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }

        if let Some(ref kinds) = self.record_kinds {
            let kind = match &event.payload {
                EventPayload::Record { kind, .. } | EventPayload::Reconciliation { kind, .. } => {
                    Some(*kind)
                }
                EventPayload::User { .. } => Some(RecordKind::User),
                EventPayload::System { .. } => None,
            };
            if !kind.is_some_and(|k| kinds.contains(&k)) {
                return false;
            }
        }

        if let Some(min_priority) = self.min_priority
            && event.priority < min_priority
        {
            return false;
        }

        true
    }
}

/// Broadcast channel carrying store change notifications
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<DatabaseEvent>,
    stats: Arc<RwLock<EventBusStats>>,
    event_history: Arc<RwLock<Vec<DatabaseEvent>>>,
    max_history_size: usize,
}

#[derive(Debug, Default)]
pub struct EventBusStats {
    pub total_events: u64,
    pub events_by_type: HashMap<String, u64>,
    pub subscriber_count: usize,
    pub dropped_events: u64,
}

impl EventBus {
    /// Create a new event bus with specified buffer capacity
    pub fn new(capacity: usize) -> Self {
        Self::with_history(capacity, 100)
    }

    pub fn with_history(capacity: usize, max_history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            event_history: Arc::new(RwLock::new(Vec::new())),
            max_history_size,
        }
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: DatabaseEvent) -> Result<()> {
        trace!(
            "Publishing event: {:?} with priority {:?}",
            event.event_type, event.priority
        );

        {
            let mut stats = self.stats.write().await;
            stats.total_events += 1;
            let event_type_str = event.event_type.as_str().to_string();
            *stats.events_by_type.entry(event_type_str).or_insert(0) += 1;
        }

        {
            let mut history = self.event_history.write().await;
            history.push(event.clone());

            if history.len() > self.max_history_size {
                let excess = history.len() - self.max_history_size;
                history.drain(0..excess);
            }
        }

        if self.sender.send(event).is_err() {
            // No subscribers is normal
            let mut stats = self.stats.write().await;
            stats.dropped_events += 1;
        }
        Ok(())
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    /// Subscribe with a filter
    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    /// Subscribe to specific event types
    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        let filter = EventFilter::new().with_types(types);
        self.subscribe_filtered(filter)
    }

    /// Get current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get event bus statistics
    pub async fn get_stats(&self) -> EventBusStats {
        let stats = self.stats.read().await;
        EventBusStats {
            total_events: stats.total_events,
            events_by_type: stats.events_by_type.clone(),
            subscriber_count: self.subscriber_count(),
            dropped_events: stats.dropped_events,
        }
    }

    /// Get event history for debugging
    pub async fn get_history(&self) -> Vec<DatabaseEvent> {
        self.event_history.read().await.clone()
    }

    /// Clear event history
    pub async fn clear_history(&self) {
        self.event_history.write().await.clear();
    }

    /// Emit a change notification for one record
    pub async fn emit_record(
        &self,
        event_type: EventType,
        kind: RecordKind,
        id: String,
        status: String,
        quantity: Option<String>,
        source: EventSource,
    ) -> Result<()> {
        let event = DatabaseEvent::new(
            event_type,
            EventPayload::Record {
                kind,
                id,
                status,
                quantity,
            },
        )
        .with_source(source);
        self.publish(event).await
    }

    /// Emit a notice that one half of a reconciliation was skipped
    pub async fn emit_reconciliation_skipped(
        &self,
        kind: RecordKind,
        id: String,
        reason: String,
    ) -> Result<()> {
        let event = DatabaseEvent::new(
            EventType::ReconciliationSkipped,
            EventPayload::Reconciliation { kind, id, reason },
        )
        .with_source(EventSource::Service("reconciliation".to_string()))
        .with_priority(EventPriority::High);
        self.publish(event).await
    }

    /// Emit a system event
    pub async fn emit_system(
        &self,
        event_type: EventType,
        message: String,
        details: Option<serde_json::Value>,
    ) -> Result<()> {
        let event = DatabaseEvent::new(event_type, EventPayload::System { message, details });
        self.publish(event).await
    }
}
