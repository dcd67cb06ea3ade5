use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::RecordKind;

/// Change notification published after a store mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseEvent {
    pub id: String,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub source: EventSource,
    pub priority: EventPriority,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl DatabaseEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            payload,
            timestamp: chrono::Utc::now(),
            source: EventSource::System,
            priority: EventPriority::Normal,
            metadata: HashMap::new(),
        }
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: String, value: serde_json::Value) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Event types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    // User events
    UserRegistered,

    // Request events
    RequestCreated,
    RequestUpdated,

    // Offer events
    OfferCreated,
    OfferUpdated,

    // Help offer events
    HelpOfferCreated,
    HelpOfferUpdated,
    HelpOfferAccepted,

    // Help request events
    HelpRequestCreated,
    HelpRequestUpdated,
    HelpRequestConfirmed,

    // Reconciliation events
    ReconciliationSkipped,

    // System events
    DatabaseMigrated,
    DemoDataSeeded,
}

/// Event payload containing specific data for each event type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Record {
        kind: RecordKind,
        id: String,
        status: String,
        quantity: Option<String>,
    },
    User {
        user_id: String,
        user_type: String,
    },
    Reconciliation {
        kind: RecordKind,
        id: String,
        reason: String,
    },
    System {
        message: String,
        details: Option<serde_json::Value>,
    },
}

/// Event source indicating where the event originated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventSource {
    System,
    Repository(String),
    Service(String),
}

/// Event priority for processing order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub enum EventPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl EventType {
    /// Get a string representation for filtering/routing
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::UserRegistered => "user.registered",
            EventType::RequestCreated => "request.created",
            EventType::RequestUpdated => "request.updated",
            EventType::OfferCreated => "offer.created",
            EventType::OfferUpdated => "offer.updated",
            EventType::HelpOfferCreated => "help_offer.created",
            EventType::HelpOfferUpdated => "help_offer.updated",
            EventType::HelpOfferAccepted => "help_offer.accepted",
            EventType::HelpRequestCreated => "help_request.created",
            EventType::HelpRequestUpdated => "help_request.updated",
            EventType::HelpRequestConfirmed => "help_request.confirmed",
            EventType::ReconciliationSkipped => "reconciliation.skipped",
            EventType::DatabaseMigrated => "system.database_migrated",
            EventType::DemoDataSeeded => "system.demo_data_seeded",
        }
    }
}
