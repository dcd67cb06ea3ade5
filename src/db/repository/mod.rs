pub mod help_offer_repository;
pub mod help_request_repository;
pub mod offer_repository;
pub mod request_repository;
pub mod user_repository;

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

use crate::events::{EventBus, EventSource, EventType};
use crate::models::RecordKind;

/// Base repository trait that all repositories should implement.
/// Records are never deleted, so there is no `delete`.
#[async_trait]
pub trait Repository<T> {
    type Entity: EntityTrait;

    /// Find an entity by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Insert a new entity
    async fn insert(&self, entity: T) -> Result<T>;

    /// Update an existing entity
    async fn update(&self, entity: T) -> Result<T>;

    /// Count all entities
    async fn count(&self) -> Result<u64>;
}

/// Base repository implementation holder
#[derive(Debug)]
pub struct BaseRepository {
    pub db: Arc<DatabaseConnection>,
    pub event_bus: Option<Arc<EventBus>>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>, event_bus: Arc<EventBus>) -> Self {
        Self {
            db,
            event_bus: Some(event_bus),
        }
    }

    pub fn new_without_events(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            event_bus: None,
        }
    }

    /// Publish a record change; failures are logged, never returned
    pub async fn publish_record(
        &self,
        event_type: EventType,
        kind: RecordKind,
        id: &str,
        status: &str,
        quantity: Option<String>,
    ) {
        if let Some(event_bus) = &self.event_bus
            && let Err(e) = event_bus
                .emit_record(
                    event_type.clone(),
                    kind,
                    id.to_string(),
                    status.to_string(),
                    quantity,
                    EventSource::Repository(kind.to_string()),
                )
                .await
        {
            tracing::warn!("Failed to publish {} event: {}", event_type.as_str(), e);
        }
    }
}

// Re-export specific repositories
pub use help_offer_repository::{HelpOfferRepository, HelpOfferRepositoryImpl};
pub use help_request_repository::{HelpRequestRepository, HelpRequestRepositoryImpl};
pub use offer_repository::{OfferRepository, OfferRepositoryImpl};
pub use request_repository::{RequestRepository, RequestRepositoryImpl};
pub use user_repository::{UserRepository, UserRepositoryImpl};
