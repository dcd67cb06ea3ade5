use std::sync::Arc;

use crate::config::Config;
use crate::db::connection::DatabaseConnection;
use crate::db::repository::{
    HelpOfferRepositoryImpl, HelpRequestRepositoryImpl, OfferRepositoryImpl,
    RequestRepositoryImpl, UserRepositoryImpl,
};
use crate::events::{EventBus, EventSource, EventType};
use crate::models::{QuantityPolicy, RecordKind};

/// Everything a service call needs: the store, the optional change feed
/// and the reconciliation settings
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub db: DatabaseConnection,
    pub events: Option<Arc<EventBus>>,
    pub quantity_policy: QuantityPolicy,
    pub author_fallback: bool,
}

macro_rules! repository_ctor {
    ($fn_name:ident, $repo:ty) => {
        pub(crate) fn $fn_name(&self) -> $repo {
            match &self.events {
                Some(bus) => <$repo>::new(self.db.clone(), bus.clone()),
                None => <$repo>::new_without_events(self.db.clone()),
            }
        }
    };
}

impl ServiceContext {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            events: None,
            quantity_policy: QuantityPolicy::default(),
            author_fallback: true,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            events: None,
            quantity_policy: config.reconciliation.quantity_parsing,
            author_fallback: config.reconciliation.author_fallback,
        }
    }

    pub fn with_events(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    pub fn with_author_fallback(mut self, enabled: bool) -> Self {
        self.author_fallback = enabled;
        self
    }

    /// Announce a record a service wrote itself, once its transaction committed
    pub(crate) async fn publish_record(
        &self,
        event_type: EventType,
        kind: RecordKind,
        id: &str,
        status: &str,
        quantity: Option<String>,
    ) {
        if let Some(bus) = &self.events
            && let Err(e) = bus
                .emit_record(
                    event_type.clone(),
                    kind,
                    id.to_string(),
                    status.to_string(),
                    quantity,
                    EventSource::Service(kind.to_string()),
                )
                .await
        {
            tracing::warn!("Failed to publish {} event: {}", event_type.as_str(), e);
        }
    }

    repository_ctor!(users, UserRepositoryImpl);
    repository_ctor!(requests, RequestRepositoryImpl);
    repository_ctor!(offers, OfferRepositoryImpl);
    repository_ctor!(help_offers, HelpOfferRepositoryImpl);
    repository_ctor!(help_requests, HelpRequestRepositoryImpl);
}
