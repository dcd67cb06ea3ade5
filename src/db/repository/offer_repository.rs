use super::{BaseRepository, Repository};
use crate::db::entities::{Offer, OfferActiveModel, OfferModel, offers};
use crate::events::{event_bus::EventBus, types::EventType};
use crate::models::{OfferFilter, OfferStatus, RecordKind};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// Repository trait for Offer entities
#[async_trait]
pub trait OfferRepository: Repository<OfferModel> {
    /// Find offers posted by one author, oldest first
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<OfferModel>>;

    /// Find offers still open for help requests
    async fn find_available(&self) -> Result<Vec<OfferModel>>;

    /// Find offers matching every set field of the filter, newest first
    async fn find_filtered(&self, filter: &OfferFilter) -> Result<Vec<OfferModel>>;

    /// Count offers in one status
    async fn count_by_status(&self, status: &str) -> Result<u64>;
}

/// Earliest offer by `author_id` on any connection, including an open transaction
pub async fn first_offer_by_author<C: ConnectionTrait>(
    db: &C,
    author_id: &str,
) -> Result<Option<OfferModel>, sea_orm::DbErr> {
    Offer::find()
        .filter(offers::Column::AuthorId.eq(author_id))
        .order_by_asc(offers::Column::CreatedAt)
        .order_by_asc(offers::Column::Id)
        .one(db)
        .await
}

#[derive(Debug)]
pub struct OfferRepositoryImpl {
    base: BaseRepository,
}

impl OfferRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>, event_bus: Arc<EventBus>) -> Self {
        Self {
            base: BaseRepository::new(db, event_bus),
        }
    }

    pub fn new_without_events(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new_without_events(db),
        }
    }
}

#[async_trait]
impl Repository<OfferModel> for OfferRepositoryImpl {
    type Entity = Offer;

    async fn find_by_id(&self, id: &str) -> Result<Option<OfferModel>> {
        Ok(Offer::find_by_id(id).one(self.base.db.as_ref()).await?)
    }

    async fn find_all(&self) -> Result<Vec<OfferModel>> {
        Ok(Offer::find()
            .order_by_desc(offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn insert(&self, entity: OfferModel) -> Result<OfferModel> {
        let active_model = OfferActiveModel {
            id: Set(entity.id),
            title: Set(entity.title),
            description: Set(entity.description),
            category: Set(entity.category),
            quantity_amount: Set(entity.quantity_amount),
            quantity_unit: Set(entity.quantity_unit),
            delivery_location: Set(entity.delivery_location),
            author_id: Set(entity.author_id),
            author_name: Set(entity.author_name),
            status: Set(entity.status),
            image_url: Set(entity.image_url),
            created_at: Set(entity.created_at),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        let result = active_model.insert(self.base.db.as_ref()).await?;
        tracing::debug!("Inserted offer {} ({})", result.id, result.title);

        self.base
            .publish_record(
                EventType::OfferCreated,
                RecordKind::Offer,
                &result.id,
                &result.status,
                Some(result.quantity_text()),
            )
            .await;

        Ok(result)
    }

    async fn update(&self, entity: OfferModel) -> Result<OfferModel> {
        let active_model = OfferActiveModel {
            id: Unchanged(entity.id),
            title: Set(entity.title),
            description: Set(entity.description),
            category: Set(entity.category),
            quantity_amount: Set(entity.quantity_amount),
            quantity_unit: Set(entity.quantity_unit),
            delivery_location: Set(entity.delivery_location),
            author_id: Unchanged(entity.author_id),
            author_name: Unchanged(entity.author_name),
            status: Set(entity.status),
            image_url: Set(entity.image_url),
            created_at: Unchanged(entity.created_at),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        let result = active_model.update(self.base.db.as_ref()).await?;
        tracing::debug!("Updated offer {} -> {}", result.id, result.status);

        self.base
            .publish_record(
                EventType::OfferUpdated,
                RecordKind::Offer,
                &result.id,
                &result.status,
                Some(result.quantity_text()),
            )
            .await;

        Ok(result)
    }

    async fn count(&self) -> Result<u64> {
        Ok(Offer::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl OfferRepository for OfferRepositoryImpl {
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<OfferModel>> {
        Ok(Offer::find()
            .filter(offers::Column::AuthorId.eq(author_id))
            .order_by_asc(offers::Column::CreatedAt)
            .order_by_asc(offers::Column::Id)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_available(&self) -> Result<Vec<OfferModel>> {
        Ok(Offer::find()
            .filter(offers::Column::Status.eq(OfferStatus::Available.as_str()))
            .order_by_desc(offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_filtered(&self, filter: &OfferFilter) -> Result<Vec<OfferModel>> {
        let mut query = Offer::find();

        if let Some(status) = filter.status {
            query = query.filter(offers::Column::Status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(offers::Column::Category.eq(category.as_str()));
        }
        if let Some(author_id) = &filter.author_id {
            query = query.filter(offers::Column::AuthorId.eq(author_id.as_str()));
        }

        Ok(query
            .order_by_desc(offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn count_by_status(&self, status: &str) -> Result<u64> {
        Ok(Offer::find()
            .filter(offers::Column::Status.eq(status))
            .count(self.base.db.as_ref())
            .await?)
    }
}
