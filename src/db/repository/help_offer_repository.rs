use super::{BaseRepository, Repository};
use crate::db::entities::{HelpOffer, HelpOfferActiveModel, HelpOfferModel, help_offers};
use crate::events::{event_bus::EventBus, types::EventType};
use crate::models::{HelpOfferStatus, RecordKind};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// Repository trait for HelpOffer entities
#[async_trait]
pub trait HelpOfferRepository: Repository<HelpOfferModel> {
    /// Help offered against one request
    async fn find_by_request(&self, request_id: &str) -> Result<Vec<HelpOfferModel>>;

    /// Help offered to one military author
    async fn find_by_military(&self, military_id: &str) -> Result<Vec<HelpOfferModel>>;

    /// Help offered by one volunteer
    async fn find_by_volunteer(&self, volunteer_id: &str) -> Result<Vec<HelpOfferModel>>;

    /// Count help offers still awaiting a decision
    async fn count_pending(&self) -> Result<u64>;
}

#[derive(Debug)]
pub struct HelpOfferRepositoryImpl {
    base: BaseRepository,
}

impl HelpOfferRepositoryImpl {
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
impl Repository<HelpOfferModel> for HelpOfferRepositoryImpl {
    type Entity = HelpOffer;

    async fn find_by_id(&self, id: &str) -> Result<Option<HelpOfferModel>> {
        Ok(HelpOffer::find_by_id(id).one(self.base.db.as_ref()).await?)
    }

    async fn find_all(&self) -> Result<Vec<HelpOfferModel>> {
        Ok(HelpOffer::find()
            .order_by_desc(help_offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn insert(&self, entity: HelpOfferModel) -> Result<HelpOfferModel> {
        let now = chrono::Utc::now().naive_utc();
        let active_model = HelpOfferActiveModel {
            id: Set(entity.id),
            request_id: Set(entity.request_id),
            request_title: Set(entity.request_title),
            offer_id: Set(entity.offer_id),
            volunteer_id: Set(entity.volunteer_id),
            volunteer_name: Set(entity.volunteer_name),
            military_id: Set(entity.military_id),
            military_name: Set(entity.military_name),
            available_quantity: Set(entity.available_quantity),
            delivery_date: Set(entity.delivery_date),
            contact_info: Set(entity.contact_info),
            message: Set(entity.message),
            status: Set(entity.status),
            accepted_quantity: Set(entity.accepted_quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = active_model.insert(self.base.db.as_ref()).await?;
        tracing::debug!(
            "Inserted help offer {} for request {}",
            result.id,
            result.request_id
        );

        self.base
            .publish_record(
                EventType::HelpOfferCreated,
                RecordKind::HelpOffer,
                &result.id,
                &result.status,
                Some(result.available_quantity.clone()),
            )
            .await;

        Ok(result)
    }

    async fn update(&self, entity: HelpOfferModel) -> Result<HelpOfferModel> {
        let active_model = HelpOfferActiveModel {
            id: Unchanged(entity.id),
            request_id: Unchanged(entity.request_id),
            request_title: Unchanged(entity.request_title),
            offer_id: Set(entity.offer_id),
            volunteer_id: Unchanged(entity.volunteer_id),
            volunteer_name: Unchanged(entity.volunteer_name),
            military_id: Unchanged(entity.military_id),
            military_name: Unchanged(entity.military_name),
            available_quantity: Set(entity.available_quantity),
            delivery_date: Set(entity.delivery_date),
            contact_info: Set(entity.contact_info),
            message: Set(entity.message),
            status: Set(entity.status),
            accepted_quantity: Set(entity.accepted_quantity),
            created_at: Unchanged(entity.created_at),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        let result = active_model.update(self.base.db.as_ref()).await?;

        self.base
            .publish_record(
                EventType::HelpOfferUpdated,
                RecordKind::HelpOffer,
                &result.id,
                &result.status,
                Some(result.available_quantity.clone()),
            )
            .await;

        Ok(result)
    }

    async fn count(&self) -> Result<u64> {
        Ok(HelpOffer::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl HelpOfferRepository for HelpOfferRepositoryImpl {
    async fn find_by_request(&self, request_id: &str) -> Result<Vec<HelpOfferModel>> {
        Ok(HelpOffer::find()
            .filter(help_offers::Column::RequestId.eq(request_id))
            .order_by_desc(help_offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_military(&self, military_id: &str) -> Result<Vec<HelpOfferModel>> {
        Ok(HelpOffer::find()
            .filter(help_offers::Column::MilitaryId.eq(military_id))
            .order_by_desc(help_offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_volunteer(&self, volunteer_id: &str) -> Result<Vec<HelpOfferModel>> {
        Ok(HelpOffer::find()
            .filter(help_offers::Column::VolunteerId.eq(volunteer_id))
            .order_by_desc(help_offers::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn count_pending(&self) -> Result<u64> {
        Ok(HelpOffer::find()
            .filter(help_offers::Column::Status.eq(HelpOfferStatus::Pending.as_str()))
            .count(self.base.db.as_ref())
            .await?)
    }
}
