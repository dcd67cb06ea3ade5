use super::{BaseRepository, Repository};
use crate::db::entities::{HelpRequest, HelpRequestActiveModel, HelpRequestModel, help_requests};
use crate::events::{event_bus::EventBus, types::EventType};
use crate::models::{HelpRequestStatus, RecordKind};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// Repository trait for HelpRequest entities
#[async_trait]
pub trait HelpRequestRepository: Repository<HelpRequestModel> {
    async fn find_by_offer(&self, offer_id: &str) -> Result<Vec<HelpRequestModel>>;

    async fn find_by_charity(&self, charity_id: &str) -> Result<Vec<HelpRequestModel>>;

    async fn find_by_military(&self, military_id: &str) -> Result<Vec<HelpRequestModel>>;

    async fn count_pending(&self) -> Result<u64>;
}

#[derive(Debug)]
pub struct HelpRequestRepositoryImpl {
    base: BaseRepository,
}

impl HelpRequestRepositoryImpl {
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
impl Repository<HelpRequestModel> for HelpRequestRepositoryImpl {
    type Entity = HelpRequest;

    async fn find_by_id(&self, id: &str) -> Result<Option<HelpRequestModel>> {
        Ok(HelpRequest::find_by_id(id)
            .one(self.base.db.as_ref())
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<HelpRequestModel>> {
        Ok(HelpRequest::find()
            .order_by_desc(help_requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn insert(&self, entity: HelpRequestModel) -> Result<HelpRequestModel> {
        let now = chrono::Utc::now().naive_utc();
        let active_model = HelpRequestActiveModel {
            id: Set(entity.id),
            offer_id: Set(entity.offer_id),
            offer_title: Set(entity.offer_title),
            military_id: Set(entity.military_id),
            military_name: Set(entity.military_name),
            charity_id: Set(entity.charity_id),
            charity_name: Set(entity.charity_name),
            requested_quantity: Set(entity.requested_quantity),
            contact_info: Set(entity.contact_info),
            message: Set(entity.message),
            status: Set(entity.status),
            confirmed_quantity: Set(entity.confirmed_quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = active_model.insert(self.base.db.as_ref()).await?;
        tracing::debug!(
            "Inserted help request {} for offer {}",
            result.id,
            result.offer_id
        );

        self.base
            .publish_record(
                EventType::HelpRequestCreated,
                RecordKind::HelpRequest,
                &result.id,
                &result.status,
                Some(result.requested_quantity.clone()),
            )
            .await;

        Ok(result)
    }

    async fn update(&self, entity: HelpRequestModel) -> Result<HelpRequestModel> {
        let active_model = HelpRequestActiveModel {
            id: Unchanged(entity.id),
            offer_id: Unchanged(entity.offer_id),
            offer_title: Unchanged(entity.offer_title),
            military_id: Unchanged(entity.military_id),
            military_name: Unchanged(entity.military_name),
            charity_id: Unchanged(entity.charity_id),
            charity_name: Unchanged(entity.charity_name),
            requested_quantity: Set(entity.requested_quantity),
            contact_info: Set(entity.contact_info),
            message: Set(entity.message),
            status: Set(entity.status),
            confirmed_quantity: Set(entity.confirmed_quantity),
            created_at: Unchanged(entity.created_at),
            updated_at: Set(chrono::Utc::now().naive_utc()),
        };

        let result = active_model.update(self.base.db.as_ref()).await?;

        self.base
            .publish_record(
                EventType::HelpRequestUpdated,
                RecordKind::HelpRequest,
                &result.id,
                &result.status,
                Some(result.requested_quantity.clone()),
            )
            .await;

        Ok(result)
    }

    async fn count(&self) -> Result<u64> {
        Ok(HelpRequest::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl HelpRequestRepository for HelpRequestRepositoryImpl {
    async fn find_by_offer(&self, offer_id: &str) -> Result<Vec<HelpRequestModel>> {
        Ok(HelpRequest::find()
            .filter(help_requests::Column::OfferId.eq(offer_id))
            .order_by_desc(help_requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_charity(&self, charity_id: &str) -> Result<Vec<HelpRequestModel>> {
        Ok(HelpRequest::find()
            .filter(help_requests::Column::CharityId.eq(charity_id))
            .order_by_desc(help_requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_military(&self, military_id: &str) -> Result<Vec<HelpRequestModel>> {
        Ok(HelpRequest::find()
            .filter(help_requests::Column::MilitaryId.eq(military_id))
            .order_by_desc(help_requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn count_pending(&self) -> Result<u64> {
        Ok(HelpRequest::find()
            .filter(help_requests::Column::Status.eq(HelpRequestStatus::Pending.as_str()))
            .count(self.base.db.as_ref())
            .await?)
    }
}
