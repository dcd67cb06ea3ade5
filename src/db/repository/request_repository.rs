use super::{BaseRepository, Repository};
use crate::db::entities::{Request, RequestActiveModel, RequestModel, requests};
use crate::events::{event_bus::EventBus, types::EventType};
use crate::models::{RecordKind, RequestFilter};
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;

/// Repository trait for Request entities
#[async_trait]
pub trait RequestRepository: Repository<RequestModel> {
    /// Find requests posted by one author, newest first
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<RequestModel>>;

    /// Find requests in one status
    async fn find_by_status(&self, status: &str) -> Result<Vec<RequestModel>>;

    /// Find requests matching every set field of the filter, newest first
    async fn find_filtered(&self, filter: &RequestFilter) -> Result<Vec<RequestModel>>;

    /// Count requests in one status
    async fn count_by_status(&self, status: &str) -> Result<u64>;
}

#[derive(Debug)]
pub struct RequestRepositoryImpl {
    base: BaseRepository,
}

impl RequestRepositoryImpl {
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
impl Repository<RequestModel> for RequestRepositoryImpl {
    type Entity = Request;

    async fn find_by_id(&self, id: &str) -> Result<Option<RequestModel>> {
        Ok(Request::find_by_id(id).one(self.base.db.as_ref()).await?)
    }

    async fn find_all(&self) -> Result<Vec<RequestModel>> {
        Ok(Request::find()
            .order_by_desc(requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn insert(&self, entity: RequestModel) -> Result<RequestModel> {
        let active_model = RequestActiveModel {
            id: Set(entity.id),
            title: Set(entity.title),
            description: Set(entity.description),
            category: Set(entity.category),
            priority: Set(entity.priority),
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
        tracing::debug!("Inserted request {} ({})", result.id, result.title);

        self.base
            .publish_record(
                EventType::RequestCreated,
                RecordKind::Request,
                &result.id,
                &result.status,
                Some(result.quantity_text()),
            )
            .await;

        Ok(result)
    }

    async fn update(&self, entity: RequestModel) -> Result<RequestModel> {
        let active_model = RequestActiveModel {
            id: Unchanged(entity.id),
            title: Set(entity.title),
            description: Set(entity.description),
            category: Set(entity.category),
            priority: Set(entity.priority),
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
        tracing::debug!("Updated request {} -> {}", result.id, result.status);

        self.base
            .publish_record(
                EventType::RequestUpdated,
                RecordKind::Request,
                &result.id,
                &result.status,
                Some(result.quantity_text()),
            )
            .await;

        Ok(result)
    }

    async fn count(&self) -> Result<u64> {
        Ok(Request::find().count(self.base.db.as_ref()).await?)
    }
}

#[async_trait]
impl RequestRepository for RequestRepositoryImpl {
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<RequestModel>> {
        Ok(Request::find()
            .filter(requests::Column::AuthorId.eq(author_id))
            .order_by_desc(requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<RequestModel>> {
        Ok(Request::find()
            .filter(requests::Column::Status.eq(status))
            .order_by_desc(requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn find_filtered(&self, filter: &RequestFilter) -> Result<Vec<RequestModel>> {
        let mut query = Request::find();

        if let Some(status) = filter.status {
            query = query.filter(requests::Column::Status.eq(status.as_str()));
        }
        if let Some(category) = filter.category {
            query = query.filter(requests::Column::Category.eq(category.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(requests::Column::Priority.eq(priority.as_str()));
        }
        if let Some(author_id) = &filter.author_id {
            query = query.filter(requests::Column::AuthorId.eq(author_id.as_str()));
        }

        Ok(query
            .order_by_desc(requests::Column::CreatedAt)
            .all(self.base.db.as_ref())
            .await?)
    }

    async fn count_by_status(&self, status: &str) -> Result<u64> {
        Ok(Request::find()
            .filter(requests::Column::Status.eq(status))
            .count(self.base.db.as_ref())
            .await?)
    }
}
