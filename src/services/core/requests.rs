use sea_orm::{
    ActiveModelBehavior, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::db::entities::{Request, RequestActiveModel, RequestModel, requests};
use crate::db::repository::{Repository, RequestRepository};
use crate::events::EventType;
use crate::models::{
    NewRequest, Quantity, RecordKind, RequestFilter, RequestId, RequestPatch, RequestStatus,
    UserId,
};
use crate::services::context::ServiceContext;
use crate::services::core::auth::AuthService;
use crate::utils::errors::AppError;

/// Requests posted by military units
pub struct RequestService;

impl RequestService {
    pub async fn create(
        ctx: &ServiceContext,
        author_id: &UserId,
        new_request: NewRequest,
    ) -> Result<RequestModel, AppError> {
        let author = AuthService::get_user(ctx, author_id).await?;
        let quantity = Quantity::parse(&new_request.quantity, ctx.quantity_policy)?;
        let now = chrono::Utc::now().naive_utc();

        let model = RequestModel {
            id: RequestId::generate().to_string(),
            title: new_request.title,
            description: new_request.description,
            category: new_request.category.as_str().to_string(),
            priority: new_request.priority.as_str().to_string(),
            quantity_amount: quantity.amount,
            quantity_unit: quantity.unit,
            delivery_location: new_request.delivery_location,
            author_id: author.id,
            author_name: author.name,
            status: RequestStatus::Pending.as_str().to_string(),
            image_url: new_request.image_url,
            created_at: now,
            updated_at: now,
        };

        let request = ctx.requests().insert(model).await?;
        info!("Created request {} ({})", request.id, request.title);
        Ok(request)
    }

    pub async fn get(ctx: &ServiceContext, id: &RequestId) -> Result<RequestModel, AppError> {
        ctx.requests()
            .find_by_id(id.as_str())
            .await?
            .ok_or_else(|| AppError::not_found(RecordKind::Request, id))
    }

    /// Browse requests, newest first
    pub async fn list(
        ctx: &ServiceContext,
        filter: &RequestFilter,
    ) -> Result<Vec<RequestModel>, AppError> {
        Ok(ctx.requests().find_filtered(filter).await?)
    }

    /// An author's own requests: open ones first, then newest first within a status
    pub async fn list_for_author(
        ctx: &ServiceContext,
        author_id: &UserId,
    ) -> Result<Vec<RequestModel>, AppError> {
        let mut mine = ctx.requests().find_by_author(author_id.as_str()).await?;
        mine.sort_by(|a, b| {
            status_rank(a)
                .cmp(&status_rank(b))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(mine)
    }

    /// Edit descriptive fields. A new quantity text is re-parsed.
    ///
    /// Only the patched columns are written, so the status and remaining
    /// amount left by a concurrent reconciliation survive the edit.
    pub async fn update(
        ctx: &ServiceContext,
        id: &RequestId,
        patch: RequestPatch,
    ) -> Result<RequestModel, AppError> {
        let quantity = patch
            .quantity
            .as_deref()
            .map(|text| Quantity::parse(text, ctx.quantity_policy))
            .transpose()?;

        let mut active = <RequestActiveModel as ActiveModelBehavior>::new();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority.as_str().to_string());
        }
        if let Some(quantity) = quantity {
            active.quantity_amount = Set(quantity.amount);
            active.quantity_unit = Set(quantity.unit);
        }
        if let Some(location) = patch.delivery_location {
            active.delivery_location = Set(Some(location));
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(chrono::Utc::now().naive_utc());

        let txn = ctx.db.begin().await?;
        find_request(&txn, id).await?;
        Request::update_many()
            .set(active)
            .filter(requests::Column::Id.eq(id.as_str()))
            .exec(&txn)
            .await?;
        let request = find_request(&txn, id).await?;
        txn.commit().await?;

        debug!("Edited request {}", request.id);
        ctx.publish_record(
            EventType::RequestUpdated,
            RecordKind::Request,
            &request.id,
            &request.status,
            Some(request.quantity_text()),
        )
        .await;
        Ok(request)
    }

    /// Move a request forward through its lifecycle. The check and the write
    /// share one transaction, and the write only lands on the status that was
    /// checked.
    pub async fn update_status(
        ctx: &ServiceContext,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<RequestModel, AppError> {
        let txn = ctx.db.begin().await?;
        let request = find_request(&txn, id).await?;
        let current = parse_status(&request)?;

        if !current.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                kind: RecordKind::Request,
                id: request.id,
                from: current.to_string(),
                to: status.to_string(),
            });
        }

        let mut active = <RequestActiveModel as ActiveModelBehavior>::new();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let written = Request::update_many()
            .set(active)
            .filter(requests::Column::Id.eq(request.id.as_str()))
            .filter(requests::Column::Status.eq(request.status.as_str()))
            .exec(&txn)
            .await?;

        if written.rows_affected == 0 {
            let moved = find_request(&txn, id).await?;
            return Err(AppError::InvalidTransition {
                kind: RecordKind::Request,
                id: moved.id,
                from: moved.status,
                to: status.to_string(),
            });
        }

        let request = find_request(&txn, id).await?;
        txn.commit().await?;

        info!("Request {} moved {} -> {}", request.id, current, status);
        ctx.publish_record(
            EventType::RequestUpdated,
            RecordKind::Request,
            &request.id,
            &request.status,
            Some(request.quantity_text()),
        )
        .await;
        Ok(request)
    }
}

async fn find_request<C: ConnectionTrait>(
    db: &C,
    id: &RequestId,
) -> Result<RequestModel, AppError> {
    Request::find_by_id(id.as_str())
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(RecordKind::Request, id))
}

pub(crate) fn parse_status(request: &RequestModel) -> Result<RequestStatus, AppError> {
    request.get_status().map_err(|_| AppError::InvalidValue {
        field: "request.status",
        value: request.status.clone(),
    })
}

fn status_rank(request: &RequestModel) -> u8 {
    // Unknown statuses sort last
    request.get_status().map_or(u8::MAX, RequestStatus::sort_key)
}
