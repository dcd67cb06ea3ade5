use sea_orm::{
    ActiveModelBehavior, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::db::entities::{Offer, OfferActiveModel, OfferModel, offers};
use crate::db::repository::{OfferRepository, Repository};
use crate::events::EventType;
use crate::models::{
    NewOffer, OfferFilter, OfferId, OfferPatch, OfferStatus, Quantity, RecordKind, UserId,
};
use crate::services::context::ServiceContext;
use crate::services::core::auth::AuthService;
use crate::utils::errors::AppError;

/// Donation offers posted by charities
pub struct OfferService;

impl OfferService {
    pub async fn create(
        ctx: &ServiceContext,
        author_id: &UserId,
        new_offer: NewOffer,
    ) -> Result<OfferModel, AppError> {
        let author = AuthService::get_user(ctx, author_id).await?;
        let quantity = Quantity::parse(&new_offer.quantity, ctx.quantity_policy)?;
        let now = chrono::Utc::now().naive_utc();

        let model = OfferModel {
            id: OfferId::generate().to_string(),
            title: new_offer.title,
            description: new_offer.description,
            category: new_offer.category.as_str().to_string(),
            quantity_amount: quantity.amount,
            quantity_unit: quantity.unit,
            delivery_location: new_offer.delivery_location,
            author_id: author.id,
            author_name: author.name,
            status: OfferStatus::Available.as_str().to_string(),
            image_url: new_offer.image_url,
            created_at: now,
            updated_at: now,
        };

        let offer = ctx.offers().insert(model).await?;
        info!("Created offer {} ({})", offer.id, offer.title);
        Ok(offer)
    }

    pub async fn get(ctx: &ServiceContext, id: &OfferId) -> Result<OfferModel, AppError> {
        ctx.offers()
            .find_by_id(id.as_str())
            .await?
            .ok_or_else(|| AppError::not_found(RecordKind::Offer, id))
    }

    pub async fn list(
        ctx: &ServiceContext,
        filter: &OfferFilter,
    ) -> Result<Vec<OfferModel>, AppError> {
        Ok(ctx.offers().find_filtered(filter).await?)
    }

    pub async fn list_available(ctx: &ServiceContext) -> Result<Vec<OfferModel>, AppError> {
        Ok(ctx.offers().find_available().await?)
    }

    /// Edit descriptive fields, writing only the patched columns
    pub async fn update(
        ctx: &ServiceContext,
        id: &OfferId,
        patch: OfferPatch,
    ) -> Result<OfferModel, AppError> {
        let quantity = patch
            .quantity
            .as_deref()
            .map(|text| Quantity::parse(text, ctx.quantity_policy))
            .transpose()?;

        let mut active = <OfferActiveModel as ActiveModelBehavior>::new();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(category) = patch.category {
            active.category = Set(category.as_str().to_string());
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
        find_offer(&txn, id).await?;
        Offer::update_many()
            .set(active)
            .filter(offers::Column::Id.eq(id.as_str()))
            .exec(&txn)
            .await?;
        let offer = find_offer(&txn, id).await?;
        txn.commit().await?;

        debug!("Edited offer {}", offer.id);
        ctx.publish_record(
            EventType::OfferUpdated,
            RecordKind::Offer,
            &offer.id,
            &offer.status,
            Some(offer.quantity_text()),
        )
        .await;
        Ok(offer)
    }

    /// Close an offer. Checked and written in one transaction against the
    /// status that was read.
    pub async fn update_status(
        ctx: &ServiceContext,
        id: &OfferId,
        status: OfferStatus,
    ) -> Result<OfferModel, AppError> {
        let txn = ctx.db.begin().await?;
        let offer = find_offer(&txn, id).await?;
        let current = parse_status(&offer)?;

        if !current.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                kind: RecordKind::Offer,
                id: offer.id,
                from: current.to_string(),
                to: status.to_string(),
            });
        }

        let mut active = <OfferActiveModel as ActiveModelBehavior>::new();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let written = Offer::update_many()
            .set(active)
            .filter(offers::Column::Id.eq(offer.id.as_str()))
            .filter(offers::Column::Status.eq(offer.status.as_str()))
            .exec(&txn)
            .await?;

        if written.rows_affected == 0 {
            let moved = find_offer(&txn, id).await?;
            return Err(AppError::InvalidTransition {
                kind: RecordKind::Offer,
                id: moved.id,
                from: moved.status,
                to: status.to_string(),
            });
        }

        let offer = find_offer(&txn, id).await?;
        txn.commit().await?;

        info!("Offer {} moved {} -> {}", offer.id, current, status);
        ctx.publish_record(
            EventType::OfferUpdated,
            RecordKind::Offer,
            &offer.id,
            &offer.status,
            Some(offer.quantity_text()),
        )
        .await;
        Ok(offer)
    }
}

async fn find_offer<C: ConnectionTrait>(db: &C, id: &OfferId) -> Result<OfferModel, AppError> {
    Offer::find_by_id(id.as_str())
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(RecordKind::Offer, id))
}

pub(crate) fn parse_status(offer: &OfferModel) -> Result<OfferStatus, AppError> {
    offer.get_status().map_err(|_| AppError::InvalidValue {
        field: "offer.status",
        value: offer.status.clone(),
    })
}
