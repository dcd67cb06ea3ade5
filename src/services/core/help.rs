use tracing::info;

use crate::db::entities::{HelpOfferModel, HelpRequestModel};
use crate::db::repository::{HelpOfferRepository, HelpRequestRepository, Repository};
use crate::models::{
    HelpOfferId, HelpOfferPatch, HelpOfferStatus, HelpRequestId, HelpRequestPatch,
    HelpRequestStatus, NewHelpOffer, NewHelpRequest, OfferId, RecordKind, RequestId, UserId,
};
use crate::services::context::ServiceContext;
use crate::services::core::{auth::AuthService, offers::OfferService, requests::RequestService};
use crate::utils::errors::AppError;

/// Proposals exchanged around requests and offers before reconciliation
pub struct HelpService;

impl HelpService {
    /// A volunteer proposes to cover (part of) a request
    pub async fn offer_help(
        ctx: &ServiceContext,
        volunteer_id: &UserId,
        request_id: &RequestId,
        new_help: NewHelpOffer,
    ) -> Result<HelpOfferModel, AppError> {
        let volunteer = AuthService::get_user(ctx, volunteer_id).await?;
        let request = RequestService::get(ctx, request_id).await?;

        if let Some(offer_id) = &new_help.offer_id {
            // The named source offer must be the volunteer's own and still open
            let offer = OfferService::get(ctx, offer_id).await?;
            if offer.author_id != volunteer.id {
                return Err(AppError::InvalidValue {
                    field: "help_offer.offer_id",
                    value: offer.id,
                });
            }
            if !offer.is_available() {
                return Err(AppError::InvalidState {
                    kind: RecordKind::Offer,
                    id: offer.id,
                    status: offer.status,
                });
            }
        }

        let model = HelpOfferModel {
            id: HelpOfferId::generate().to_string(),
            request_id: request.id,
            request_title: request.title,
            offer_id: new_help.offer_id.map(|id| id.to_string()),
            volunteer_id: Some(volunteer.id),
            volunteer_name: Some(volunteer.name),
            military_id: request.author_id,
            military_name: request.author_name,
            available_quantity: new_help.available_quantity,
            delivery_date: new_help.delivery_date,
            contact_info: new_help.contact_info,
            message: new_help.message,
            status: HelpOfferStatus::Pending.as_str().to_string(),
            accepted_quantity: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let help_offer = ctx.help_offers().insert(model).await?;
        info!(
            "Help offer {} submitted for request {}",
            help_offer.id, help_offer.request_id
        );
        Ok(help_offer)
    }

    /// A military unit asks for (part of) an offer
    pub async fn request_help(
        ctx: &ServiceContext,
        military_id: &UserId,
        offer_id: &OfferId,
        new_help: NewHelpRequest,
    ) -> Result<HelpRequestModel, AppError> {
        let military = AuthService::get_user(ctx, military_id).await?;
        let offer = OfferService::get(ctx, offer_id).await?;

        let model = HelpRequestModel {
            id: HelpRequestId::generate().to_string(),
            offer_id: offer.id,
            offer_title: offer.title,
            military_id: military.id,
            military_name: military.name,
            charity_id: offer.author_id,
            charity_name: offer.author_name,
            requested_quantity: new_help.requested_quantity,
            contact_info: new_help.contact_info,
            message: new_help.message,
            status: HelpRequestStatus::Pending.as_str().to_string(),
            confirmed_quantity: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        };

        let help_request = ctx.help_requests().insert(model).await?;
        info!(
            "Help request {} submitted for offer {}",
            help_request.id, help_request.offer_id
        );
        Ok(help_request)
    }

    pub async fn get_help_offer(
        ctx: &ServiceContext,
        id: &HelpOfferId,
    ) -> Result<HelpOfferModel, AppError> {
        ctx.help_offers()
            .find_by_id(id.as_str())
            .await?
            .ok_or_else(|| AppError::not_found(RecordKind::HelpOffer, id))
    }

    pub async fn get_help_request(
        ctx: &ServiceContext,
        id: &HelpRequestId,
    ) -> Result<HelpRequestModel, AppError> {
        ctx.help_requests()
            .find_by_id(id.as_str())
            .await?
            .ok_or_else(|| AppError::not_found(RecordKind::HelpRequest, id))
    }

    pub async fn help_offers_for_request(
        ctx: &ServiceContext,
        request_id: &RequestId,
    ) -> Result<Vec<HelpOfferModel>, AppError> {
        Ok(ctx.help_offers().find_by_request(request_id.as_str()).await?)
    }

    /// Help offered to a military user's requests
    pub async fn help_offers_for_military(
        ctx: &ServiceContext,
        military_id: &UserId,
    ) -> Result<Vec<HelpOfferModel>, AppError> {
        Ok(ctx
            .help_offers()
            .find_by_military(military_id.as_str())
            .await?)
    }

    pub async fn help_offers_by_volunteer(
        ctx: &ServiceContext,
        volunteer_id: &UserId,
    ) -> Result<Vec<HelpOfferModel>, AppError> {
        Ok(ctx
            .help_offers()
            .find_by_volunteer(volunteer_id.as_str())
            .await?)
    }

    pub async fn help_requests_for_offer(
        ctx: &ServiceContext,
        offer_id: &OfferId,
    ) -> Result<Vec<HelpRequestModel>, AppError> {
        Ok(ctx.help_requests().find_by_offer(offer_id.as_str()).await?)
    }

    /// Help requested against a charity's offers
    pub async fn help_requests_for_charity(
        ctx: &ServiceContext,
        charity_id: &UserId,
    ) -> Result<Vec<HelpRequestModel>, AppError> {
        Ok(ctx
            .help_requests()
            .find_by_charity(charity_id.as_str())
            .await?)
    }

    pub async fn help_requests_by_military(
        ctx: &ServiceContext,
        military_id: &UserId,
    ) -> Result<Vec<HelpRequestModel>, AppError> {
        Ok(ctx
            .help_requests()
            .find_by_military(military_id.as_str())
            .await?)
    }

    pub async fn update_help_offer(
        ctx: &ServiceContext,
        id: &HelpOfferId,
        patch: HelpOfferPatch,
    ) -> Result<HelpOfferModel, AppError> {
        let mut help_offer = Self::get_help_offer(ctx, id).await?;

        if let Some(delivery_date) = patch.delivery_date {
            help_offer.delivery_date = Some(delivery_date);
        }
        if let Some(contact_info) = patch.contact_info {
            help_offer.contact_info = contact_info;
        }
        if let Some(message) = patch.message {
            help_offer.message = Some(message);
        }

        Ok(ctx.help_offers().update(help_offer).await?)
    }

    pub async fn update_help_request(
        ctx: &ServiceContext,
        id: &HelpRequestId,
        patch: HelpRequestPatch,
    ) -> Result<HelpRequestModel, AppError> {
        let mut help_request = Self::get_help_request(ctx, id).await?;

        if let Some(contact_info) = patch.contact_info {
            help_request.contact_info = contact_info;
        }
        if let Some(message) = patch.message {
            help_request.message = Some(message);
        }

        Ok(ctx.help_requests().update(help_request).await?)
    }
}
