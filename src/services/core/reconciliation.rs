//! Quantity reconciliation.
//!
//! Accepting a help offer or confirming a help request subtracts the agreed
//! amount from the Request and/or Offer it concerns, moving them to their
//! terminal status once nothing is left. Each call runs in one transaction;
//! misses along the way are collected as [`ReconciliationWarning`]s instead
//! of aborting.

use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, Set, TransactionTrait};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::db::entities::{
    HelpOffer, HelpOfferActiveModel, HelpOfferModel, HelpRequest, HelpRequestActiveModel,
    HelpRequestModel, Offer, OfferActiveModel, OfferModel, Request, RequestActiveModel,
    RequestModel,
};
use crate::db::repository::offer_repository::first_offer_by_author;
use crate::events::{EventSource, EventType};
use crate::models::{
    HelpOfferId, HelpOfferStatus, HelpRequestId, HelpRequestStatus, OfferStatus,
    QuantityAdjustment, RecordKind, RequestStatus,
};
use crate::services::context::ServiceContext;
use crate::services::core::{offers, requests};
use crate::utils::errors::AppError;

/// A half of a reconciliation that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconciliationWarning {
    HelpOfferNotFound { id: String },
    HelpRequestNotFound { id: String },
    RequestNotFound { id: String },
    OfferNotFound { id: String },
    /// The help offer names no source offer and none could be inferred
    NoSourceOffer { help_offer_id: String },
    RequestClosed { id: String, status: String },
    OfferClosed { id: String, status: String },
}

impl ReconciliationWarning {
    fn record(&self) -> (RecordKind, &str) {
        match self {
            ReconciliationWarning::HelpOfferNotFound { id } => (RecordKind::HelpOffer, id.as_str()),
            ReconciliationWarning::HelpRequestNotFound { id } => {
                (RecordKind::HelpRequest, id.as_str())
            }
            ReconciliationWarning::RequestNotFound { id }
            | ReconciliationWarning::RequestClosed { id, .. } => (RecordKind::Request, id.as_str()),
            ReconciliationWarning::OfferNotFound { id }
            | ReconciliationWarning::OfferClosed { id, .. } => (RecordKind::Offer, id.as_str()),
            ReconciliationWarning::NoSourceOffer { help_offer_id } => {
                (RecordKind::HelpOffer, help_offer_id.as_str())
            }
        }
    }
}

impl fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationWarning::HelpOfferNotFound { id } => {
                write!(f, "help offer {} not found", id)
            }
            ReconciliationWarning::HelpRequestNotFound { id } => {
                write!(f, "help request {} not found", id)
            }
            ReconciliationWarning::RequestNotFound { id } => write!(f, "request {} not found", id),
            ReconciliationWarning::OfferNotFound { id } => write!(f, "offer {} not found", id),
            ReconciliationWarning::NoSourceOffer { help_offer_id } => {
                write!(f, "no source offer for help offer {}", help_offer_id)
            }
            ReconciliationWarning::RequestClosed { id, status } => {
                write!(f, "request {} is already {}", id, status)
            }
            ReconciliationWarning::OfferClosed { id, status } => {
                write!(f, "offer {} is already {}", id, status)
            }
        }
    }
}

/// Records written by one reconciliation, plus whatever was skipped
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_offer: Option<HelpOfferModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_request: Option<HelpRequestModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<OfferModel>,
    pub warnings: Vec<ReconciliationWarning>,
}

impl ReconciliationReport {
    fn skipped(warning: ReconciliationWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Default::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub struct ReconciliationService;

impl ReconciliationService {
    /// Accept a pending help offer for `accepted_quantity`, drawing the amount
    /// down on its Request and on the Offer the help comes from.
    pub async fn accept_help_offer(
        ctx: &ServiceContext,
        help_offer_id: &HelpOfferId,
        accepted_quantity: &str,
    ) -> Result<ReconciliationReport, AppError> {
        let accepted = ctx.quantity_policy.parse_amount(accepted_quantity)?;
        let txn = ctx.db.begin().await?;

        let Some(help_offer) = HelpOffer::find_by_id(help_offer_id.as_str())
            .one(&txn)
            .await?
        else {
            let report = ReconciliationReport::skipped(ReconciliationWarning::HelpOfferNotFound {
                id: help_offer_id.to_string(),
            });
            txn.rollback().await?;
            publish(ctx, &report).await;
            return Ok(report);
        };

        if !help_offer.is_pending() {
            return Err(AppError::InvalidState {
                kind: RecordKind::HelpOffer,
                id: help_offer.id,
                status: help_offer.status,
            });
        }

        let mut report = ReconciliationReport::default();
        let request_id = help_offer.request_id.clone();
        let source = SourceOffer::of(&help_offer, ctx.author_fallback);

        let mut active: HelpOfferActiveModel = help_offer.into();
        active.status = Set(HelpOfferStatus::Accepted.as_str().to_string());
        active.accepted_quantity = Set(Some(accepted));
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let help_offer = active.update(&txn).await?;
        debug!("Help offer {} accepted for {}", help_offer.id, accepted);

        report.request = draw_down_request(&txn, &request_id, accepted, &mut report.warnings).await?;

        let offer = match source {
            SourceOffer::Explicit(offer_id) => {
                let found = Offer::find_by_id(offer_id.as_str()).one(&txn).await?;
                if found.is_none() {
                    report
                        .warnings
                        .push(ReconciliationWarning::OfferNotFound { id: offer_id });
                }
                found
            }
            SourceOffer::AuthoredBy(volunteer_id) => {
                let found = first_offer_by_author(&txn, &volunteer_id).await?;
                if found.is_none() {
                    report.warnings.push(ReconciliationWarning::NoSourceOffer {
                        help_offer_id: help_offer.id.clone(),
                    });
                }
                found
            }
            SourceOffer::Unknown => {
                report.warnings.push(ReconciliationWarning::NoSourceOffer {
                    help_offer_id: help_offer.id.clone(),
                });
                None
            }
        };
        if let Some(offer) = offer {
            report.offer = draw_down_offer(&txn, offer, accepted, &mut report.warnings).await?;
        }

        txn.commit().await?;
        report.help_offer = Some(help_offer);

        info!(
            "Accepted help offer {} ({} warnings)",
            help_offer_id,
            report.warnings.len()
        );
        publish(ctx, &report).await;
        Ok(report)
    }

    /// Confirm a pending help request for `confirmed_quantity`, drawing the
    /// amount down on the Offer it was made against.
    pub async fn confirm_help_request(
        ctx: &ServiceContext,
        help_request_id: &HelpRequestId,
        confirmed_quantity: &str,
    ) -> Result<ReconciliationReport, AppError> {
        let confirmed = ctx.quantity_policy.parse_amount(confirmed_quantity)?;
        let txn = ctx.db.begin().await?;

        let Some(help_request) = HelpRequest::find_by_id(help_request_id.as_str())
            .one(&txn)
            .await?
        else {
            let report =
                ReconciliationReport::skipped(ReconciliationWarning::HelpRequestNotFound {
                    id: help_request_id.to_string(),
                });
            txn.rollback().await?;
            publish(ctx, &report).await;
            return Ok(report);
        };

        if !help_request.is_pending() {
            return Err(AppError::InvalidState {
                kind: RecordKind::HelpRequest,
                id: help_request.id,
                status: help_request.status,
            });
        }

        let mut report = ReconciliationReport::default();
        let offer_id = help_request.offer_id.clone();

        let mut active: HelpRequestActiveModel = help_request.into();
        active.status = Set(HelpRequestStatus::Confirmed.as_str().to_string());
        active.confirmed_quantity = Set(Some(confirmed));
        active.updated_at = Set(chrono::Utc::now().naive_utc());
        let help_request = active.update(&txn).await?;
        debug!("Help request {} confirmed for {}", help_request.id, confirmed);

        match Offer::find_by_id(offer_id.as_str()).one(&txn).await? {
            Some(offer) => {
                report.offer =
                    draw_down_offer(&txn, offer, confirmed, &mut report.warnings).await?;
            }
            None => report
                .warnings
                .push(ReconciliationWarning::OfferNotFound { id: offer_id }),
        }

        txn.commit().await?;
        report.help_request = Some(help_request);

        info!(
            "Confirmed help request {} ({} warnings)",
            help_request_id,
            report.warnings.len()
        );
        publish(ctx, &report).await;
        Ok(report)
    }
}

/// Where the offer side of an accepted help offer comes from
enum SourceOffer {
    Explicit(String),
    AuthoredBy(String),
    Unknown,
}

impl SourceOffer {
    fn of(help_offer: &HelpOfferModel, author_fallback: bool) -> Self {
        match (&help_offer.offer_id, &help_offer.volunteer_id) {
            (Some(offer_id), _) => SourceOffer::Explicit(offer_id.clone()),
            (None, Some(volunteer_id)) if author_fallback => {
                SourceOffer::AuthoredBy(volunteer_id.clone())
            }
            _ => SourceOffer::Unknown,
        }
    }
}

async fn draw_down_request(
    txn: &DatabaseTransaction,
    request_id: &str,
    amount: i64,
    warnings: &mut Vec<ReconciliationWarning>,
) -> Result<Option<RequestModel>, AppError> {
    let Some(request) = Request::find_by_id(request_id).one(txn).await? else {
        warnings.push(ReconciliationWarning::RequestNotFound {
            id: request_id.to_string(),
        });
        return Ok(None);
    };

    let status = requests::parse_status(&request)?;
    if status.is_terminal() {
        warnings.push(ReconciliationWarning::RequestClosed {
            id: request.id,
            status: request.status,
        });
        return Ok(None);
    }

    let adjustment = request.quantity().adjust(amount);
    let mut active: RequestActiveModel = request.into();
    match adjustment {
        QuantityAdjustment::Depleted => {
            active.status = Set(RequestStatus::Completed.as_str().to_string());
        }
        QuantityAdjustment::Remaining(left) => {
            active.quantity_amount = Set(left);
            active.status = Set(RequestStatus::InProgress.as_str().to_string());
        }
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let request = active.update(txn).await?;
    debug!(
        "Request {} now {} ({})",
        request.id,
        request.status,
        request.quantity_text()
    );
    Ok(Some(request))
}

async fn draw_down_offer(
    txn: &DatabaseTransaction,
    offer: OfferModel,
    amount: i64,
    warnings: &mut Vec<ReconciliationWarning>,
) -> Result<Option<OfferModel>, AppError> {
    let status = offers::parse_status(&offer)?;
    if status.is_terminal() {
        warnings.push(ReconciliationWarning::OfferClosed {
            id: offer.id,
            status: offer.status,
        });
        return Ok(None);
    }

    let adjustment = offer.quantity().adjust(amount);
    let mut active: OfferActiveModel = offer.into();
    match adjustment {
        QuantityAdjustment::Depleted => {
            active.status = Set(OfferStatus::Exhausted.as_str().to_string());
        }
        QuantityAdjustment::Remaining(left) => {
            active.quantity_amount = Set(left);
        }
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    let offer = active.update(txn).await?;
    debug!(
        "Offer {} now {} ({})",
        offer.id,
        offer.status,
        offer.quantity_text()
    );
    Ok(Some(offer))
}

/// Log skipped halves and announce committed changes
async fn publish(ctx: &ServiceContext, report: &ReconciliationReport) {
    for warning in &report.warnings {
        warn!("Reconciliation skipped: {}", warning);
    }

    let Some(bus) = &ctx.events else {
        return;
    };
    let source = || EventSource::Service("reconciliation".to_string());

    let mut results = Vec::new();
    if let Some(help_offer) = &report.help_offer {
        results.push(
            bus.emit_record(
                EventType::HelpOfferAccepted,
                RecordKind::HelpOffer,
                help_offer.id.clone(),
                help_offer.status.clone(),
                help_offer.accepted_quantity.map(|n| n.to_string()),
                source(),
            )
            .await,
        );
    }
    if let Some(help_request) = &report.help_request {
        results.push(
            bus.emit_record(
                EventType::HelpRequestConfirmed,
                RecordKind::HelpRequest,
                help_request.id.clone(),
                help_request.status.clone(),
                help_request.confirmed_quantity.map(|n| n.to_string()),
                source(),
            )
            .await,
        );
    }
    if let Some(request) = &report.request {
        results.push(
            bus.emit_record(
                EventType::RequestUpdated,
                RecordKind::Request,
                request.id.clone(),
                request.status.clone(),
                Some(request.quantity_text()),
                source(),
            )
            .await,
        );
    }
    if let Some(offer) = &report.offer {
        results.push(
            bus.emit_record(
                EventType::OfferUpdated,
                RecordKind::Offer,
                offer.id.clone(),
                offer.status.clone(),
                Some(offer.quantity_text()),
                source(),
            )
            .await,
        );
    }
    for warning in &report.warnings {
        let (kind, id) = warning.record();
        results.push(
            bus.emit_reconciliation_skipped(kind, id.to_string(), warning.to_string())
                .await,
        );
    }

    for result in results {
        if let Err(e) = result {
            warn!("Failed to publish reconciliation event: {}", e);
        }
    }
}
