use anyhow::Result;
use async_trait::async_trait;

use crate::models::{HelpOfferId, HelpRequestId};
use crate::services::commands::Command;
use crate::services::context::ServiceContext;
use crate::services::core::reconciliation::{ReconciliationReport, ReconciliationService};

/// Accept a help offer and draw down its request and source offer
pub struct AcceptHelpOfferCommand {
    pub ctx: ServiceContext,
    pub help_offer_id: HelpOfferId,
    pub accepted_quantity: String,
}

#[async_trait]
impl Command<ReconciliationReport> for AcceptHelpOfferCommand {
    async fn execute(&self) -> Result<ReconciliationReport> {
        Ok(ReconciliationService::accept_help_offer(
            &self.ctx,
            &self.help_offer_id,
            &self.accepted_quantity,
        )
        .await?)
    }
}

/// Confirm a help request and draw down its offer
pub struct ConfirmHelpRequestCommand {
    pub ctx: ServiceContext,
    pub help_request_id: HelpRequestId,
    pub confirmed_quantity: String,
}

#[async_trait]
impl Command<ReconciliationReport> for ConfirmHelpRequestCommand {
    async fn execute(&self) -> Result<ReconciliationReport> {
        Ok(ReconciliationService::confirm_help_request(
            &self.ctx,
            &self.help_request_id,
            &self.confirmed_quantity,
        )
        .await?)
    }
}
