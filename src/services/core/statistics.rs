use crate::db::repository::{
    HelpOfferRepository, HelpRequestRepository, OfferRepository, Repository, RequestRepository,
};
use crate::models::{OfferStatus, RequestStatus, Statistics};
use crate::services::context::ServiceContext;
use crate::utils::errors::AppError;

/// Dashboard counters
pub struct StatisticsService;

impl StatisticsService {
    pub async fn collect(ctx: &ServiceContext) -> Result<Statistics, AppError> {
        let requests = ctx.requests();
        let offers = ctx.offers();

        let total_requests = requests.count().await?;
        let completed_requests = requests
            .count_by_status(RequestStatus::Completed.as_str())
            .await?;
        let pending = requests
            .count_by_status(RequestStatus::Pending.as_str())
            .await?;
        let in_progress = requests
            .count_by_status(RequestStatus::InProgress.as_str())
            .await?;

        Ok(Statistics {
            total_requests,
            completed_requests,
            active_requests: pending + in_progress,
            total_offers: offers.count().await?,
            available_offers: offers
                .count_by_status(OfferStatus::Available.as_str())
                .await?,
            pending_help_offers: ctx.help_offers().count_pending().await?,
            pending_help_requests: ctx.help_requests().count_pending().await?,
            completion_rate: completion_rate(completed_requests, total_requests),
        })
    }
}

/// Whole percent of completed requests, 0 when there are none
fn completion_rate(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}
