use anyhow::Result;
use async_trait::async_trait;

use crate::models::Statistics;
use crate::services::commands::Command;
use crate::services::context::ServiceContext;
use crate::services::core::{SeedService, SeedSummary, StatisticsService};

/// Collect dashboard counters
pub struct GetStatisticsCommand {
    pub ctx: ServiceContext,
}

#[async_trait]
impl Command<Statistics> for GetStatisticsCommand {
    async fn execute(&self) -> Result<Statistics> {
        Ok(StatisticsService::collect(&self.ctx).await?)
    }
}

/// Insert demo rows into empty tables
pub struct SeedDemoDataCommand {
    pub ctx: ServiceContext,
}

#[async_trait]
impl Command<SeedSummary> for SeedDemoDataCommand {
    async fn execute(&self) -> Result<SeedSummary> {
        Ok(SeedService::initialize(&self.ctx).await?)
    }
}
