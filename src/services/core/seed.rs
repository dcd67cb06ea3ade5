use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::entities::{OfferModel, RequestModel, UserModel};
use crate::db::repository::{Repository, UserRepository};
use crate::events::EventType;
use crate::models::{
    Category, NewUser, OfferId, OfferStatus, Priority, RequestId, RequestStatus, UserType,
};
use crate::services::context::ServiceContext;
use crate::services::core::auth::AuthService;
use crate::utils::errors::AppError;

const DEMO_PASSWORD: &str = "123456";
const MILITARY_EMAIL: &str = "military@army.ua";
const CHARITY_EMAIL: &str = "volunteer@help.org";

/// What one seeding pass inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: u64,
    pub requests: u64,
    pub offers: u64,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        self.users + self.requests + self.offers == 0
    }
}

/// Demo accounts and records for a fresh store
pub struct SeedService;

impl SeedService {
    /// Fill each empty table with demo rows. Tables that already hold data
    /// are left alone, so running this twice inserts nothing the second time.
    pub async fn initialize(ctx: &ServiceContext) -> Result<SeedSummary, AppError> {
        let mut summary = SeedSummary::default();

        if ctx.users().count().await? == 0 {
            for (email, user_type, name) in [
                (MILITARY_EMAIL, UserType::Military, "72-га механізована бригада"),
                (CHARITY_EMAIL, UserType::Charity, "Благодійний фонд \"Допомога\""),
            ] {
                let new_user = NewUser {
                    email: email.to_string(),
                    password: DEMO_PASSWORD.to_string(),
                    user_type,
                    name: name.to_string(),
                };
                AuthService::create_user(ctx, new_user, true).await?;
                summary.users += 1;
            }
        }

        if ctx.requests().count().await? == 0 {
            match ctx.users().find_by_email(MILITARY_EMAIL).await? {
                Some(military) => {
                    let requests = ctx.requests();
                    for request in demo_requests(&military) {
                        requests.insert(request).await?;
                        summary.requests += 1;
                    }
                }
                None => debug!("Demo military account missing, not seeding requests"),
            }
        }

        if ctx.offers().count().await? == 0 {
            match ctx.users().find_by_email(CHARITY_EMAIL).await? {
                Some(charity) => {
                    ctx.offers().insert(demo_offer(&charity)).await?;
                    summary.offers += 1;
                }
                None => debug!("Demo charity account missing, not seeding offers"),
            }
        }

        if summary.is_empty() {
            debug!("Store already populated, nothing seeded");
        } else {
            info!(
                "Seeded {} users, {} requests, {} offers",
                summary.users, summary.requests, summary.offers
            );
            if let Some(bus) = &ctx.events
                && let Err(e) = bus
                    .emit_system(
                        EventType::DemoDataSeeded,
                        "Demo data seeded".to_string(),
                        serde_json::to_value(summary).ok(),
                    )
                    .await
            {
                warn!("Failed to publish DemoDataSeeded event: {}", e);
            }
        }

        Ok(summary)
    }
}

fn demo_requests(military: &UserModel) -> Vec<RequestModel> {
    let now = chrono::Utc::now().naive_utc();
    let request = |title: &str,
                   description: &str,
                   category: Category,
                   priority: Priority,
                   status: RequestStatus,
                   amount: i64| RequestModel {
        id: RequestId::generate().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.as_str().to_string(),
        priority: priority.as_str().to_string(),
        quantity_amount: amount,
        quantity_unit: "комплектів".to_string(),
        delivery_location: None,
        author_id: military.id.clone(),
        author_name: military.name.clone(),
        status: status.as_str().to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    };

    let mut radios = request(
        "Засоби зв'язку",
        "Потрібні рації, антени, батареї",
        Category::Communication,
        Priority::NonCritical,
        RequestStatus::Completed,
        20,
    );
    radios.created_at = now - Duration::days(1);

    vec![
        request(
            "Медичне обладнання",
            "Потрібні медичні бинти, знеболюючі, антисептики",
            Category::Medical,
            Priority::Critical,
            RequestStatus::Pending,
            50,
        ),
        radios,
    ]
}

fn demo_offer(charity: &UserModel) -> OfferModel {
    let now = chrono::Utc::now().naive_utc();
    OfferModel {
        id: OfferId::generate().to_string(),
        title: "Медичні препарати".to_string(),
        description: "Маємо в наявності антисептики, бинти, знеболюючі".to_string(),
        category: Category::Medical.as_str().to_string(),
        quantity_amount: 100,
        quantity_unit: "комплектів".to_string(),
        delivery_location: None,
        author_id: charity.id.clone(),
        author_name: charity.name.clone(),
        status: OfferStatus::Available.as_str().to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}
