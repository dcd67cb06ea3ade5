use std::sync::Arc;

use aidbridge::db::Database;
use aidbridge::db::entities::{OfferModel, RequestModel, UserModel};
use aidbridge::events::EventBus;
use aidbridge::models::{
    Category, NewHelpOffer, NewHelpRequest, NewOffer, NewRequest, NewUser, OfferId, Priority,
    UserId, UserType,
};
use aidbridge::services::ServiceContext;
use aidbridge::services::core::{AuthService, HelpService, OfferService, RequestService};
use tempfile::TempDir;

pub struct TestContext {
    pub ctx: ServiceContext,
    pub bus: Arc<EventBus>,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let db = Database::connect(&db_path)
            .await
            .expect("Failed to connect to test database");
        db.migrate().await.expect("Failed to run migrations");

        let bus = Arc::new(EventBus::new(64));
        let ctx = ServiceContext::new(db.get_connection()).with_events(bus.clone());

        Self {
            ctx,
            bus,
            _temp_dir: temp_dir,
        }
    }

    pub async fn register(&self, email: &str, user_type: UserType, name: &str) -> UserModel {
        AuthService::register(
            &self.ctx,
            NewUser {
                email: email.to_string(),
                password: "123456".to_string(),
                user_type,
                name: name.to_string(),
            },
        )
        .await
        .expect("Failed to register user")
    }

    pub async fn military(&self) -> UserModel {
        self.register("military@army.ua", UserType::Military, "72-га механізована бригада")
            .await
    }

    pub async fn charity(&self) -> UserModel {
        self.register(
            "volunteer@help.org",
            UserType::Charity,
            "Благодійний фонд \"Допомога\"",
        )
        .await
    }

    pub async fn request(&self, author: &UserModel, quantity: &str) -> RequestModel {
        RequestService::create(
            &self.ctx,
            &user_id(author),
            NewRequest {
                title: "Медичне обладнання".to_string(),
                description: "Потрібні медичні бинти, знеболюючі, антисептики".to_string(),
                category: Category::Medical,
                priority: Priority::Critical,
                quantity: quantity.to_string(),
                delivery_location: None,
                image_url: None,
            },
        )
        .await
        .expect("Failed to create request")
    }

    pub async fn offer(&self, author: &UserModel, title: &str, quantity: &str) -> OfferModel {
        OfferService::create(
            &self.ctx,
            &user_id(author),
            NewOffer {
                title: title.to_string(),
                description: "Маємо в наявності".to_string(),
                category: Category::Medical,
                quantity: quantity.to_string(),
                delivery_location: None,
                image_url: None,
            },
        )
        .await
        .expect("Failed to create offer")
    }

    pub async fn help_offer(
        &self,
        volunteer: &UserModel,
        request: &RequestModel,
        quantity: &str,
        offer_id: Option<&str>,
    ) -> String {
        HelpService::offer_help(
            &self.ctx,
            &user_id(volunteer),
            &request.id.as_str().into(),
            NewHelpOffer {
                available_quantity: quantity.to_string(),
                offer_id: offer_id.map(OfferId::from),
                contact_info: "+380 50 000 0000".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to submit help offer")
        .id
    }

    pub async fn help_request(
        &self,
        military: &UserModel,
        offer: &OfferModel,
        quantity: &str,
    ) -> String {
        HelpService::request_help(
            &self.ctx,
            &user_id(military),
            &offer.id.as_str().into(),
            NewHelpRequest {
                requested_quantity: quantity.to_string(),
                contact_info: "комбат".to_string(),
                message: None,
            },
        )
        .await
        .expect("Failed to submit help request")
        .id
    }

    pub async fn reload_request(&self, request: &RequestModel) -> RequestModel {
        RequestService::get(&self.ctx, &request.id.as_str().into())
            .await
            .expect("Request vanished")
    }

    pub async fn reload_offer(&self, offer: &OfferModel) -> OfferModel {
        OfferService::get(&self.ctx, &offer.id.as_str().into())
            .await
            .expect("Offer vanished")
    }
}

pub fn user_id(user: &UserModel) -> UserId {
    UserId::from(user.id.as_str())
}
