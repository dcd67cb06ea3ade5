use aidbridge::AppError;
use aidbridge::models::{
    Category, HelpOfferPatch, NewUser, OfferFilter, OfferId, OfferStatus, Priority, RequestFilter,
    RequestId, RequestPatch, RequestStatus, UserType,
};
use aidbridge::services::core::{
    AuthService, HelpService, OfferService, ReconciliationService, RequestService, SeedService,
    StatisticsService,
};

use crate::common::{TestContext, user_id};

#[tokio::test]
async fn test_register_and_login() {
    let t = TestContext::new().await;
    let military = t.military().await;
    assert!(!military.verified);
    assert_eq!(military.get_user_type(), Ok(UserType::Military));

    let logged_in = AuthService::login(&t.ctx, "  Military@Army.UA ", "123456")
        .await
        .unwrap();
    assert_eq!(logged_in.id, military.id);

    let err = AuthService::login(&t.ctx, "military@army.ua", "654321")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let err = AuthService::login(&t.ctx, "nobody@army.ua", "123456")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let t = TestContext::new().await;
    t.military().await;

    let err = AuthService::register(
        &t.ctx,
        NewUser {
            email: "MILITARY@army.ua".to_string(),
            password: "secret".to_string(),
            user_type: UserType::Charity,
            name: "Хтось".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_seed_runs_once() {
    let t = TestContext::new().await;

    let first = SeedService::initialize(&t.ctx).await.unwrap();
    assert_eq!(first.users, 2);
    assert_eq!(first.requests, 2);
    assert_eq!(first.offers, 1);

    let second = SeedService::initialize(&t.ctx).await.unwrap();
    assert!(second.is_empty());

    let military = AuthService::login(&t.ctx, "military@army.ua", "123456")
        .await
        .unwrap();
    assert!(military.verified);
}

#[tokio::test]
async fn test_seeded_store_statistics() {
    let t = TestContext::new().await;
    SeedService::initialize(&t.ctx).await.unwrap();

    let stats = StatisticsService::collect(&t.ctx).await.unwrap();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.completed_requests, 1);
    assert_eq!(stats.active_requests, 1);
    assert_eq!(stats.total_offers, 1);
    assert_eq!(stats.available_offers, 1);
    assert_eq!(stats.completion_rate, 50);
}

#[tokio::test]
async fn test_statistics_follow_reconciliation() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "20 комплектів").await;
    t.request(&military, "5 штук").await;
    let offer = t.offer(&charity, "Бинти", "20 комплектів").await;
    let help_offer = t.help_offer(&charity, &request, "20", None).await;
    t.help_request(&military, &offer, "3").await;

    let before = StatisticsService::collect(&t.ctx).await.unwrap();
    assert_eq!(before.completion_rate, 0);
    assert_eq!(before.pending_help_offers, 1);
    assert_eq!(before.pending_help_requests, 1);

    ReconciliationService::accept_help_offer(&t.ctx, &help_offer.as_str().into(), "20")
        .await
        .unwrap();

    let after = StatisticsService::collect(&t.ctx).await.unwrap();
    assert_eq!(after.completed_requests, 1);
    assert_eq!(after.active_requests, 1);
    assert_eq!(after.completion_rate, 50);
    assert_eq!(after.available_offers, 0);
    assert_eq!(after.pending_help_offers, 0);
    assert_eq!(after.pending_help_requests, 1);
}

#[tokio::test]
async fn test_empty_store_statistics() {
    let t = TestContext::new().await;
    let stats = StatisticsService::collect(&t.ctx).await.unwrap();
    assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn test_request_status_only_moves_forward() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let request = t.request(&military, "50 комплектів").await;
    let id = RequestId::from(request.id.as_str());

    let updated = RequestService::update_status(&t.ctx, &id, RequestStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(updated.get_status(), Ok(RequestStatus::InProgress));

    let err = RequestService::update_status(&t.ctx, &id, RequestStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    RequestService::update_status(&t.ctx, &id, RequestStatus::Completed)
        .await
        .unwrap();
    let err = RequestService::update_status(&t.ctx, &id, RequestStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_offer_cancel_is_final() {
    let t = TestContext::new().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Генератор", "2 штуки").await;
    let id = OfferId::from(offer.id.as_str());

    OfferService::update_status(&t.ctx, &id, OfferStatus::Cancelled)
        .await
        .unwrap();
    let err = OfferService::update_status(&t.ctx, &id, OfferStatus::Available)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
    assert!(OfferService::list_available(&t.ctx).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_request_patch_reparses_quantity() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let request = t.request(&military, "50 комплектів").await;

    let updated = RequestService::update(
        &t.ctx,
        &request.id.as_str().into(),
        RequestPatch {
            quantity: Some("75 пар".to_string()),
            priority: Some(Priority::NonCritical),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.quantity_amount, 75);
    assert_eq!(updated.quantity_unit, "пар");
    assert_eq!(updated.get_priority(), Ok(Priority::NonCritical));
    assert_eq!(updated.title, request.title);
}

#[tokio::test]
async fn test_filters_narrow_listings() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let open = t.request(&military, "50 комплектів").await;
    let done = t.request(&military, "10 штук").await;
    RequestService::update_status(&t.ctx, &done.id.as_str().into(), RequestStatus::Completed)
        .await
        .unwrap();
    t.offer(&charity, "Бинти", "100 комплектів").await;

    let pending = RequestService::list(
        &t.ctx,
        &RequestFilter {
            status: Some(RequestStatus::Pending),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, open.id);

    let by_author = RequestService::list(
        &t.ctx,
        &RequestFilter {
            author_id: Some(user_id(&military)),
            category: Some(Category::Medical),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_author.len(), 2);

    let none = OfferService::list(
        &t.ctx,
        &OfferFilter {
            category: Some(Category::Transport),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());

    // Own listing puts open requests ahead of finished ones
    let own = RequestService::list_for_author(&t.ctx, &user_id(&military))
        .await
        .unwrap();
    assert_eq!(own[0].id, open.id);
    assert_eq!(own[1].id, done.id);
}

#[tokio::test]
async fn test_help_listings_and_patch() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let offer = t.offer(&charity, "Бинти", "100 комплектів").await;
    let help_offer = t.help_offer(&charity, &request, "20", Some(offer.id.as_str())).await;
    t.help_request(&military, &offer, "10").await;

    let for_request =
        HelpService::help_offers_for_request(&t.ctx, &request.id.as_str().into())
            .await
            .unwrap();
    assert_eq!(for_request.len(), 1);
    assert_eq!(for_request[0].military_id, military.id);
    assert_eq!(for_request[0].offer_id.as_deref(), Some(offer.id.as_str()));

    let for_charity = HelpService::help_requests_for_charity(&t.ctx, &user_id(&charity))
        .await
        .unwrap();
    assert_eq!(for_charity.len(), 1);
    assert_eq!(for_charity[0].offer_title, "Бинти");

    let patched = HelpService::update_help_offer(
        &t.ctx,
        &help_offer.as_str().into(),
        HelpOfferPatch {
            message: Some("Доставимо в четвер".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(patched.message.as_deref(), Some("Доставимо в четвер"));
    assert!(patched.is_pending());
}

#[tokio::test]
async fn test_help_offer_rejects_unknown_source_offer() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;

    let err = HelpService::offer_help(
        &t.ctx,
        &user_id(&charity),
        &request.id.as_str().into(),
        aidbridge::models::NewHelpOffer {
            available_quantity: "5".to_string(),
            offer_id: Some("missing".into()),
            contact_info: "тел".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
}
