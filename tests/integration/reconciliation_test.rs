use aidbridge::AppError;
use aidbridge::db::entities::OfferModel;
use aidbridge::db::repository::{OfferRepositoryImpl, Repository};
use aidbridge::events::EventType;
use aidbridge::models::{
    HelpOfferId, HelpOfferStatus, HelpRequestId, HelpRequestStatus, OfferStatus, QuantityPolicy,
    RequestId, RequestStatus,
};
use aidbridge::services::core::{
    HelpService, ReconciliationService, ReconciliationWarning, RequestService,
};
use chrono::Duration;

use crate::common::TestContext;

fn help_offer_id(id: &str) -> HelpOfferId {
    HelpOfferId::from(id)
}

#[tokio::test]
async fn test_partial_acceptance_leaves_remainder_in_progress() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    let report = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();

    assert!(report.is_clean(), "warnings: {:?}", report.warnings);
    let help = report.help_offer.unwrap();
    assert_eq!(help.get_status(), Ok(HelpOfferStatus::Accepted));
    assert_eq!(help.accepted_quantity, Some(20));

    let request = t.reload_request(&request).await;
    assert_eq!(request.quantity_text(), "30 комплектів");
    assert_eq!(request.get_status(), Ok(RequestStatus::InProgress));

    // Fallback picked the volunteer's only offer
    let offer = t.reload_offer(&offer).await;
    assert_eq!(offer.quantity_text(), "80 комплектів");
    assert_eq!(offer.get_status(), Ok(OfferStatus::Available));
}

#[tokio::test]
async fn test_exact_acceptance_completes_request_without_touching_quantity() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "20 комплектів").await;
    t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();

    let request = t.reload_request(&request).await;
    assert_eq!(request.get_status(), Ok(RequestStatus::Completed));
    assert_eq!(request.quantity_text(), "20 комплектів");
}

#[tokio::test]
async fn test_oversized_confirmation_exhausts_offer() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_request(&military, &offer, "150").await;

    let report = ReconciliationService::confirm_help_request(
        &t.ctx,
        &HelpRequestId::from(help_id.as_str()),
        "150",
    )
    .await
    .unwrap();

    let help = report.help_request.unwrap();
    assert_eq!(help.get_status(), Ok(HelpRequestStatus::Confirmed));
    assert_eq!(help.confirmed_quantity, Some(150));
    assert!(report.request.is_none());

    let offer = t.reload_offer(&offer).await;
    assert_eq!(offer.get_status(), Ok(OfferStatus::Exhausted));
    assert_eq!(offer.quantity_text(), "100 комплектів");
}

#[tokio::test]
async fn test_partial_confirmation_keeps_offer_available() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_request(&military, &offer, "40").await;

    ReconciliationService::confirm_help_request(
        &t.ctx,
        &HelpRequestId::from(help_id.as_str()),
        "35 комплектів",
    )
    .await
    .unwrap();

    let offer = t.reload_offer(&offer).await;
    assert_eq!(offer.get_status(), Ok(OfferStatus::Available));
    assert_eq!(offer.quantity_text(), "65 комплектів");
}

#[tokio::test]
async fn test_unknown_help_offer_is_a_soft_miss() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let request = t.request(&military, "50 комплектів").await;

    let report = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id("nope"), "20")
        .await
        .unwrap();

    assert_eq!(
        report.warnings,
        vec![ReconciliationWarning::HelpOfferNotFound {
            id: "nope".to_string()
        }]
    );
    assert!(report.help_offer.is_none());
    assert_eq!(t.reload_request(&request).await, request);

    let report = ReconciliationService::confirm_help_request(
        &t.ctx,
        &HelpRequestId::from("nope"),
        "20",
    )
    .await
    .unwrap();
    assert!(matches!(
        report.warnings.as_slice(),
        [ReconciliationWarning::HelpRequestNotFound { .. }]
    ));
}

#[tokio::test]
async fn test_second_acceptance_is_rejected_and_changes_nothing() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();
    let request_after_first = t.reload_request(&request).await;
    let offer_after_first = t.reload_offer(&offer).await;

    let err = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState { .. }));

    assert_eq!(t.reload_request(&request).await, request_after_first);
    assert_eq!(t.reload_offer(&offer).await, offer_after_first);
}

#[tokio::test]
async fn test_second_confirmation_is_rejected() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = HelpRequestId::from(t.help_request(&military, &offer, "10").await.as_str());

    ReconciliationService::confirm_help_request(&t.ctx, &help_id, "10")
        .await
        .unwrap();
    let err = ReconciliationService::confirm_help_request(&t.ctx, &help_id, "10")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidState { .. }));
    assert_eq!(t.reload_offer(&offer).await.quantity_amount, 90);
}

async fn insert_dated_offer(
    t: &TestContext,
    template: OfferModel,
    title: &str,
    days_ago: i64,
) -> OfferModel {
    let mut offer = template;
    offer.id = uuid::Uuid::new_v4().to_string();
    offer.title = title.to_string();
    offer.created_at -= Duration::days(days_ago);
    OfferRepositoryImpl::new_without_events(t.ctx.db.clone())
        .insert(offer)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_explicit_offer_link_wins_over_author_fallback() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let newest = t.offer(&charity, "Ковдри", "40 штук").await;
    let oldest = insert_dated_offer(&t, newest.clone(), "Аптечки", 3).await;

    let help_id = t
        .help_offer(&charity, &request, "10", Some(newest.id.as_str()))
        .await;
    let report = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "10")
        .await
        .unwrap();

    assert_eq!(report.offer.unwrap().id, newest.id);
    assert_eq!(t.reload_offer(&newest).await.quantity_text(), "30 штук");
    assert_eq!(t.reload_offer(&oldest).await, oldest);
}

#[tokio::test]
async fn test_author_fallback_uses_oldest_offer() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let newest = t.offer(&charity, "Ковдри", "40 штук").await;
    let oldest = insert_dated_offer(&t, newest.clone(), "Аптечки", 3).await;

    let help_id = t.help_offer(&charity, &request, "10", None).await;
    ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "10")
        .await
        .unwrap();

    assert_eq!(t.reload_offer(&oldest).await.quantity_amount, 30);
    assert_eq!(t.reload_offer(&newest).await, newest);
}

#[tokio::test]
async fn test_disabled_fallback_skips_offer_side() {
    let t = TestContext::new().await;
    let ctx = t.ctx.clone().with_author_fallback(false);
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    let report = ReconciliationService::accept_help_offer(&ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();

    assert_eq!(
        report.warnings,
        vec![ReconciliationWarning::NoSourceOffer {
            help_offer_id: help_id.clone()
        }]
    );
    assert_eq!(t.reload_request(&request).await.quantity_amount, 30);
    assert_eq!(t.reload_offer(&offer).await, offer);
}

#[tokio::test]
async fn test_strict_policy_rejects_garbage_before_writing() {
    let t = TestContext::new().await;
    let ctx = t.ctx.clone().with_quantity_policy(QuantityPolicy::Strict);
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    let err = ReconciliationService::accept_help_offer(&ctx, &help_offer_id(&help_id), "abc")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidQuantity(_)));

    let help = HelpService::get_help_offer(&t.ctx, &help_offer_id(&help_id))
        .await
        .unwrap();
    assert!(help.is_pending());
    assert_eq!(t.reload_request(&request).await, request);
}

#[tokio::test]
async fn test_lenient_policy_counts_garbage_as_zero() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "трохи", None).await;

    let report = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "трохи")
        .await
        .unwrap();

    assert_eq!(report.help_offer.unwrap().accepted_quantity, Some(0));
    let request = t.reload_request(&request).await;
    assert_eq!(request.quantity_amount, 50);
    assert_eq!(request.get_status(), Ok(RequestStatus::InProgress));
}

#[tokio::test]
async fn test_closed_request_is_skipped_but_offer_still_drawn() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let offer = t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;
    RequestService::update_status(&t.ctx, &request.id.as_str().into(), RequestStatus::Cancelled)
        .await
        .unwrap();

    let report = ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();

    assert_eq!(
        report.warnings,
        vec![ReconciliationWarning::RequestClosed {
            id: request.id.clone(),
            status: "cancelled".to_string()
        }]
    );
    let request = t.reload_request(&request).await;
    assert_eq!(request.get_status(), Ok(RequestStatus::Cancelled));
    assert_eq!(request.quantity_amount, 50);
    assert_eq!(t.reload_offer(&offer).await.quantity_amount, 80);
}

#[tokio::test]
async fn test_exhausted_offer_is_not_reopened() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Медичні препарати", "10 комплектів").await;
    let first = HelpRequestId::from(t.help_request(&military, &offer, "10").await.as_str());
    let second = HelpRequestId::from(t.help_request(&military, &offer, "5").await.as_str());

    ReconciliationService::confirm_help_request(&t.ctx, &first, "10")
        .await
        .unwrap();
    let report = ReconciliationService::confirm_help_request(&t.ctx, &second, "5")
        .await
        .unwrap();

    assert!(matches!(
        report.warnings.as_slice(),
        [ReconciliationWarning::OfferClosed { .. }]
    ));
    assert_eq!(
        report.help_request.unwrap().get_status(),
        Ok(HelpRequestStatus::Confirmed)
    );
    let offer = t.reload_offer(&offer).await;
    assert_eq!(offer.get_status(), Ok(OfferStatus::Exhausted));
    assert_eq!(offer.quantity_amount, 10);
}

#[tokio::test]
async fn test_acceptance_publishes_change_events() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    t.offer(&charity, "Медичні препарати", "100 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;

    let mut subscriber = t.bus.subscribe_to_types(vec![
        EventType::HelpOfferAccepted,
        EventType::RequestUpdated,
        EventType::OfferUpdated,
    ]);

    ReconciliationService::accept_help_offer(&t.ctx, &help_offer_id(&help_id), "20")
        .await
        .unwrap();

    let mut seen = Vec::new();
    while let Some(event) = subscriber.try_recv().unwrap() {
        seen.push(event.event_type);
    }
    assert_eq!(
        seen,
        vec![
            EventType::HelpOfferAccepted,
            EventType::RequestUpdated,
            EventType::OfferUpdated
        ]
    );
}

#[tokio::test]
async fn test_rejected_acceptance_publishes_nothing() {
    let t = TestContext::new().await;
    let ctx = t.ctx.clone().with_quantity_policy(QuantityPolicy::Strict);
    let military = t.military().await;
    let charity = t.charity().await;
    let request = t.request(&military, "50 комплектів").await;
    let help_id = t.help_offer(&charity, &request, "20", None).await;
    let mut subscriber = t.bus.subscribe();

    assert!(
        ReconciliationService::accept_help_offer(&ctx, &help_offer_id(&help_id), "x")
            .await
            .is_err()
    );
    assert!(subscriber.try_recv().unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_status_edit_never_reopens_completed_request() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    t.offer(&charity, "Медичні препарати", "10000 комплектів").await;

    for _ in 0..20 {
        let request = t.request(&military, "20 комплектів").await;
        let help_id = t.help_offer(&charity, &request, "20", None).await;

        let accept = {
            let ctx = t.ctx.clone();
            tokio::spawn(async move {
                ReconciliationService::accept_help_offer(&ctx, &help_offer_id(&help_id), "20")
                    .await
            })
        };
        let edit = {
            let ctx = t.ctx.clone();
            let id = RequestId::from(request.id.as_str());
            tokio::spawn(async move {
                RequestService::update_status(&ctx, &id, RequestStatus::InProgress).await
            })
        };
        let accepted = accept.await.unwrap();
        let edited = edit.await.unwrap();

        if let Err(e) = &edited {
            assert!(
                matches!(e, AppError::InvalidTransition { .. }) || e.is_store_failure(),
                "unexpected edit error: {e}"
            );
        }

        let request = t.reload_request(&request).await;
        match accepted {
            Ok(_) => assert_eq!(request.get_status(), Ok(RequestStatus::Completed)),
            Err(e) => {
                assert!(e.is_store_failure(), "unexpected accept error: {e}");
                assert_ne!(request.get_status(), Ok(RequestStatus::Completed));
                assert_eq!(request.quantity_amount, 20);
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_acceptances_lose_no_updates() {
    let t = TestContext::new().await;
    let military = t.military().await;
    let charity = t.charity().await;
    let offer = t.offer(&charity, "Медичні препарати", "10000 комплектів").await;
    let mut drawn_from_offer = 0;

    for _ in 0..10 {
        let request = t.request(&military, "50 комплектів").await;
        let first = t.help_offer(&charity, &request, "20", None).await;
        let second = t.help_offer(&charity, &request, "10", None).await;

        let spawn_accept = |id: String, quantity: &'static str| {
            let ctx = t.ctx.clone();
            tokio::spawn(async move {
                ReconciliationService::accept_help_offer(&ctx, &help_offer_id(&id), quantity)
                    .await
            })
        };
        let a = spawn_accept(first.clone(), "20");
        let b = spawn_accept(second.clone(), "10");
        let results = [(first, 20, a.await.unwrap()), (second, 10, b.await.unwrap())];

        let mut applied = 0;
        for (help_id, amount, result) in results {
            let help = HelpService::get_help_offer(&t.ctx, &help_offer_id(&help_id))
                .await
                .unwrap();
            match result {
                Ok(report) => {
                    assert!(report.is_clean(), "warnings: {:?}", report.warnings);
                    assert_eq!(help.accepted_quantity, Some(amount));
                    applied += amount;
                }
                Err(e) => {
                    // The loser rolled back as a whole
                    assert!(e.is_store_failure(), "unexpected error: {e}");
                    assert!(help.is_pending());
                }
            }
        }
        drawn_from_offer += applied;

        let request = t.reload_request(&request).await;
        assert_eq!(request.quantity_amount, 50 - applied);
        let offer = t.reload_offer(&offer).await;
        assert_eq!(offer.quantity_amount, 10000 - drawn_from_offer);
    }
}
