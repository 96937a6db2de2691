use std::sync::Arc;

use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

use tiffin_payments::domain::types::{
    DistributionKind, DistributionStatus, EntryMethod, PayoutMethod, PayoutStatus,
};
use tiffin_payments::error::{GatewayError, PaymentsServiceError};

use crate::helpers::{
    ClaimGate, GatewayReply, Ledger, MockGateway, ORDER, OTHER_RIDER, PLATFORM, RESTAURANT,
    RIDER, test_account, test_bank_details, test_request,
};

// ── Split and platform share ─────────────────────────────────────────────────

#[tokio::test]
async fn should_credit_platform_with_rider_share_when_no_rider_assigned() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(1000, None)).await.unwrap();

    assert!(result.success);
    assert_eq!(result.status, DistributionStatus::PartiallyDistributed);
    assert!(!result.needs_retry());
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(200));
    assert!(ledger.payouts_of(RecipientType::DeliveryRider).is_empty());

    let platform = result
        .distributions
        .iter()
        .find(|d| d.kind == DistributionKind::Platform)
        .expect("platform entry");
    assert_eq!(platform.amount, Money(200));
    assert_eq!(platform.method, Some(EntryMethod::BalanceUpdate));

    let distribution = ledger.distribution(ORDER).unwrap();
    assert_eq!(distribution.platform_credited, Money(200));
    assert_eq!(distribution.claimed_until, None);
}

#[tokio::test]
async fn should_split_997_into_798_150_49() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(997, Some(RIDER))).await.unwrap();

    assert_eq!(result.status, DistributionStatus::FullyDistributed);
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(798));
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(49));

    let kinds: Vec<_> = result.distributions.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DistributionKind::Restaurant,
            DistributionKind::DeliveryRider,
            DistributionKind::Platform,
        ]
    );
}

#[tokio::test]
async fn should_send_payout_request_with_bank_details_and_reference() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::accepting();
    let requests = gateway.requests_handle();
    let usecase = ledger.distribute_usecase(gateway);

    usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].amount, Money(800));
    assert_eq!(requests[0].bank_details, test_bank_details());
    assert!(
        requests[0]
            .reference_id
            .starts_with(&format!("restaurant_{RESTAURANT}_{ORDER}_"))
    );
    assert!(
        requests[1]
            .reference_id
            .starts_with(&format!("delivery_boy_{RIDER}_{ORDER}_"))
    );
}

#[tokio::test]
async fn should_reject_negative_total() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(-1, Some(RIDER))).await;

    assert!(
        matches!(result, Err(PaymentsServiceError::InvalidAmount)),
        "expected InvalidAmount, got {result:?}"
    );
    assert!(ledger.distribution(ORDER).is_none());
}

// ── Gateway fallback ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_credit_balance_when_gateway_errors() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::scripted(vec![GatewayReply::Error(GatewayError::Transport(
        "connection reset".to_owned(),
    ))]);
    let usecase = ledger.distribute_usecase(gateway);

    let result = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert_eq!(result.status, DistributionStatus::FullyDistributed);
    assert!(!result.needs_retry());
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));

    let record = &ledger.payouts_of(RecipientType::Restaurant)[0];
    assert_eq!(record.method, PayoutMethod::BalanceUpdateFallback);
    assert_eq!(record.status, PayoutStatus::Processed);
    assert!(record.processed_at.is_some());
    assert!(record.external_payout_id.is_none());
    assert!(record.failure_reason.is_some());

    let entry = &result.distributions[0];
    assert_eq!(entry.method, Some(EntryMethod::BalanceUpdateFallback));
    assert!(entry.error.is_some());
}

#[tokio::test]
async fn should_credit_balance_when_gateway_reports_failed_payout() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::scripted(vec![GatewayReply::Status("rejected")]);
    let usecase = ledger.distribute_usecase(gateway);

    usecase.execute(test_request(1000, None)).await.unwrap();

    let record = &ledger.payouts_of(RecipientType::Restaurant)[0];
    assert_eq!(record.method, PayoutMethod::BalanceUpdateFallback);
    assert_eq!(record.status, PayoutStatus::Processed);
    assert_eq!(record.external_payout_id.as_deref(), Some("pout_1"));
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
}

#[tokio::test(start_paused = true)]
async fn should_credit_balance_when_gateway_times_out() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::scripted(vec![GatewayReply::Hang]);
    let usecase = ledger.distribute_usecase(gateway);

    let result = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    let restaurant = &ledger.payouts_of(RecipientType::Restaurant)[0];
    assert_eq!(restaurant.method, PayoutMethod::BalanceUpdateFallback);
    let rider = &ledger.payouts_of(RecipientType::DeliveryRider)[0];
    assert_eq!(rider.method, PayoutMethod::Gateway);
    assert_eq!(rider.status, PayoutStatus::Processing);
    assert_eq!(result.status, DistributionStatus::FullyDistributed);
}

#[tokio::test]
async fn should_mark_processed_payout_as_settled() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::scripted(vec![GatewayReply::Status("processed")]);
    let usecase = ledger.distribute_usecase(gateway);

    usecase.execute(test_request(1000, None)).await.unwrap();

    let record = &ledger.payouts_of(RecipientType::Restaurant)[0];
    assert_eq!(record.method, PayoutMethod::Gateway);
    assert_eq!(record.status, PayoutStatus::Processed);
    assert!(record.processed_at.is_some());
}

// ── Late rider and repeated calls ────────────────────────────────────────────

#[tokio::test]
async fn should_pay_only_rider_delta_when_rider_assigned_later() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    usecase.execute(test_request(1000, None)).await.unwrap();
    let second = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert_eq!(second.status, DistributionStatus::FullyDistributed);
    assert_eq!(ledger.payouts_of(RecipientType::Restaurant).len(), 1);
    assert_eq!(ledger.payouts_of(RecipientType::DeliveryRider).len(), 1);
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));

    let kinds: Vec<_> = second.distributions.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DistributionKind::DeliveryRider, DistributionKind::PlatformAdjustment]
    );
    assert_eq!(second.distributions[1].amount, Money(-150));

    let distribution = ledger.distribution(ORDER).unwrap();
    assert_eq!(distribution.platform_credited, Money(50));
    assert_eq!(distribution.delivery_rider_id, Some(RIDER));
    assert_eq!(distribution.status, DistributionStatus::FullyDistributed);
}

#[tokio::test]
async fn should_do_nothing_when_order_already_fully_distributed() {
    let ledger = Ledger::standard();
    let gateway = MockGateway::accepting();
    let requests = gateway.requests_handle();
    let usecase = ledger.distribute_usecase(gateway);

    usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();
    let second = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert_eq!(second.status, DistributionStatus::FullyDistributed);
    assert!(second.distributions.is_empty());
    assert_eq!(requests.lock().unwrap().len(), 2);
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
}

#[tokio::test]
async fn should_keep_paid_rider_when_another_rider_is_requested() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();
    let second = usecase
        .execute(test_request(1000, Some(OTHER_RIDER)))
        .await
        .unwrap();

    assert!(second.distributions.is_empty());
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, OTHER_RIDER), Money::ZERO);
    assert_eq!(
        ledger.distribution(ORDER).unwrap().delivery_rider_id,
        Some(RIDER)
    );
}

#[tokio::test]
async fn should_use_stored_amounts_when_repeat_call_differs() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    usecase.execute(test_request(1000, None)).await.unwrap();
    usecase.execute(test_request(2000, Some(RIDER))).await.unwrap();

    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
}

// ── Recipient failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_failed_restaurant_without_bank_details() {
    let ledger = Ledger::new(vec![
        test_account(RecipientType::Restaurant, RESTAURANT, false),
        test_account(RecipientType::DeliveryRider, RIDER, true),
        test_account(RecipientType::Platform, PLATFORM, false),
    ]);
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert!(result.success);
    assert_eq!(result.status, DistributionStatus::PartiallyDistributed);
    assert!(result.needs_retry());
    let restaurant = &result.distributions[0];
    assert_eq!(restaurant.kind, DistributionKind::Restaurant);
    assert_eq!(restaurant.method, None);
    assert_eq!(restaurant.error.as_deref(), Some("missing bank details"));
    assert!(result.error_summary().unwrap().starts_with("restaurant: "));

    // Rider and platform are settled independently of the restaurant.
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money::ZERO);
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
}

#[tokio::test]
async fn should_pay_restaurant_on_retry_once_bank_details_exist() {
    let ledger = Ledger::new(vec![
        test_account(RecipientType::Restaurant, RESTAURANT, false),
        test_account(RecipientType::DeliveryRider, RIDER, true),
        test_account(RecipientType::Platform, PLATFORM, false),
    ]);
    let usecase = ledger.distribute_usecase(MockGateway::accepting());
    usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    ledger.accounts.lock().unwrap()[0].bank_details = Some(test_bank_details());
    let retry = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert_eq!(retry.status, DistributionStatus::FullyDistributed);
    assert_eq!(retry.distributions.len(), 1);
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
}

#[tokio::test]
async fn should_keep_rider_share_with_platform_when_rider_has_no_account() {
    let ledger = Ledger::new(vec![
        test_account(RecipientType::Restaurant, RESTAURANT, true),
        test_account(RecipientType::Platform, PLATFORM, false),
    ]);
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(1000, Some(RIDER))).await.unwrap();

    assert_eq!(result.status, DistributionStatus::PartiallyDistributed);
    assert!(result.needs_retry());
    let rider = &result.distributions[1];
    assert_eq!(rider.kind, DistributionKind::DeliveryRider);
    assert_eq!(rider.error.as_deref(), Some("recipient not found"));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(200));
}

#[tokio::test]
async fn should_fail_and_release_claim_when_platform_account_missing() {
    let ledger = Ledger::new(vec![test_account(
        RecipientType::Restaurant,
        RESTAURANT,
        true,
    )]);
    let usecase = ledger.distribute_usecase(MockGateway::accepting());

    let result = usecase.execute(test_request(1000, None)).await;

    assert!(
        matches!(result, Err(PaymentsServiceError::PlatformAccountNotFound)),
        "expected PlatformAccountNotFound, got {result:?}"
    );
    let distribution = ledger.distribution(ORDER).unwrap();
    assert_eq!(distribution.claimed_until, None);
    assert_eq!(distribution.claim_token, None);
    assert_eq!(distribution.platform_credited, Money::ZERO);
    // The restaurant transfer already happened and is not repeated later.
    assert_eq!(ledger.payouts_of(RecipientType::Restaurant).len(), 1);
}

// ── Concurrent calls ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_call_while_order_is_claimed_and_remember_rider() {
    let ledger = Ledger::standard();
    let usecase = ledger.distribute_usecase(MockGateway::accepting());
    usecase.execute(test_request(1000, None)).await.unwrap();

    ledger.hold_claim(ORDER);
    let rejected = usecase.execute(test_request(1000, Some(RIDER))).await;

    assert!(
        matches!(rejected, Err(PaymentsServiceError::DistributionInProgress)),
        "expected DistributionInProgress, got {rejected:?}"
    );
    assert!(ledger.payouts_of(RecipientType::DeliveryRider).is_empty());
    assert_eq!(
        ledger.distribution(ORDER).unwrap().delivery_rider_id,
        Some(RIDER)
    );

    // Once the claim is gone, a run without a rider still pays the remembered one.
    ledger.drop_claim(ORDER);
    let result = usecase.execute(test_request(1000, None)).await.unwrap();
    assert_eq!(result.status, DistributionStatus::FullyDistributed);
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
}

#[tokio::test]
async fn should_settle_from_state_read_under_own_claim() {
    let ledger = Ledger::standard();
    ledger
        .distribute_usecase(MockGateway::accepting())
        .execute(test_request(1000, None))
        .await
        .unwrap();
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(200));

    let gate = Arc::new(ClaimGate::default());
    let waiting = ledger.gated_distribute_usecase(MockGateway::accepting(), Arc::clone(&gate));
    let assigning = ledger.distribute_usecase(MockGateway::accepting());

    // The waiting call has looked the order up but not claimed it when the rider run
    // starts and finishes.
    let (waiting_result, ()) = tokio::join!(waiting.execute(test_request(1000, None)), async {
        gate.entered.notified().await;
        let assigned = assigning
            .execute(test_request(1000, Some(RIDER)))
            .await
            .unwrap();
        assert_eq!(assigned.status, DistributionStatus::FullyDistributed);
        gate.open.notify_one();
    });

    let waiting_result = waiting_result.unwrap();
    assert!(
        waiting_result.distributions.is_empty(),
        "expected no steps, got {:?}",
        waiting_result.distributions
    );
    assert_eq!(waiting_result.status, DistributionStatus::FullyDistributed);
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    let distribution = ledger.distribution(ORDER).unwrap();
    assert_eq!(distribution.platform_credited, Money(50));
    assert_eq!(distribution.claim_token, None);
}

#[tokio::test]
async fn should_leave_platform_credit_alone_once_claim_is_taken_over() {
    let ledger = Ledger::standard();
    ledger
        .distribute_usecase(MockGateway::accepting())
        .execute(test_request(1000, None))
        .await
        .unwrap();

    // Another call takes the order over while the rider transfer is in flight.
    let taken_over = ledger.clone();
    let gateway = MockGateway::scripted(vec![GatewayReply::Interleave(Box::new(move || {
        taken_over.hold_claim(ORDER)
    }))]);
    let result = ledger
        .distribute_usecase(gateway)
        .execute(test_request(1000, Some(RIDER)))
        .await;

    assert!(
        matches!(result, Err(PaymentsServiceError::DistributionInProgress)),
        "expected DistributionInProgress, got {result:?}"
    );
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(200));
    let distribution = ledger.distribution(ORDER).unwrap();
    assert_eq!(distribution.platform_credited, Money(200));
    assert!(distribution.claim_token.is_some(), "claim must stay with the new holder");

    // Whoever settles next sees the paid rider and moves the platform exactly once.
    ledger.drop_claim(ORDER);
    let result = ledger
        .distribute_usecase(MockGateway::accepting())
        .execute(test_request(1000, None))
        .await
        .unwrap();
    assert_eq!(result.distributions.len(), 1);
    assert_eq!(result.distributions[0].kind, DistributionKind::PlatformAdjustment);
    assert_eq!(result.distributions[0].amount, Money(-150));
    assert_eq!(ledger.balance(RecipientType::Platform, PLATFORM), Money(50));
    assert_eq!(
        ledger.distribution(ORDER).unwrap().platform_credited,
        Money(50)
    );
}
