use serde_json::json;

use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

use tiffin_payments::domain::types::{
    PayoutMethod, PayoutStatus, WebhookEvent, WebhookOutcome,
};
use tiffin_payments::usecase::webhook::HandlePayoutWebhookUseCase;

use crate::helpers::{GatewayReply, Ledger, MockGateway, RESTAURANT, RIDER, test_request};

fn event(event: &str, payout: serde_json::Value) -> WebhookEvent {
    serde_json::from_value(json!({ "event": event, "payload": { "payout": payout } })).unwrap()
}

/// Ledger after a 1000 distribution with a rider: restaurant payout `pout_1`,
/// rider payout `pout_2`, both still processing at the gateway.
async fn distributed_ledger() -> Ledger {
    let ledger = Ledger::standard();
    ledger
        .distribute_usecase(MockGateway::accepting())
        .execute(test_request(1000, Some(RIDER)))
        .await
        .unwrap();
    ledger
}

// ── payout.failed ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_payout_failed_and_move_credit_to_pending() {
    let ledger = distributed_ledger().await;
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event(
            "payout.failed",
            json!({ "id": "pout_1", "status": "failed", "failure_reason": "account closed" }),
        ))
        .await
        .unwrap();

    let WebhookOutcome::Applied(record) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(record.status, PayoutStatus::Failed);
    assert_eq!(record.failure_reason.as_deref(), Some("account closed"));
    assert!(record.failed_at.is_some());

    let account = ledger.account(RecipientType::Restaurant, RESTAURANT);
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.pending_amount, Money(800));
    assert_eq!(account.total_earnings, Money(800));

    // The rider payout is untouched.
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
}

#[tokio::test]
async fn should_not_take_balance_below_zero_when_failed_payout_was_partly_drawn() {
    let ledger = distributed_ledger().await;
    ledger.set_balance(RecipientType::Restaurant, RESTAURANT, Money(300));
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    usecase
        .execute(event("payout.failed", json!({ "id": "pout_1" })))
        .await
        .unwrap();

    let account = ledger.account(RecipientType::Restaurant, RESTAURANT);
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.pending_amount, Money(300));
}

#[tokio::test]
async fn should_ignore_replayed_failed_event() {
    let ledger = distributed_ledger().await;
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };
    let failed = || event("payout.failed", json!({ "id": "pout_1" }));

    usecase.execute(failed()).await.unwrap();
    let first_failed_at = ledger.payouts_of(RecipientType::Restaurant)[0].failed_at;

    let replay = usecase.execute(failed()).await.unwrap();

    assert!(
        matches!(replay, WebhookOutcome::AlreadyTerminal(_)),
        "expected AlreadyTerminal, got {replay:?}"
    );
    let record = &ledger.payouts_of(RecipientType::Restaurant)[0];
    assert_eq!(record.failed_at, first_failed_at);
    assert_eq!(record.failure_reason.as_deref(), Some("unknown"));
    let account = ledger.account(RecipientType::Restaurant, RESTAURANT);
    assert_eq!(account.balance, Money::ZERO);
    assert_eq!(account.pending_amount, Money(800));
}

// ── payout.processed ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_payout_processed_without_touching_balances() {
    let ledger = distributed_ledger().await;
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event("payout.processed", json!({ "id": "pout_2" })))
        .await
        .unwrap();

    let WebhookOutcome::Applied(record) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(record.status, PayoutStatus::Processed);
    assert!(record.processed_at.is_some());
    assert_eq!(
        ledger.payouts_of(RecipientType::DeliveryRider)[0].status,
        PayoutStatus::Processed
    );
    assert_eq!(ledger.balance(RecipientType::DeliveryRider, RIDER), Money(150));
}

#[tokio::test]
async fn should_keep_processed_status_when_failed_event_arrives_late() {
    let ledger = distributed_ledger().await;
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    usecase
        .execute(event("payout.processed", json!({ "id": "pout_1" })))
        .await
        .unwrap();
    let late = usecase
        .execute(event("payout.failed", json!({ "id": "pout_1" })))
        .await
        .unwrap();

    let WebhookOutcome::AlreadyTerminal(record) = late else {
        panic!("expected AlreadyTerminal, got {late:?}");
    };
    assert_eq!(record.status, PayoutStatus::Processed);
    assert_eq!(ledger.balance(RecipientType::Restaurant, RESTAURANT), Money(800));
}

// ── Unknown and ignored events ───────────────────────────────────────────────

#[tokio::test]
async fn should_report_unknown_payout_without_changes() {
    let ledger = distributed_ledger().await;
    let before = ledger.payouts();
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event("payout.failed", json!({ "id": "pout_missing" })))
        .await
        .unwrap();

    assert!(matches!(outcome, WebhookOutcome::UnknownPayout));
    let after = ledger.payouts();
    assert_eq!(before.len(), after.len());
    assert!(
        before
            .iter()
            .zip(&after)
            .all(|(b, a)| b.status == a.status && b.updated_at == a.updated_at)
    );
}

#[tokio::test]
async fn should_ignore_non_terminal_events() {
    let ledger = distributed_ledger().await;
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event("payout.queued", json!({ "id": "pout_1" })))
        .await
        .unwrap();

    assert!(matches!(outcome, WebhookOutcome::Ignored));
    assert_eq!(
        ledger.payouts_of(RecipientType::Restaurant)[0].status,
        PayoutStatus::Processing
    );
}

// ── Reference id fallback ────────────────────────────────────────────────────

#[tokio::test]
async fn should_match_payout_by_reference_id_when_external_id_unknown() {
    let ledger = distributed_ledger().await;
    let reference_id = ledger.payouts_of(RecipientType::Restaurant)[0]
        .reference_id
        .clone();
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event(
            "payout.processed",
            json!({ "id": "pout_other", "reference_id": reference_id }),
        ))
        .await
        .unwrap();

    let WebhookOutcome::Applied(record) = outcome else {
        panic!("expected Applied, got {outcome:?}");
    };
    assert_eq!(record.reference_id, reference_id);
    assert_eq!(record.status, PayoutStatus::Processed);
}

#[tokio::test(start_paused = true)]
async fn should_leave_fallback_credit_alone_when_lost_payout_reports_in() {
    let ledger = Ledger::standard();
    ledger
        .distribute_usecase(MockGateway::scripted(vec![GatewayReply::Hang]))
        .execute(test_request(1000, Some(RIDER)))
        .await
        .unwrap();
    let fallback = ledger.payouts_of(RecipientType::Restaurant)[0].clone();
    assert_eq!(fallback.method, PayoutMethod::BalanceUpdateFallback);
    let usecase = HandlePayoutWebhookUseCase {
        payouts: ledger.payout_repo(),
    };

    let outcome = usecase
        .execute(event(
            "payout.failed",
            json!({ "id": "pout_late", "reference_id": fallback.reference_id }),
        ))
        .await
        .unwrap();

    assert!(
        matches!(outcome, WebhookOutcome::AlreadyTerminal(_)),
        "expected AlreadyTerminal, got {outcome:?}"
    );
    let account = ledger.account(RecipientType::Restaurant, RESTAURANT);
    assert_eq!(account.balance, Money(800));
    assert_eq!(account.pending_amount, Money::ZERO);
    assert_eq!(
        ledger.payouts_of(RecipientType::Restaurant)[0]
            .external_payout_id
            .as_deref(),
        Some("pout_late")
    );

    // Later events for the same gateway payout are found by its id alone.
    let repeat = usecase
        .execute(event("payout.failed", json!({ "id": "pout_late" })))
        .await
        .unwrap();
    assert!(
        matches!(repeat, WebhookOutcome::AlreadyTerminal(_)),
        "expected AlreadyTerminal, got {repeat:?}"
    );
}
