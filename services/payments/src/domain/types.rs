use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_domain::commission::CommissionSplit;
use tiffin_domain::id::{CustomerId, OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

/// Returned when a stored status/method string is not one we know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ── Accounts ─────────────────────────────────────────────────────────────────

/// Bank account a gateway payout is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_number: String,
    pub ifsc_code: Option<String>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub is_verified: bool,
}

impl BankDetails {
    /// Account number with all but the last four digits hidden.
    pub fn masked_account_number(&self) -> String {
        let chars: Vec<char> = self.account_number.chars().collect();
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let mut masked = "X".repeat(hidden);
        masked.extend(&chars[hidden..]);
        masked
    }
}

/// Earnings ledger of one restaurant, rider or the platform admin.
#[derive(Debug, Clone)]
pub struct RecipientAccount {
    pub recipient_type: RecipientType,
    pub recipient_id: RecipientId,
    pub balance: Money,
    pub total_earnings: Money,
    pub pending_amount: Money,
    /// `None` when no account number is on file.
    pub bank_details: Option<BankDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Orders ───────────────────────────────────────────────────────────────────

/// Order fields kept with every payout attempt for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub restaurant_id: RecipientId,
    pub total_amount: Money,
}

/// Input of one distribution run. Also the payload stored for retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeRequest {
    pub order: OrderSnapshot,
    pub total_amount: Money,
    pub restaurant_id: RecipientId,
    pub delivery_rider_id: Option<RecipientId>,
}

// ── Payout records ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Queued,
    Processing,
    Processed,
    Failed,
    Cancelled,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Map a gateway payout status onto ours. Anything unrecognised is still in flight.
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "queued" => Self::Queued,
            "processed" => Self::Processed,
            "failed" | "rejected" | "reversed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => Self::Processing,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Processed | Self::Failed | Self::Cancelled)
    }

    /// Money did not (and will not) leave through the gateway.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "processed" => Ok(Self::Processed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant {
                kind: "payout status",
                value: other.to_owned(),
            }),
        }
    }
}

/// How a recipient's share was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethod {
    /// Sent through the payout gateway; balance credited optimistically.
    Gateway,
    /// Gateway unavailable or refused; credited to the internal balance only.
    BalanceUpdateFallback,
}

impl PayoutMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::BalanceUpdateFallback => "balance_update_fallback",
        }
    }
}

impl FromStr for PayoutMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gateway" => Ok(Self::Gateway),
            "balance_update_fallback" => Ok(Self::BalanceUpdateFallback),
            other => Err(UnknownVariant {
                kind: "payout method",
                value: other.to_owned(),
            }),
        }
    }
}

/// One payout attempt for a (recipient, order) pair.
#[derive(Debug, Clone)]
pub struct PayoutRecord {
    pub id: Uuid,
    pub external_payout_id: Option<String>,
    pub reference_id: String,
    pub recipient_type: RecipientType,
    pub recipient_id: RecipientId,
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PayoutStatus,
    pub method: PayoutMethod,
    pub order_data: OrderSnapshot,
    pub bank_details: BankDetails,
    pub gateway_response: Option<serde_json::Value>,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayoutRecord {
    /// Copy with a terminal transition applied.
    pub fn with_terminal(mut self, update: &TerminalUpdate) -> Self {
        self.status = update.status;
        match update.status {
            PayoutStatus::Processed => self.processed_at = Some(update.at),
            _ => {
                self.failed_at = Some(update.at);
                self.failure_reason = update.failure_reason.clone();
            }
        }
        self.updated_at = update.at;
        self
    }
}

/// Terminal status change reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalUpdate {
    pub status: PayoutStatus,
    pub at: DateTime<Utc>,
    pub failure_reason: Option<String>,
}

/// Filter for payout listings. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct PayoutFilter {
    pub recipient_type: Option<RecipientType>,
    pub recipient_id: Option<RecipientId>,
    pub status: Option<PayoutStatus>,
}

// ── Gateway ──────────────────────────────────────────────────────────────────

/// Payout the gateway is asked to create.
#[derive(Debug, Clone)]
pub struct PayoutRequest {
    pub reference_id: String,
    pub amount: Money,
    pub bank_details: BankDetails,
    pub recipient_type: RecipientType,
    pub recipient_id: RecipientId,
    pub order_id: OrderId,
    pub narration: String,
}

/// Synchronous gateway answer to a create-payout call.
#[derive(Debug, Clone)]
pub struct GatewayPayout {
    pub id: String,
    pub status: String,
    pub raw: serde_json::Value,
}

// ── Distributions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    /// Restaurant or rider share not settled yet (failed, or no rider assigned).
    PartiallyDistributed,
    FullyDistributed,
}

impl DistributionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PartiallyDistributed => "partially_distributed",
            Self::FullyDistributed => "fully_distributed",
        }
    }
}

impl FromStr for DistributionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "partially_distributed" => Ok(Self::PartiallyDistributed),
            "fully_distributed" => Ok(Self::FullyDistributed),
            other => Err(UnknownVariant {
                kind: "distribution status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Persisted distribution state of one order.
#[derive(Debug, Clone)]
pub struct OrderDistribution {
    pub order_id: OrderId,
    pub restaurant_id: RecipientId,
    pub delivery_rider_id: Option<RecipientId>,
    pub total_amount: Money,
    pub split: CommissionSplit,
    /// Net amount the platform account currently holds for this order.
    pub platform_credited: Money,
    pub status: DistributionStatus,
    pub order_data: OrderSnapshot,
    pub claimed_until: Option<DateTime<Utc>>,
    pub claim_token: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    Restaurant,
    DeliveryRider,
    Platform,
    /// Later correction of the platform credit, e.g. the rider share moving to a late rider.
    PlatformAdjustment,
}

impl DistributionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::DeliveryRider => "delivery_boy",
            Self::Platform => "platform",
            Self::PlatformAdjustment => "platform_adjustment",
        }
    }
}

/// How a distribution entry was settled. Platform credits never touch the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMethod {
    Gateway,
    BalanceUpdateFallback,
    BalanceUpdate,
}

impl EntryMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::BalanceUpdateFallback => "balance_update_fallback",
            Self::BalanceUpdate => "balance_update",
        }
    }
}

impl From<PayoutMethod> for EntryMethod {
    fn from(method: PayoutMethod) -> Self {
        match method {
            PayoutMethod::Gateway => Self::Gateway,
            PayoutMethod::BalanceUpdateFallback => Self::BalanceUpdateFallback,
        }
    }
}

/// One step performed by a distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionEntry {
    pub kind: DistributionKind,
    pub amount: Money,
    pub recipient: RecipientId,
    /// `None` when the step failed before any money moved.
    pub method: Option<EntryMethod>,
    pub status: Option<PayoutStatus>,
    pub payout_id: Option<String>,
    pub error: Option<String>,
}

impl DistributionEntry {
    pub fn failed(
        kind: DistributionKind,
        amount: Money,
        recipient: RecipientId,
        error: String,
    ) -> Self {
        Self {
            kind,
            amount,
            recipient,
            method: None,
            status: None,
            payout_id: None,
            error: Some(error),
        }
    }
}

/// Outcome of one distribution run. Only lists the steps performed by this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionResult {
    pub success: bool,
    pub order_id: OrderId,
    pub status: DistributionStatus,
    pub distributions: Vec<DistributionEntry>,
}

impl DistributionResult {
    /// A restaurant or rider step failed before any money moved and is worth running again.
    pub fn needs_retry(&self) -> bool {
        self.status == DistributionStatus::PartiallyDistributed
            && self
                .distributions
                .iter()
                .any(|d| d.error.is_some() && d.method.is_none())
    }

    /// Errors of the failed steps, joined for logs and the retry queue.
    pub fn error_summary(&self) -> Option<String> {
        let errors: Vec<String> = self
            .distributions
            .iter()
            .filter_map(|d| d.error.as_ref().map(|e| format!("{}: {e}", d.kind.as_str())))
            .collect();
        (!errors.is_empty()).then(|| errors.join("; "))
    }
}

/// Result of a single transfer-to-recipient.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub record: PayoutRecord,
    /// Set when the gateway failed and the fallback credit was used.
    pub gateway_error: Option<String>,
}

// ── Retries ──────────────────────────────────────────────────────────────────

/// Queued re-run of a distribution.
#[derive(Debug, Clone)]
pub struct RetryJob {
    pub id: Uuid,
    pub order_id: OrderId,
    pub request: DistributeRequest,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub next_attempt_at: DateTime<Utc>,
}

/// Counts from one pass over the retry queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub completed: u32,
    pub rescheduled: u32,
    pub failed: u32,
}

// ── Webhooks ─────────────────────────────────────────────────────────────────

/// Inbound payout webhook:
///
/// ```json
/// {"event": "payout.failed",
///  "payload": {"payout": {"id": "pout_1", "status": "failed", "failure_reason": "..."}}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub payout: WebhookPayout,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayout {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    /// Our `reference_id`, echoed back by the gateway.
    #[serde(default)]
    pub reference_id: Option<String>,
}

/// What the reconciler did with an event.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    Applied(PayoutRecord),
    /// Record had already reached a terminal status; nothing changed.
    AlreadyTerminal(PayoutRecord),
    UnknownPayout,
    /// Event type we do not act on.
    Ignored,
}
