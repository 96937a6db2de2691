use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use tiffin_domain::id::RecipientId;
use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

use crate::domain::types::{BankDetails, RecipientAccount};
use crate::error::PaymentsServiceError;
use crate::state::AppState;
use crate::usecase::query::GetAccountUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BankDetailsResponse {
    pub account_number: String,
    pub ifsc_code: Option<String>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub is_verified: bool,
}

impl From<BankDetails> for BankDetailsResponse {
    fn from(b: BankDetails) -> Self {
        Self {
            account_number: b.masked_account_number(),
            ifsc_code: b.ifsc_code,
            account_holder_name: b.account_holder_name,
            bank_name: b.bank_name,
            is_verified: b.is_verified,
        }
    }
}

#[derive(Serialize)]
pub struct AccountResponse {
    pub recipient_type: RecipientType,
    pub recipient_id: RecipientId,
    pub balance: Money,
    pub total_earnings: Money,
    pub pending_amount: Money,
    pub bank_details: Option<BankDetailsResponse>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<RecipientAccount> for AccountResponse {
    fn from(a: RecipientAccount) -> Self {
        Self {
            recipient_type: a.recipient_type,
            recipient_id: a.recipient_id,
            balance: a.balance,
            total_earnings: a.total_earnings,
            pending_amount: a.pending_amount,
            bank_details: a.bank_details.map(BankDetailsResponse::from),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ── GET /payments/accounts/{recipient_type}/{recipient_id} ───────────────────

pub async fn get_account(
    State(state): State<AppState>,
    Path((recipient_type, recipient_id)): Path<(String, String)>,
) -> Result<Json<AccountResponse>, PaymentsServiceError> {
    let recipient_type: RecipientType = recipient_type
        .parse()
        .map_err(|_| PaymentsServiceError::InvalidPayload)?;
    let recipient_id: RecipientId = recipient_id
        .parse()
        .map_err(|_| PaymentsServiceError::InvalidPayload)?;
    let usecase = GetAccountUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase.execute(recipient_type, recipient_id).await?;
    Ok(Json(account.into()))
}
