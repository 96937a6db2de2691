use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

use crate::domain::repository::PayoutGateway;
use crate::domain::types::{GatewayPayout, PayoutRequest};
use crate::error::GatewayError;

/// Payout gateway over its REST API (`POST {base}/payouts`, basic auth).
#[derive(Clone)]
pub struct HttpPayoutGateway {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    source_account: String,
}

impl HttpPayoutGateway {
    pub fn new(
        base_url: &str,
        key_id: &str,
        key_secret: &str,
        source_account: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            key_id: key_id.to_owned(),
            key_secret: key_secret.to_owned(),
            source_account: source_account.to_owned(),
        })
    }
}

/// JSON body of a create-payout call.
pub fn payout_body(source_account: &str, request: &PayoutRequest) -> Value {
    let bank = &request.bank_details;
    json!({
        "account_number": source_account,
        "fund_account": {
            "account_type": "bank_account",
            "bank_account": {
                "name": bank.account_holder_name,
                "ifsc": bank.ifsc_code,
                "account_number": bank.account_number,
            },
        },
        "amount": request.amount.minor(),
        "currency": "INR",
        "mode": "IMPS",
        "purpose": "payout",
        "queue_if_low_balance": true,
        "reference_id": request.reference_id,
        "narration": request.narration,
        "notes": {
            "order_id": request.order_id.to_string(),
            "recipient_type": request.recipient_type.as_str(),
            "recipient_id": request.recipient_id.to_string(),
        },
    })
}

/// Pull `id` and `status` out of a create-payout response.
pub fn parse_payout(raw: Value) -> Result<GatewayPayout, GatewayError> {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::Decode("missing payout id".to_owned()))?
        .to_owned();
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::Decode("missing payout status".to_owned()))?
        .to_owned();
    Ok(GatewayPayout { id, status, raw })
}

impl PayoutGateway for HttpPayoutGateway {
    async fn create_payout(&self, request: &PayoutRequest) -> Result<GatewayPayout, GatewayError> {
        let response = self
            .client
            .post(format!("{}/payouts", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .header("X-Payout-Idempotency", &request.reference_id)
            .json(&payout_body(&self.source_account, request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        parse_payout(raw)
    }
}
