use tonic::{Request, Response, Status};

use tiffin_domain::id::{CustomerId, OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_proto::payments::{
    self as proto, DistributePaymentRequest, payment_service_server::PaymentService,
};

use crate::domain::types::{DistributeRequest, DistributionEntry, DistributionResult, OrderSnapshot};
use crate::error::PaymentsServiceError;
use crate::state::AppState;
use crate::usecase::retry::ScheduleRetryUseCase;

#[derive(Clone)]
pub struct PaymentsGrpcServer {
    pub state: AppState,
}

#[tonic::async_trait]
impl PaymentService for PaymentsGrpcServer {
    async fn distribute_payment(
        &self,
        request: Request<DistributePaymentRequest>,
    ) -> Result<Response<proto::DistributionResult>, Status> {
        let request = distribute_request_from_proto(request.into_inner())?;
        let order_id = request.order.order_id;

        let uc = self.state.distribute_usecase();
        match uc.execute(request.clone()).await {
            Ok(result) => {
                if let (true, Some(summary)) = (result.needs_retry(), result.error_summary()) {
                    self.schedule_retry(&request, &summary).await;
                }
                Ok(Response::new(result_to_proto(result)))
            }
            Err(PaymentsServiceError::InvalidAmount) => {
                Err(Status::invalid_argument("invalid total_amount"))
            }
            Err(e) => {
                tracing::error!(
                    order_id = %order_id,
                    error = %e.detail(),
                    "order distribution failed"
                );
                self.schedule_retry(&request, &e.detail()).await;
                Ok(Response::new(proto::DistributionResult {
                    success: false,
                    order_id: order_id.to_string(),
                    status: String::new(),
                    distributions: Vec::new(),
                    error: Some(e.to_string()),
                }))
            }
        }
    }
}

impl PaymentsGrpcServer {
    /// Queue the order for the retry worker. A failure here only gets logged.
    async fn schedule_retry(&self, request: &DistributeRequest, reason: &str) {
        let uc = ScheduleRetryUseCase {
            queue: self.state.retry_queue(),
            delay: chrono::Duration::from_std(self.state.retry_delay)
                .unwrap_or(chrono::Duration::seconds(30)),
        };
        if let Err(e) = uc.execute(request, reason).await {
            tracing::error!(
                order_id = %request.order.order_id,
                error = %e.detail(),
                "failed to queue distribution retry"
            );
        }
    }
}

fn parse_id<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, Status> {
    value
        .parse()
        .map_err(|_| Status::invalid_argument(format!("invalid {field}")))
}

/// Empty strings stand for absent optional ids.
fn parse_optional_id<T: std::str::FromStr>(
    value: Option<&str>,
    field: &str,
) -> Result<Option<T>, Status> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => parse_id(v, field).map(Some),
        None => Ok(None),
    }
}

pub fn distribute_request_from_proto(
    req: DistributePaymentRequest,
) -> Result<DistributeRequest, Status> {
    let order = req
        .order
        .ok_or_else(|| Status::invalid_argument("missing order"))?;
    let restaurant_id: RecipientId = parse_id(&req.restaurant_id, "restaurant_id")?;
    let order_restaurant_id = parse_optional_id::<RecipientId>(
        Some(order.restaurant_id.as_str()),
        "order.restaurant_id",
    )?
    .unwrap_or(restaurant_id);

    Ok(DistributeRequest {
        order: OrderSnapshot {
            order_id: parse_id::<OrderId>(&order.order_id, "order.order_id")?,
            customer_id: parse_optional_id::<CustomerId>(
                Some(order.customer_id.as_str()),
                "order.customer_id",
            )?,
            restaurant_id: order_restaurant_id,
            total_amount: Money(order.total_amount),
        },
        total_amount: Money(req.total_amount),
        restaurant_id,
        delivery_rider_id: parse_optional_id(
            req.delivery_rider_id.as_deref(),
            "delivery_rider_id",
        )?,
    })
}

fn entry_to_proto(entry: DistributionEntry) -> proto::DistributionEntry {
    proto::DistributionEntry {
        kind: entry.kind.as_str().to_owned(),
        amount: entry.amount.minor(),
        recipient: entry.recipient.to_string(),
        method: entry
            .method
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default(),
        status: entry.status.map(|s| s.as_str().to_owned()),
        payout_id: entry.payout_id,
        error: entry.error,
    }
}

pub fn result_to_proto(result: DistributionResult) -> proto::DistributionResult {
    proto::DistributionResult {
        success: result.success,
        order_id: result.order_id.to_string(),
        status: result.status.as_str().to_owned(),
        distributions: result.distributions.into_iter().map(entry_to_proto).collect(),
        error: None,
    }
}
