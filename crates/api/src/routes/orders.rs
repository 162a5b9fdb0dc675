//! Order endpoints: sell, list, and lookup.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{
    CustomerId, Order, OrderId, OrderItem, PaymentInstruction, PaymentMethod, ProductId,
};
use fulfillment::{LogNotifier, OrderWorkflow, SimulatedPaymentGateway};
use serde::{Deserialize, Serialize};

use crate::AppStore;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: AppStore> {
    pub workflow: OrderWorkflow<S, SimulatedPaymentGateway<S>, LogNotifier>,
    pub storage: &'static str,
}

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct SellOrderRequest {
    pub customer_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: u32,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub method: Option<String>,
}

impl SellOrderRequest {
    fn into_order(self) -> Result<Order, ApiError> {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                OrderItem::new(ProductId::new(item.product_id), item.quantity, item.amount)
            })
            .collect();

        let payments = self
            .payments
            .into_iter()
            .map(|payment| {
                let method = match payment.method {
                    Some(method) => method
                        .to_uppercase()
                        .parse::<PaymentMethod>()
                        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
                    None => PaymentMethod::default(),
                };
                Ok(PaymentInstruction::new(payment.amount, method))
            })
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(Order::new(CustomerId::new(self.customer_id), items, payments))
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Option<i64>,
    pub customer_id: i64,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: f64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub quantity: u32,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct OrderSoldResponse {
    pub order_id: i64,
    pub status: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().map(|id| id.as_i64()),
            customer_id: order.customer_id().as_i64(),
            status: order.status().to_string(),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.as_i64(),
                    quantity: item.quantity,
                    amount: item.unit_amount,
                })
                .collect(),
            total_amount: order.items_total(),
            created_at: order.created_at(),
        }
    }
}

// -- Handlers --

/// POST /api/v1/orders: sell a new order.
#[tracing::instrument(skip(state, req))]
pub async fn sell<S: AppStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SellOrderRequest>,
) -> Result<(StatusCode, Json<OrderSoldResponse>), ApiError> {
    let mut order = req.into_order()?;

    state.workflow.sell(&mut order).await?;

    let order_id = order
        .id()
        .ok_or_else(|| ApiError::Internal("sold order has no id".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(OrderSoldResponse {
            order_id: order_id.as_i64(),
            status: order.status().to_string(),
        }),
    ))
}

/// GET /api/v1/orders/{id}: load one order with its items.
#[tracing::instrument(skip(state))]
pub async fn get<S: AppStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    let order = state
        .workflow
        .get_order_details(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_id} not found")))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// GET /api/v1/orders: list every order in id order.
#[tracing::instrument(skip(state))]
pub async fn list<S: AppStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.workflow.get_orders().await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse::<i64>()
        .map(OrderId::new)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id {id:?}: {e}")))
}
