use chrono::Utc;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    common::{field, json_text, require_object},
    errors::ServiceError,
    models::{cart_total, Customer, Order, OrderStatus},
    services::orders::{new_order_id, new_transaction_id, parse_cart, OrderStore},
};

/// Fields a checkout payload must carry, reported in this order when missing
pub const REQUIRED_CHECKOUT_FIELDS: [&str; 8] = [
    "name",
    "phone",
    "address",
    "city",
    "pincode",
    "payment_method",
    "cart",
    "total",
];

/// Identifiers handed back to the client after checkout
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutReceipt {
    #[schema(example = "TXN48213907")]
    pub transaction_id: String,
    #[schema(example = "FARM1736418600")]
    pub order_id: String,
}

/// Turns a cart and delivery details into a pending order
#[derive(Clone)]
pub struct CheckoutService {
    store: OrderStore,
}

impl CheckoutService {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    /// Validates the payload and appends a pending order to the store.
    #[instrument(skip(self, payload))]
    pub async fn checkout(&self, payload: &Value) -> Result<CheckoutReceipt, ServiceError> {
        let body = require_object(payload)?;

        if let Some(missing) = REQUIRED_CHECKOUT_FIELDS
            .iter()
            .find(|name| field(body, name).is_none())
        {
            return Err(ServiceError::BadRequest(format!(
                "Missing field: {}",
                missing
            )));
        }

        let cart = match field(body, "cart") {
            Some(value) => parse_cart(value)?,
            None => Vec::new(),
        };
        let total = cart_total(&cart)?;

        let submitted_total = field(body, "total").and_then(submitted_amount);
        if submitted_total != Some(total) {
            warn!(
                submitted = ?submitted_total,
                computed = %total,
                "Checkout total differs from server computation; using computed total"
            );
        }

        let payment_method = field(body, "payment_method")
            .and_then(json_text)
            .unwrap_or_default();

        let transaction_id = new_transaction_id(&mut rand::thread_rng());
        let now = Utc::now();
        let order = Order {
            id: new_order_id(now),
            transaction_id,
            customer: Customer::from_fields(body),
            payment_method,
            cart,
            total,
            status: OrderStatus::Pending,
            payment_status: None,
            timestamp: now,
            payment_timestamp: None,
        };

        let receipt = CheckoutReceipt {
            transaction_id: order.transaction_id.clone(),
            order_id: order.id.clone(),
        };

        self.store.insert(order).await;
        info!(
            transaction_id = %receipt.transaction_id,
            order_id = %receipt.order_id,
            %total,
            "Order created"
        );

        Ok(receipt)
    }
}

/// Client-side total, rounded to two places
fn submitted_amount(value: &Value) -> Option<Decimal> {
    let amount = match value {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }?;
    Some(amount.round_dp(2))
}
