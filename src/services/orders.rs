use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::{
    common::{field, json_text, require_object},
    errors::ServiceError,
    models::{cart_total, CartItem, Customer, Order, OrderStatus},
};

const DEFAULT_PAYMENT_METHOD: &str = "upi";

/// Order id derived from the creation second. Two orders created within the
/// same second get the same id; lookups by id return the first of them.
pub fn new_order_id(now: DateTime<Utc>) -> String {
    format!("FARM{}", now.timestamp())
}

/// `TXN` followed by eight random decimal digits. Uniqueness is not checked.
pub fn new_transaction_id<R: Rng>(rng: &mut R) -> String {
    let digits: String = (0..8)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("TXN{}", digits)
}

/// Transaction id used by direct order creation when the caller sends none
fn fallback_transaction_id<R: Rng>(rng: &mut R) -> String {
    format!("TXN{}", rng.gen_range(10_000_000u32..=99_999_999))
}

/// Parses a JSON cart array into line items
pub(crate) fn parse_cart(value: &Value) -> Result<Vec<CartItem>, ServiceError> {
    serde_json::from_value(value.clone())
        .map_err(|e| ServiceError::BadRequest(format!("Invalid cart: {}", e)))
}

/// Append-only, in-memory order list.
///
/// Orders are kept in insertion order and looked up by linear scan. Nothing
/// is ever removed and nothing survives a restart.
#[derive(Clone, Default)]
pub struct OrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    pub async fn find_by_transaction_id(&self, transaction_id: &str) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|order| order.transaction_id == transaction_id)
            .cloned()
    }

    pub async fn find_by_id(&self, order_id: &str) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|order| order.id == order_id)
            .cloned()
    }

    /// Runs `update` on the first order with this transaction id while holding
    /// the write lock, so check-and-modify sequences are atomic.
    pub async fn update_by_transaction_id<F, T>(&self, transaction_id: &str, update: F) -> Option<T>
    where
        F: FnOnce(&mut Order) -> T,
    {
        let mut orders = self.orders.write().await;
        orders
            .iter_mut()
            .find(|order| order.transaction_id == transaction_id)
            .map(update)
    }
}

/// Direct order creation and the read side used by status and invoice lookups
#[derive(Clone)]
pub struct OrderService {
    store: OrderStore,
}

impl OrderService {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    /// Number of orders created since start-up
    pub async fn count(&self) -> usize {
        self.store.len().await
    }

    /// Creates an already completed order from an `/api/orders` payload.
    ///
    /// Every field is optional: the customer defaults to empty, the payment
    /// method to `upi`, the cart to empty and the transaction id to a random
    /// `TXN` number. The total is always recomputed from the cart.
    #[instrument(skip(self, payload))]
    pub async fn create_order(&self, payload: &Value) -> Result<Order, ServiceError> {
        let body = require_object(payload)?;

        let customer = match field(body, "customer") {
            None => Customer::default(),
            Some(Value::Object(object)) => Customer::from_fields(object),
            Some(_) => {
                return Err(ServiceError::BadRequest(
                    "customer must be a JSON object".to_string(),
                ))
            }
        };

        let cart = match field(body, "cart") {
            Some(value) => parse_cart(value)?,
            None => Vec::new(),
        };

        let payment_method = field(body, "payment_method")
            .and_then(json_text)
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let transaction_id = field(body, "transaction_id")
            .and_then(json_text)
            .unwrap_or_else(|| fallback_transaction_id(&mut rand::thread_rng()));

        let total = cart_total(&cart)?;
        let now = Utc::now();
        let order = Order {
            id: new_order_id(now),
            transaction_id,
            customer,
            payment_method,
            total,
            cart,
            status: OrderStatus::Completed,
            payment_status: None,
            timestamp: now,
            payment_timestamp: None,
        };

        self.store.insert(order.clone()).await;
        info!(
            order_id = %order.id,
            transaction_id = %order.transaction_id,
            total = %order.total,
            "Order created"
        );

        Ok(order)
    }

    /// Order lookup by the caller-facing transaction id
    pub async fn get_by_transaction_id(&self, transaction_id: &str) -> Result<Order, ServiceError> {
        self.store
            .find_by_transaction_id(transaction_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }

    /// Order lookup by order id, used for invoices
    pub async fn get_by_id(&self, order_id: &str) -> Result<Order, ServiceError> {
        self.store
            .find_by_id(order_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }
}
