use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{common::text_or_empty, errors::ServiceError};

/// Fixed 5% GST applied on top of the cart subtotal.
pub const GST_MULTIPLIER: Decimal = dec!(1.05);

pub const CART_OUT_OF_RANGE: &str = "Invalid cart: total out of range";

/// Enum representing the possible statuses of an order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    /// Created by checkout, waiting for payment
    Pending,
    Paid,
    PaymentFailed,
    /// Created directly through the orders API, never payable
    Completed,
}

impl OrderStatus {
    /// Payment is only ever taken from a pending order; every other state is final.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::PaymentFailed)
        )
    }
}

/// Delivery details captured at checkout. Free-form, only presence is checked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    #[schema(example = "Ravi Kumar")]
    pub name: String,
    #[schema(example = "9840012345")]
    pub phone: String,
    pub address: String,
    #[schema(example = "Tirunelveli")]
    pub city: String,
    #[schema(example = "627001")]
    pub pincode: String,
}

impl Customer {
    /// Reads the customer fields from a JSON object, numbers kept as text
    pub fn from_fields(object: &Map<String, Value>) -> Self {
        Self {
            name: text_or_empty(object, "name"),
            phone: text_or_empty(object, "phone"),
            address: text_or_empty(object, "address"),
            city: text_or_empty(object, "city"),
            pincode: text_or_empty(object, "pincode"),
        }
    }
}

/// One cart line. Keys other than `price` and `quantity` are kept verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self {
            price,
            quantity,
            extra: Map::new(),
        }
    }

    /// `None` when the product does not fit a `Decimal`
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

/// Cart total including GST, rounded half away from zero to paise.
pub fn cart_total(items: &[CartItem]) -> Result<Decimal, ServiceError> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |subtotal, item| {
            item.line_total().and_then(|line| subtotal.checked_add(line))
        })
        .and_then(|subtotal| subtotal.checked_mul(GST_MULTIPLIER))
        .map(|total| total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| ServiceError::BadRequest(CART_OUT_OF_RANGE.to_string()))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// `FARM` followed by the Unix timestamp of creation
    #[schema(example = "FARM1736418600")]
    pub id: String,
    #[schema(example = "TXN48213907")]
    pub transaction_id: String,
    pub customer: Customer,
    /// Payment method as submitted; validated when the payment is taken
    #[schema(example = "upi")]
    pub payment_method: String,
    #[schema(value_type = Vec<Object>)]
    pub cart: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 210.0)]
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_timestamp: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_awaiting_payment(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn invoice_url(&self) -> String {
        format!("/api/invoice/{}", self.id)
    }

    /// Records an approved payment.
    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.status = OrderStatus::Paid;
        self.payment_status = Some("completed".to_string());
        self.payment_timestamp = Some(at);
    }

    pub fn mark_payment_failed(&mut self) {
        self.status = OrderStatus::PaymentFailed;
    }
}
