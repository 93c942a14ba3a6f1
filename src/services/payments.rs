//! Simulated payment gateway.
//!
//! No money moves anywhere: each method is approved or declined by a local
//! predicate and the matching order is moved out of `pending`.

use chrono::Utc;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{info, instrument, warn};

use crate::{
    common::{field, is_six_digit_code, json_text, require_object},
    errors::ServiceError,
    models::{Order, OrderStatus},
    services::orders::OrderStore,
};

/// Card fields that must all be present, reported in this order when missing
pub const REQUIRED_CARD_FIELDS: [&str; 5] = ["card_number", "card_holder", "expiry", "cvv", "otp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    Upi,
    Card,
    Cod,
    NetBanking,
}

/// Result of a payment attempt that reached the simulated gateway
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    Approved(Order),
    Declined(Order),
}

impl PaymentOutcome {
    pub fn order(&self) -> &Order {
        match self {
            PaymentOutcome::Approved(order) | PaymentOutcome::Declined(order) => order,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, PaymentOutcome::Approved(_))
    }
}

#[derive(Clone)]
pub struct PaymentSimulator {
    store: OrderStore,
}

impl PaymentSimulator {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    /// Takes payment for the order identified by `transaction_id`.
    ///
    /// Malformed method details are a `BadRequest`/`InvalidInput` error and
    /// leave the order untouched. A well-formed attempt always resolves the
    /// order to `paid` or `payment_failed`.
    #[instrument(skip(self, payload))]
    pub async fn process_payment(&self, payload: &Value) -> Result<PaymentOutcome, ServiceError> {
        let body = require_object(payload)?;

        let transaction_id = field(body, "transaction_id")
            .and_then(json_text)
            .ok_or_else(|| ServiceError::BadRequest("Transaction ID required".to_string()))?;

        let order = self
            .store
            .find_by_transaction_id(&transaction_id)
            .await
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        if !order.is_awaiting_payment() {
            return Err(not_awaiting_payment(&order));
        }

        let method = PaymentMethod::from_str(&order.payment_method).map_err(|_| {
            warn!(%transaction_id, method = %order.payment_method, "Unsupported payment method");
            ServiceError::InvalidInput("Invalid payment method".to_string())
        })?;
        info!(%transaction_id, %method, "Processing payment");

        let approved = authorize(method, body)?;

        let outcome = self
            .store
            .update_by_transaction_id(&transaction_id, |order| {
                let next = if approved {
                    OrderStatus::Paid
                } else {
                    OrderStatus::PaymentFailed
                };
                // Another request may have settled the order since the lookup
                if !order.status.can_transition_to(next) {
                    return Err(not_awaiting_payment(order));
                }
                if approved {
                    order.mark_paid(Utc::now());
                    Ok(PaymentOutcome::Approved(order.clone()))
                } else {
                    order.mark_payment_failed();
                    Ok(PaymentOutcome::Declined(order.clone()))
                }
            })
            .await
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))??;

        if outcome.is_approved() {
            info!(%transaction_id, "Payment successful");
        } else {
            warn!(%transaction_id, "Payment declined");
        }

        Ok(outcome)
    }
}

fn not_awaiting_payment(order: &Order) -> ServiceError {
    ServiceError::InvalidOperation(format!(
        "Order {} is not awaiting payment (status: {})",
        order.id, order.status
    ))
}

/// Validates method-specific fields and runs the gateway predicate.
fn authorize(method: PaymentMethod, body: &Map<String, Value>) -> Result<bool, ServiceError> {
    match method {
        PaymentMethod::Upi => {
            let pin = field(body, "upi_pin").and_then(json_text);
            match pin {
                Some(pin) if is_six_digit_code(&pin) => Ok(simulate_upi_payment(&pin)),
                _ => Err(ServiceError::InvalidInput("Invalid UPI PIN".to_string())),
            }
        }
        PaymentMethod::Card => {
            if let Some(missing) = REQUIRED_CARD_FIELDS
                .iter()
                .find(|name| field(body, name).is_none())
            {
                return Err(ServiceError::BadRequest(format!(
                    "Missing card field: {}",
                    missing
                )));
            }
            let otp = field(body, "otp").and_then(json_text).unwrap_or_default();
            Ok(simulate_card_payment(&otp))
        }
        PaymentMethod::Cod | PaymentMethod::NetBanking => Ok(true),
    }
}

/// The simulated UPI switch approves any well-formed PIN.
fn simulate_upi_payment(pin: &str) -> bool {
    is_six_digit_code(pin)
}

/// The simulated card issuer approves when the OTP is six digits.
fn simulate_card_payment(otp: &str) -> bool {
    is_six_digit_code(otp)
}
