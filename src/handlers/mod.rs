pub mod checkout;
pub mod common;
pub mod contact;
pub mod email;
pub mod health;
pub mod invoices;
pub mod orders;
pub mod pages;
pub mod payments;

use std::sync::Arc;

use crate::services::{
    checkout::CheckoutService, contact::ContactNotifier, orders::OrderService,
    orders::OrderStore, payments::PaymentSimulator,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub checkout: Arc<CheckoutService>,
    pub payments: Arc<PaymentSimulator>,
    pub contact: Arc<ContactNotifier>,
}

impl AppServices {
    /// Wires every order-facing service to the same store.
    pub fn new(store: OrderStore, contact: ContactNotifier) -> Self {
        Self {
            orders: Arc::new(OrderService::new(store.clone())),
            checkout: Arc::new(CheckoutService::new(store.clone())),
            payments: Arc::new(PaymentSimulator::new(store)),
            contact: Arc::new(contact),
        }
    }
}
