pub mod order;

pub use order::{
    cart_total, CartItem, Customer, Order, OrderStatus, CART_OUT_OF_RANGE, GST_MULTIPLIER,
};
