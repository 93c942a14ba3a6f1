//! Property-based tests for totals, ids and payment predicates.
//!
//! These tests use proptest to check invariants across a wide range of inputs.

use chrono::{TimeZone, Utc};
use farmlink_api::{
    common::is_six_digit_code,
    models::{cart_total, CartItem, CART_OUT_OF_RANGE, GST_MULTIPLIER},
    services::orders::{new_order_id, new_transaction_id},
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

// Strategies for generating test data
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000).prop_map(Decimal::from)
}

fn cart_strategy() -> impl Strategy<Value = Vec<CartItem>> {
    prop::collection::vec(
        (price_strategy(), quantity_strategy()).prop_map(|(p, q)| CartItem::new(p, q)),
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn total_is_subtotal_with_gst_rounded(cart in cart_strategy()) {
        let subtotal: Decimal = cart.iter().map(|item| item.price * item.quantity).sum();
        let expected = (subtotal * GST_MULTIPLIER)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let total = cart_total(&cart).unwrap();
        prop_assert_eq!(total, expected);
        prop_assert!(total.scale() <= 2);
        prop_assert!(total >= Decimal::ZERO);
    }

    #[test]
    fn total_does_not_depend_on_line_order(mut cart in cart_strategy()) {
        let forward = cart_total(&cart).unwrap();
        cart.reverse();
        prop_assert_eq!(forward, cart_total(&cart).unwrap());
    }

    #[test]
    fn extreme_lines_total_or_reject_without_panicking(
        (lo, mid, hi) in (any::<u32>(), any::<u32>(), any::<u32>()),
        negative in any::<bool>(),
        quantity in any::<i64>(),
    ) {
        let item = CartItem::new(
            Decimal::from_parts(lo, mid, hi, negative, 0),
            Decimal::from(quantity),
        );
        match cart_total(&[item.clone(), item]) {
            Ok(total) => prop_assert!(total.scale() <= 2),
            Err(err) => prop_assert_eq!(
                err.to_string(),
                format!("Bad request: {}", CART_OUT_OF_RANGE)
            ),
        }
    }

    #[test]
    fn transaction_ids_match_format(seed in any::<u64>()) {
        let pattern = Regex::new(r"^TXN\d{8}$").unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let id = new_transaction_id(&mut rng);
        prop_assert!(pattern.is_match(&id), "bad transaction id {}", id);
    }

    #[test]
    fn order_ids_encode_the_creation_second(secs in 0i64..4_000_000_000) {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        prop_assert_eq!(new_order_id(at), format!("FARM{}", secs));
    }

    #[test]
    fn six_digit_codes_are_accepted(code in "[0-9]{6}") {
        prop_assert!(is_six_digit_code(&code));
    }

    #[test]
    fn other_lengths_are_rejected(code in "[0-9]{0,5}|[0-9]{7,12}") {
        prop_assert!(!is_six_digit_code(&code));
    }

    #[test]
    fn non_digits_are_rejected(prefix in "[0-9]{0,5}", bad in "[^0-9]") {
        let code = format!("{}{}", prefix, bad);
        prop_assert!(!is_six_digit_code(&code));
    }
}
