use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::schemas::{
    calculate_order_total, validate_items_against_catalog, OrderLineItem, OrderStatusType,
};
use crate::constants::TOTAL_EPSILON;
use crate::tests::tests::{
    get_dummy_catalog, get_dummy_create_order_request, get_dummy_line_items,
};

#[test]
fn workflow_advances_one_step_at_a_time() {
    use OrderStatusType::*;
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Preparing));
    assert!(Preparing.can_transition_to(Ready));
    assert!(Ready.can_transition_to(Delivered));

    // No stage skipping, no going backward.
    assert!(!Pending.can_transition_to(Ready));
    assert!(!Pending.can_transition_to(Delivered));
    assert!(!Confirmed.can_transition_to(Delivered));
    assert!(!Preparing.can_transition_to(Confirmed));
    assert!(!Ready.can_transition_to(Pending));
}

#[test]
fn terminal_orders_accept_no_transition() {
    use OrderStatusType::*;
    for next in [Pending, Confirmed, Preparing, Ready, Delivered, Cancelled] {
        assert!(!Delivered.can_transition_to(next));
        assert!(!Cancelled.can_transition_to(next));
    }
    assert!(Delivered.is_terminal());
    assert!(Cancelled.is_terminal());
}

#[test]
fn cancel_is_legal_from_every_non_terminal_status() {
    use OrderStatusType::*;
    for status in [Pending, Confirmed, Preparing, Ready] {
        assert!(status.can_transition_to(Cancelled));
    }
}

#[test]
fn total_is_summed_across_lines() {
    let total = calculate_order_total(&get_dummy_line_items());
    // 2 x 5.00 + 1 x 3.50
    assert_eq!(total, BigDecimal::from_str("13.50").unwrap());
}

#[test]
fn rounding_happens_once_at_the_end() {
    let items = vec![OrderLineItem {
        menu_item_id: 1,
        quantity: 3,
        unit_price: BigDecimal::from_str("0.335").unwrap(),
        notes: None,
    }];
    // Per-line rounding would yield 0.34 x 3 = 1.02; summing first gives
    // 1.005, which rounds to 1.01.
    assert_eq!(
        calculate_order_total(&items),
        BigDecimal::from_str("1.01").unwrap()
    );
}

#[test]
fn validation_reports_every_violation_at_once() {
    let mut request = get_dummy_create_order_request();
    request.customer_name = "  ".to_owned();
    request.customer_phone = Some("not-a-phone!!".to_owned());
    request.items[0].quantity = 0;

    let violations = request.validate();
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().any(|v| v.contains("Customer name")));
    assert!(violations.iter().any(|v| v.contains("menu item 7")));
    assert!(violations.iter().any(|v| v.contains("Phone number")));
}

#[test]
fn a_well_formed_order_passes_validation() {
    let request = get_dummy_create_order_request();
    assert!(request.validate().is_empty());

    let catalog = get_dummy_catalog();
    assert!(validate_items_against_catalog(&request.items, &catalog).is_empty());
    assert_eq!(calculate_order_total(&request.items), request.total_amount);
}

#[test]
fn empty_cart_is_rejected() {
    let mut request = get_dummy_create_order_request();
    request.items.clear();
    let violations = request.validate();
    assert!(violations.iter().any(|v| v.contains("at least one line item")));
}

#[test]
fn stale_cart_price_is_named_in_the_mismatch_report() {
    let items = get_dummy_line_items();
    let mut catalog = get_dummy_catalog();
    // The kitchen bumped the price after the cart was built.
    catalog.get_mut(&7).unwrap().price = BigDecimal::from_str("6.00").unwrap();

    let mismatches = validate_items_against_catalog(&items, &catalog);
    assert_eq!(mismatches.len(), 1);
    assert!(mismatches[0].contains("menu item 7"));
    assert!(mismatches[0].contains("6.00"));
}

#[test]
fn unavailable_and_unknown_items_are_both_reported() {
    let mut items = get_dummy_line_items();
    items.push(OrderLineItem {
        menu_item_id: 99,
        quantity: 1,
        unit_price: BigDecimal::from_str("2.00").unwrap(),
        notes: None,
    });
    let mut catalog = get_dummy_catalog();
    catalog.get_mut(&9).unwrap().available = false;

    let mismatches = validate_items_against_catalog(&items, &catalog);
    assert_eq!(mismatches.len(), 2);
    assert!(mismatches.iter().any(|m| m.contains("Horchata")));
    assert!(mismatches.iter().any(|m| m.contains("99")));
}

#[test]
fn declared_total_is_held_to_a_one_cent_tolerance() {
    let calculated = BigDecimal::from_str("10.00").unwrap();

    let within = BigDecimal::from_str("10.01").unwrap();
    assert!((&calculated - &within).abs() <= *TOTAL_EPSILON);

    let beyond = BigDecimal::from_str("10.02").unwrap();
    assert!((&calculated - &beyond).abs() > *TOTAL_EPSILON);
}
