#[cfg(test)]
pub mod tests {
    use std::collections::HashMap;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use crate::catalog_client::CatalogItem;
    use crate::routes::order::schemas::{CreateOrderRequest, OrderLineItem};
    use crate::schemas::{StaffAccount, StaffRole};

    pub fn get_dummy_staff_account(role: StaffRole) -> StaffAccount {
        StaffAccount {
            id: 11,
            restaurant_id: 1,
            role,
        }
    }

    pub fn get_dummy_line_items() -> Vec<OrderLineItem> {
        vec![
            OrderLineItem {
                menu_item_id: 7,
                quantity: 2,
                unit_price: BigDecimal::from_str("5.00").unwrap(),
                notes: None,
            },
            OrderLineItem {
                menu_item_id: 9,
                quantity: 1,
                unit_price: BigDecimal::from_str("3.50").unwrap(),
                notes: Some("no onions".to_owned()),
            },
        ]
    }

    pub fn get_dummy_catalog() -> HashMap<i64, CatalogItem> {
        HashMap::from([
            (
                7,
                CatalogItem {
                    id: 7,
                    name: "Tacos al pastor".to_owned(),
                    price: BigDecimal::from_str("5.00").unwrap(),
                    available: true,
                },
            ),
            (
                9,
                CatalogItem {
                    id: 9,
                    name: "Horchata".to_owned(),
                    price: BigDecimal::from_str("3.50").unwrap(),
                    available: true,
                },
            ),
        ])
    }

    pub fn get_dummy_create_order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            restaurant_id: 1,
            customer_name: "Ana".to_owned(),
            customer_phone: Some("+52 55 1234 5678".to_owned()),
            customer_email: None,
            items: get_dummy_line_items(),
            total_amount: BigDecimal::from_str("13.50").unwrap(),
        }
    }

    #[test]
    fn only_admins_and_managers_touch_money() {
        assert!(get_dummy_staff_account(StaffRole::Admin).role.can_manage());
        assert!(get_dummy_staff_account(StaffRole::Manager).role.can_manage());
        assert!(!get_dummy_staff_account(StaffRole::Staff).role.can_manage());
    }
}
