//! 出貨檢查
//!
//! 每次呼叫都以當下的可用量快照重新計算，不做快取。

use kitchen_core::{AvailabilitySnapshot, Order, OrderId};

/// 庫存不足的產品
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    pub product_name: String,
    /// 現有
    pub have: i64,
    /// 需要
    pub need: i64,
}

/// 出貨檢查結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipCheck {
    pub order_id: OrderId,
    pub shippable: bool,
    pub shortages: Vec<Shortage>,
}

impl ShipCheck {
    /// 可讀的原因說明
    pub fn reason(&self) -> String {
        if self.shippable {
            return "所有品項庫存充足".to_string();
        }
        let details: Vec<String> = self
            .shortages
            .iter()
            .map(|s| format!("{}（現有 {} / 需要 {}）", s.product_name, s.have, s.need))
            .collect();
        format!("庫存不足: {}", details.join("、"))
    }
}

/// 出貨檢查器
pub struct ShippingGate;

impl ShippingGate {
    /// 檢查訂單是否可以出貨
    ///
    /// 逐一比對品項：任一品項的數量超過該產品的可用量即不可出貨。
    pub fn check(order: &Order, availability: &AvailabilitySnapshot) -> ShipCheck {
        let shortages: Vec<Shortage> = order
            .items
            .iter()
            .filter(|item| item.quantity > 0)
            .filter_map(|item| {
                let record = availability.get_by_key(&item.key());
                let missing = record.map_or(item.quantity, |r| r.shortfall(item.quantity));
                let have = record.map_or(0, |r| r.available);
                (missing > 0).then(|| Shortage {
                    product_name: item.product_name.clone(),
                    have,
                    need: item.quantity,
                })
            })
            .collect();

        if !shortages.is_empty() {
            tracing::debug!("訂單 {} 有 {} 項庫存不足", order.id, shortages.len());
        }

        ShipCheck {
            order_id: order.id,
            shippable: shortages.is_empty(),
            shortages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kitchen_core::{AvailabilityRecord, LineItem};

    fn order(items: Vec<LineItem>) -> Order {
        Order::new(7, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()).with_items(items)
    }

    fn snapshot() -> AvailabilitySnapshot {
        AvailabilitySnapshot::from_records(
            None,
            vec![
                AvailabilityRecord::new("Milk Tea", 4, 10),
                AvailabilityRecord::new("Green Tea", 2, 0),
            ],
        )
    }

    #[test]
    fn test_all_items_covered() {
        let check = ShippingGate::check(
            &order(vec![LineItem::new(" milk tea", 4), LineItem::new("Green Tea", 2)]),
            &snapshot(),
        );

        assert!(check.shippable);
        assert!(check.shortages.is_empty());
    }

    #[test]
    fn test_shortage_reported() {
        let check = ShippingGate::check(
            &order(vec![
                LineItem::new("Milk Tea", 5),
                LineItem::new("Green Tea", 1),
                LineItem::new("Oolong", 1),
            ]),
            &snapshot(),
        );

        assert!(!check.shippable);
        assert_eq!(
            check.shortages,
            vec![
                Shortage { product_name: "Milk Tea".to_string(), have: 4, need: 5 },
                Shortage { product_name: "Oolong".to_string(), have: 0, need: 1 },
            ]
        );
        assert!(check.reason().contains("Oolong"));
    }

    #[test]
    fn test_empty_order_is_shippable() {
        assert!(ShippingGate::check(&order(vec![]), &snapshot()).shippable);
    }
}
