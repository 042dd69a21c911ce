//! 訂單模型

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::items::{deserialize_items, LineItem};
use crate::{PlanError, Result};

/// 訂單ID
pub type OrderId = i64;

/// 出貨狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingStatus {
    /// 待出貨
    #[default]
    Pending,
    /// 已出貨
    Shipped,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
        }
    }

    /// 狀態轉移
    ///
    /// - pending → shipped：僅在 `shippable` 為 true 時允許
    /// - shipped → pending：一律允許（更正用）
    /// - 相同狀態：不變
    pub fn transition(
        self,
        target: ShippingStatus,
        order_id: OrderId,
        shippable: bool,
        reason: &str,
    ) -> Result<ShippingStatus> {
        match (self, target) {
            (Self::Pending, Self::Shipped) if !shippable => Err(PlanError::NotShippable {
                order_id,
                reason: reason.to_string(),
            }),
            (_, target) => Ok(target),
        }
    }
}

/// 客戶訂單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    pub id: OrderId,

    /// 訂單日期
    pub order_date: NaiveDate,

    /// 配送日期
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,

    /// 來源通路（如電商平台標記）
    #[serde(default)]
    pub source: Option<String>,

    /// 客戶ID
    #[serde(default)]
    pub customer_id: Option<i64>,

    /// 客戶名稱
    #[serde(default)]
    pub customer_name: Option<String>,

    /// 下單時間
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,

    /// 品項（可能以 JSON 字串或陣列傳入）
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<LineItem>,

    /// 出貨狀態
    #[serde(default, deserialize_with = "deserialize_shipping_status")]
    pub shipping_status: ShippingStatus,
}

impl Order {
    /// 創建新的訂單
    pub fn new(id: OrderId, order_date: NaiveDate) -> Self {
        Self {
            id,
            order_date,
            delivery_date: None,
            source: None,
            customer_id: None,
            customer_name: None,
            created_at: None,
            items: Vec::new(),
            shipping_status: ShippingStatus::Pending,
        }
    }

    /// 建構器模式：設置品項
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// 建構器模式：添加品項
    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// 建構器模式：設置配送日期
    pub fn with_delivery_date(mut self, delivery_date: NaiveDate) -> Self {
        self.delivery_date = Some(delivery_date);
        self
    }

    /// 建構器模式：設置下單時間
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// 檢查是否已出貨
    pub fn is_shipped(&self) -> bool {
        self.shipping_status == ShippingStatus::Shipped
    }

    /// 品項總數量
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// 依下單時間遞增排序；時間相同（或皆缺）時保持到達順序
pub fn sort_by_arrival(orders: &mut [Order]) {
    orders.sort_by_key(|order| (order.created_at.is_none(), order.created_at));
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

fn deserialize_shipping_status<'de, D>(deserializer: D) -> std::result::Result<ShippingStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        Some(s) if s.eq_ignore_ascii_case("shipped") => ShippingStatus::Shipped,
        _ => ShippingStatus::Pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[test]
    fn test_deserialize_order_with_string_items() {
        let payload = json!({
            "id": 17,
            "order_date": "2025-11-03",
            "source": "marketplace",
            "created_at": "2025-11-02 09:15:00",
            "items": "[{\"product_name\": \"Milk Tea\", \"quantity\": 2}]",
            "shipping_status": null
        });

        let order: Order = serde_json::from_value(payload).unwrap();

        assert_eq!(order.id, 17);
        assert_eq!(order.order_date, date(3));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_quantity(), 2);
        assert_eq!(order.shipping_status, ShippingStatus::Pending);
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_deserialize_order_with_malformed_items() {
        let payload = json!({"id": 1, "order_date": "2025-11-03", "items": "{oops"});
        let order: Order = serde_json::from_value(payload).unwrap();
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_sort_by_arrival_keeps_ties_in_order() {
        let early = NaiveDateTime::parse_from_str("2025-11-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let late = NaiveDateTime::parse_from_str("2025-11-01 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

        let mut orders = vec![
            Order::new(1, date(1)).with_created_at(late),
            Order::new(2, date(1)).with_created_at(early),
            Order::new(3, date(1)).with_created_at(late),
            Order::new(4, date(1)),
        ];
        sort_by_arrival(&mut orders);

        let ids: Vec<_> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_shipping_transitions() {
        let pending = ShippingStatus::Pending;

        assert!(pending.transition(ShippingStatus::Shipped, 1, false, "庫存不足").is_err());
        assert_eq!(
            pending.transition(ShippingStatus::Shipped, 1, true, "").unwrap(),
            ShippingStatus::Shipped
        );
        // 退回待出貨一律允許
        assert_eq!(
            ShippingStatus::Shipped
                .transition(ShippingStatus::Pending, 1, false, "")
                .unwrap(),
            ShippingStatus::Pending
        );
    }
}
