//! API 請求與回應格式

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kitchen_core::{AvailabilityRecord, Order, OrderId, PlanEntry, ProductionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET dates-with-orders` 的單筆
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// `GET unscheduled-orders`
#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<Value>,
}

/// `GET availability` 的單筆
#[derive(Debug, Deserialize)]
pub struct AvailabilityRow {
    pub product_name: String,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default)]
    pub committed_outstanding: i64,
}

impl From<AvailabilityRow> for AvailabilityRecord {
    fn from(row: AvailabilityRow) -> Self {
        AvailabilityRecord::new(row.product_name, row.current_stock, row.committed_outstanding)
    }
}

/// `GET availability`
#[derive(Debug, Deserialize)]
pub struct AvailabilityEnvelope {
    #[serde(default)]
    pub availability: Vec<AvailabilityRow>,
}

/// `GET production-plan`
#[derive(Debug, Deserialize)]
pub struct PlanEnvelope {
    #[serde(default)]
    pub production_plan: Vec<PlanEntry>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// `GET production-status`
#[derive(Debug, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub statuses: Vec<kitchen_core::StatusEntry>,
}

/// `POST confirm-schedule`
#[derive(Debug, Serialize)]
pub struct ConfirmScheduleBody<'a> {
    pub production_date: NaiveDate,
    pub delivery_date: NaiveDate,
    #[serde(rename = "orderIds")]
    pub order_ids: &'a [OrderId],
    #[serde(rename = "manufacturingQuantities")]
    pub manufacturing_quantities: &'a BTreeMap<String, i64>,
}

/// `DELETE production-plan/all`
#[derive(Debug, Deserialize)]
pub struct DeleteAllResponse {
    #[serde(default)]
    pub deleted_count: u64,
}

/// 出貨狀態 / 生產狀態更新
#[derive(Debug, Serialize)]
pub struct StatusBody<'a> {
    pub status: &'a str,
}

impl<'a> StatusBody<'a> {
    pub fn production(status: ProductionStatus) -> Self {
        Self { status: status.as_str() }
    }
}

/// 逐筆解碼訂單；格式錯誤的訂單略過，缺少訂單日期者以查詢日期補上
pub fn decode_orders(rows: Vec<Value>, date: NaiveDate) -> Vec<Order> {
    rows.into_iter()
        .filter_map(|mut row| {
            if let Some(fields) = row.as_object_mut() {
                if fields.get("order_date").map_or(true, Value::is_null) {
                    fields.insert("order_date".to_string(), Value::String(date.to_string()));
                }
            }
            match serde_json::from_value::<Order>(row) {
                Ok(order) => Some(order),
                Err(err) => {
                    tracing::warn!(%date, error = %err, "略過格式錯誤的訂單");
                    None
                }
            }
        })
        .collect()
}

/// 從錯誤回應中取出伺服器訊息（`error` 或 `message` 欄位）
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|field| value.get(field)?.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
