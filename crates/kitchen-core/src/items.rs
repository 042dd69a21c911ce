//! 訂單品項解析
//!
//! 訂單的 `items` 欄位可能是陣列、JSON 字串、null 或空字串。
//! [`parse_items`] 是全函數：任何異常都只記錄警告並回傳空清單，不會中斷呼叫端。

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 訂單品項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// 產品名稱（與產品目錄的連結鍵）
    pub product_name: String,

    /// 數量（解析後保證 > 0）
    pub quantity: i64,

    /// 單價
    #[serde(default)]
    pub unit_price: Decimal,

    /// 是否為贈品
    #[serde(default)]
    pub is_gift: bool,
}

impl LineItem {
    /// 創建新的品項
    pub fn new(product_name: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price: Decimal::ZERO,
            is_gift: false,
        }
    }

    /// 建構器模式：設置單價
    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// 建構器模式：標記為贈品
    pub fn as_gift(mut self) -> Self {
        self.is_gift = true;
        self
    }

    /// 正規化後的產品鍵
    pub fn key(&self) -> ProductKey {
        ProductKey::new(&self.product_name)
    }

    /// 小計
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// 正規化的產品名稱（去頭尾空白、合併空白、轉小寫）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductKey(String);

impl ProductKey {
    pub fn new(name: &str) -> Self {
        Self(normalize_product_name(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// 產品名稱正規化：trim + 合併連續空白 + 小寫
pub fn normalize_product_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 解析品項內容
///
/// - null / 空字串 / 純空白字串 → 空清單
/// - 陣列 → 逐筆解析
/// - 非空字串 → 當作 JSON 解析；解析失敗或不是陣列 → 空清單
///
/// 數量缺漏、為零或負數的品項會被靜默丟棄。
pub fn parse_items(payload: &Value) -> Vec<LineItem> {
    match payload {
        Value::Null => Vec::new(),
        Value::Array(entries) => parse_entries(entries),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(entries)) => parse_entries(&entries),
                Ok(other) => {
                    tracing::warn!(kind = value_kind(&other), "品項字串不是陣列，視為空清單");
                    Vec::new()
                }
                Err(err) => {
                    tracing::warn!(error = %err, "品項 JSON 解析失敗，視為空清單");
                    Vec::new()
                }
            }
        }
        other => {
            tracing::warn!(kind = value_kind(other), "無法識別的品項格式，視為空清單");
            Vec::new()
        }
    }
}

/// serde 欄位適配器，讓訂單反序列化時統一走 [`parse_items`]
pub fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let payload = Option::<Value>::deserialize(deserializer)?;
    Ok(payload.map(|value| parse_items(&value)).unwrap_or_default())
}

fn parse_entries(entries: &[Value]) -> Vec<LineItem> {
    let items: Vec<LineItem> = entries.iter().filter_map(parse_entry).collect();
    if items.len() < entries.len() {
        tracing::debug!(
            "品項解析：{} 筆中丟棄 {} 筆",
            entries.len(),
            entries.len() - items.len()
        );
    }
    items
}

fn parse_entry(entry: &Value) -> Option<LineItem> {
    let fields = entry.as_object()?;

    let product_name = fields.get("product_name")?.as_str()?;
    if product_name.trim().is_empty() {
        return None;
    }

    let quantity = quantity_field(fields)?;
    if quantity <= 0 {
        return None;
    }

    Some(LineItem {
        product_name: product_name.to_string(),
        quantity,
        unit_price: fields.get("unit_price").and_then(decimal_value).unwrap_or_default(),
        is_gift: fields.get("is_gift").map(flag_value).unwrap_or(false),
    })
}

fn quantity_field(fields: &Map<String, Value>) -> Option<i64> {
    match fields.get("quantity")? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn decimal_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Decimal::from(i)),
            None => n.as_f64().and_then(Decimal::from_f64),
        },
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|i| i != 0),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
