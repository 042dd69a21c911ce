//! 生產計劃模型

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::items::ProductKey;
use crate::order::OrderId;
use crate::{PlanError, Result};

/// 生產計劃項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// 產品名稱
    pub product_name: String,

    /// 排定生產數量
    pub scheduled_quantity: i64,
}

impl PlanEntry {
    pub fn new(product_name: impl Into<String>, scheduled_quantity: i64) -> Self {
        Self {
            product_name: product_name.into(),
            scheduled_quantity,
        }
    }
}

/// 生產計劃（以生產日期為鍵）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// 生產日期
    pub manufacturing_date: NaiveDate,

    /// 對應配送日期
    pub delivery_date: Option<NaiveDate>,

    /// 計劃項目
    pub entries: Vec<PlanEntry>,
}

impl ProductionPlan {
    /// 創建空計劃
    pub fn empty(manufacturing_date: NaiveDate) -> Self {
        Self {
            manufacturing_date,
            delivery_date: None,
            entries: Vec::new(),
        }
    }

    /// 建構器模式：設置配送日期
    pub fn with_delivery_date(mut self, delivery_date: Option<NaiveDate>) -> Self {
        self.delivery_date = delivery_date;
        self
    }

    /// 建構器模式：設置項目
    pub fn with_entries(mut self, entries: Vec<PlanEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 指定產品的排定數量（名稱不分大小寫）
    pub fn quantity_for(&self, product_name: &str) -> i64 {
        let key = ProductKey::new(product_name);
        self.entries
            .iter()
            .filter(|entry| ProductKey::new(&entry.product_name) == key)
            .map(|entry| entry.scheduled_quantity)
            .sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.entries.iter().map(|entry| entry.scheduled_quantity).sum()
    }
}

/// 生產狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    /// 待生產
    #[default]
    Pending,
    /// 已完成
    Completed,
}

impl ProductionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        *self == Self::Completed
    }
}

impl std::str::FromStr for ProductionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!("未知的生產狀態: {other}")),
        }
    }
}

/// 生產狀態記錄（生產日期 × 產品）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub product_name: String,
    pub status: ProductionStatus,
}

/// 已驗證的排產確認請求
///
/// 只能經由 [`CommitRequest::new`] 建立，因此任何持有此值的呼叫端
/// 都已通過日期與訂單選取的檢查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    manufacturing_date: NaiveDate,
    delivery_date: NaiveDate,
    order_ids: Vec<OrderId>,
    quantities: BTreeMap<String, i64>,
}

impl CommitRequest {
    /// 驗證並建立確認請求
    pub fn new(
        manufacturing_date: Option<NaiveDate>,
        delivery_date: Option<NaiveDate>,
        order_ids: Vec<OrderId>,
        quantities: BTreeMap<String, i64>,
    ) -> Result<Self> {
        let manufacturing_date = manufacturing_date.ok_or(PlanError::MissingManufacturingDate)?;
        let delivery_date = delivery_date.ok_or(PlanError::MissingDeliveryDate)?;

        if order_ids.is_empty() {
            return Err(PlanError::EmptySelection);
        }

        if let Some((product, &quantity)) = quantities.iter().find(|(_, q)| **q < 0) {
            return Err(PlanError::InvalidQuantity {
                product: product.clone(),
                quantity,
            });
        }

        Ok(Self {
            manufacturing_date,
            delivery_date,
            order_ids,
            quantities,
        })
    }

    pub fn manufacturing_date(&self) -> NaiveDate {
        self.manufacturing_date
    }

    pub fn delivery_date(&self) -> NaiveDate {
        self.delivery_date
    }

    pub fn order_ids(&self) -> &[OrderId] {
        &self.order_ids
    }

    pub fn quantities(&self) -> &BTreeMap<String, i64> {
        &self.quantities
    }

    /// 轉為計劃（該日期的完整期望狀態）
    pub fn to_plan(&self) -> ProductionPlan {
        ProductionPlan::empty(self.manufacturing_date)
            .with_delivery_date(Some(self.delivery_date))
            .with_entries(
                self.quantities
                    .iter()
                    .map(|(name, &qty)| PlanEntry::new(name.clone(), qty))
                    .collect(),
            )
    }
}

/// 排產確認回應
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// 寫入的產品筆數
    #[serde(default)]
    pub inserted_products: u32,

    /// 排程ID
    #[serde(default, rename = "scheduleId", skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    fn quantities() -> BTreeMap<String, i64> {
        BTreeMap::from([("Milk Tea".to_string(), 4), ("Green Tea".to_string(), 2)])
    }

    #[test]
    fn test_commit_request_validation() {
        assert!(matches!(
            CommitRequest::new(None, Some(date(2)), vec![1], quantities()),
            Err(PlanError::MissingManufacturingDate)
        ));
        assert!(matches!(
            CommitRequest::new(Some(date(1)), None, vec![1], quantities()),
            Err(PlanError::MissingDeliveryDate)
        ));
        assert!(matches!(
            CommitRequest::new(Some(date(1)), Some(date(2)), vec![], quantities()),
            Err(PlanError::EmptySelection)
        ));

        let mut negative = quantities();
        negative.insert("Oolong".to_string(), -1);
        let err = CommitRequest::new(Some(date(1)), Some(date(2)), vec![1], negative).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_commit_request_to_plan() {
        let request = CommitRequest::new(Some(date(1)), Some(date(2)), vec![1, 2], quantities()).unwrap();
        let plan = request.to_plan();

        assert_eq!(plan.manufacturing_date, date(1));
        assert_eq!(plan.delivery_date, Some(date(2)));
        assert_eq!(plan.quantity_for("milk tea"), 4);
        assert_eq!(plan.total_quantity(), 6);
    }

    #[test]
    fn test_production_status_parse() {
        assert_eq!("Completed".parse::<ProductionStatus>(), Ok(ProductionStatus::Completed));
        assert!("done".parse::<ProductionStatus>().is_err());
    }
}
