//! 生產進度統計

use std::collections::HashMap;

use chrono::NaiveDate;
use kitchen_core::{ProductKey, ProductionPlan, ProductionStatus, StatusEntry};
use serde::Serialize;

/// 生產清單中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionLine {
    pub product_name: String,
    pub total_quantity: i64,
    pub pending_quantity: i64,
    pub completed_quantity: i64,
    pub status: ProductionStatus,
}

impl ProductionLine {
    /// 整筆歸入待生產或已完成其中一邊
    pub fn new(product_name: impl Into<String>, total_quantity: i64, status: ProductionStatus) -> Self {
        let (pending_quantity, completed_quantity) = if status.is_completed() {
            (0, total_quantity)
        } else {
            (total_quantity, 0)
        };
        Self {
            product_name: product_name.into(),
            total_quantity,
            pending_quantity,
            completed_quantity,
            status,
        }
    }

    /// 由計劃與狀態記錄彙總生產清單
    ///
    /// 沒有狀態記錄的產品視為待生產；只有狀態、沒有計劃數量的產品不列出。
    pub fn summarize(plan: &ProductionPlan, statuses: &[StatusEntry]) -> Vec<ProductionLine> {
        let status_map: HashMap<ProductKey, ProductionStatus> = statuses
            .iter()
            .map(|entry| (ProductKey::new(&entry.product_name), entry.status))
            .collect();

        let mut order: Vec<ProductKey> = Vec::new();
        let mut totals: HashMap<ProductKey, (String, i64)> = HashMap::new();
        for entry in &plan.entries {
            let key = ProductKey::new(&entry.product_name);
            totals
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    (entry.product_name.clone(), 0)
                })
                .1 += entry.scheduled_quantity;
        }

        order
            .into_iter()
            .filter_map(|key| {
                let (name, total) = totals.remove(&key)?;
                let status = status_map.get(&key).copied().unwrap_or_default();
                Some(ProductionLine::new(name, total, status))
            })
            .collect()
    }
}

/// 單日生產概況
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOverview {
    pub date: NaiveDate,
    pub product_count: usize,
    pub total_quantity: i64,
    pub completed_quantity: i64,
}

impl DayOverview {
    /// 無資料（或讀取失敗）的日期
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            product_count: 0,
            total_quantity: 0,
            completed_quantity: 0,
        }
    }

    pub fn from_lines(date: NaiveDate, lines: &[ProductionLine]) -> Self {
        Self {
            date,
            product_count: lines.len(),
            total_quantity: lines.iter().map(|l| l.total_quantity).sum(),
            completed_quantity: lines.iter().map(|l| l.completed_quantity).sum(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total_quantity > 0 && self.completed_quantity == self.total_quantity
    }
}
