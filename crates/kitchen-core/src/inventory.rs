//! 庫存模型

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::items::ProductKey;

/// 產品（由產品目錄擁有，排產核心唯讀使用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: i64,

    /// 產品名稱（連結鍵）
    pub name: String,

    /// 售價
    #[serde(default)]
    pub price: Decimal,

    /// 現有庫存
    #[serde(default)]
    pub current_stock: i64,

    /// 最低庫存
    #[serde(default)]
    pub min_stock: i64,
}

impl Product {
    /// 創建新的產品
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: Decimal::ZERO,
            current_stock: 0,
            min_stock: 0,
        }
    }

    /// 建構器模式：設置庫存
    pub fn with_stock(mut self, current_stock: i64, min_stock: i64) -> Self {
        self.current_stock = current_stock;
        self.min_stock = min_stock;
        self
    }

    pub fn key(&self) -> ProductKey {
        ProductKey::new(&self.name)
    }

    /// 檢查庫存是否低於最低庫存
    pub fn is_below_min_stock(&self) -> bool {
        self.current_stock < self.min_stock
    }
}

/// 單一產品的可用量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// 產品名稱
    pub product_name: String,

    /// 現有庫存
    pub current_stock: i64,

    /// 已承諾未出貨數量（僅供參考，不參與扣減）
    pub committed_outstanding: i64,

    /// 可用量（等於現有庫存）
    pub available: i64,
}

impl AvailabilityRecord {
    /// 創建新的可用量記錄
    ///
    /// 可用量直接取現有庫存，不扣除已承諾數量。
    pub fn new(product_name: impl Into<String>, current_stock: i64, committed_outstanding: i64) -> Self {
        Self {
            product_name: product_name.into(),
            current_stock,
            committed_outstanding,
            available: current_stock,
        }
    }

    /// 需求超出可用量的部分
    pub fn shortfall(&self, needed: i64) -> i64 {
        needed.saturating_sub(self.available).max(0)
    }
}

/// 可用量快照（以產品正規化名稱為鍵）
#[derive(Debug, Clone, Default)]
pub struct AvailabilitySnapshot {
    as_of: Option<NaiveDate>,
    records: HashMap<ProductKey, AvailabilityRecord>,
}

impl AvailabilitySnapshot {
    /// 創建空快照
    pub fn new(as_of: Option<NaiveDate>) -> Self {
        Self {
            as_of,
            records: HashMap::new(),
        }
    }

    /// 由記錄建立快照；同名產品以後者為準
    pub fn from_records(
        as_of: Option<NaiveDate>,
        records: impl IntoIterator<Item = AvailabilityRecord>,
    ) -> Self {
        let mut snapshot = Self::new(as_of);
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn insert(&mut self, record: AvailabilityRecord) {
        self.records.insert(ProductKey::new(&record.product_name), record);
    }

    pub fn get(&self, product_name: &str) -> Option<&AvailabilityRecord> {
        self.records.get(&ProductKey::new(product_name))
    }

    pub fn get_by_key(&self, key: &ProductKey) -> Option<&AvailabilityRecord> {
        self.records.get(key)
    }

    /// 可用量；快照中沒有的產品視為 0
    pub fn available(&self, product_name: &str) -> i64 {
        self.get(product_name).map_or(0, |r| r.available)
    }

    pub fn available_by_key(&self, key: &ProductKey) -> i64 {
        self.get_by_key(key).map_or(0, |r| r.available)
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &AvailabilityRecord> {
        self.records.values()
    }
}
