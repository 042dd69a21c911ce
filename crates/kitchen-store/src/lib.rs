//! # Kitchen Store
//!
//! 排產核心與遠端資料服務之間的介面。
//!
//! - [`ProductionStore`]：所有讀寫操作的抽象
//! - [`HttpStore`]：以 JSON over HTTP 呼叫後端 API
//! - [`InMemoryStore`]：記憶體實作，供測試與離線使用

pub mod http;
pub mod memory;
pub mod wire;

pub use http::HttpStore;
pub use memory::InMemoryStore;
pub use wire::DateCount;

use async_trait::async_trait;
use chrono::NaiveDate;
use kitchen_core::{
    AvailabilityRecord, CommitReceipt, CommitRequest, Order, OrderId, Product, ProductionPlan,
    ProductionStatus, ShippingStatus, StatusEntry,
};
use thiserror::Error;

/// 儲存服務錯誤
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP 請求失敗
    #[error("HTTP 錯誤: {0}")]
    Http(#[from] reqwest::Error),

    /// 伺服器回傳非 2xx
    #[error("{message}（HTTP {status}）")]
    Api { status: u16, message: String },

    /// JSON 解析失敗
    #[error("回應解析失敗: {0}")]
    Parse(#[from] serde_json::Error),

    /// 資源不存在
    #[error("找不到: {0}")]
    NotFound(String),

    /// API 位址無效
    #[error("無效的 API 位址: {0}")]
    InvalidUrl(String),

    /// 服務暫時無法使用
    #[error("服務無法使用: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// 伺服器未提供訊息時的通用說明
    pub fn generic(status: u16) -> Self {
        Self::Api {
            status,
            message: "請求失敗，請稍後再試".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// 排產資料服務
///
/// 讀取路徑的失敗由呼叫端決定是否降級；寫入路徑的失敗必須原樣回報。
#[async_trait]
pub trait ProductionStore: Send + Sync {
    /// 有訂單的日期與筆數
    async fn dates_with_orders(&self) -> Result<Vec<DateCount>>;

    /// 指定日期尚未排產的訂單
    async fn unscheduled_orders(&self, date: NaiveDate) -> Result<Vec<Order>>;

    /// 單一訂單
    async fn order(&self, id: OrderId) -> Result<Order>;

    /// 可用量
    async fn availability(&self, as_of: Option<NaiveDate>) -> Result<Vec<AvailabilityRecord>>;

    /// 指定生產日期的計劃
    async fn production_plan(&self, date: NaiveDate) -> Result<ProductionPlan>;

    /// 指定生產日期的生產狀態
    async fn production_statuses(&self, date: NaiveDate) -> Result<Vec<StatusEntry>>;

    /// 產品目錄
    async fn products(&self) -> Result<Vec<Product>>;

    /// 確認排產（以該日期的完整期望狀態覆蓋）
    async fn confirm_schedule(&self, request: &CommitRequest) -> Result<CommitReceipt>;

    /// 刪除指定日期的計劃與生產狀態
    async fn delete_production_plan(&self, date: NaiveDate) -> Result<()>;

    /// 刪除所有計劃與生產狀態，回傳刪除筆數
    async fn delete_all_production_plans(&self) -> Result<u64>;

    /// 更新出貨狀態
    async fn set_shipping_status(&self, id: OrderId, status: ShippingStatus) -> Result<()>;

    /// 更新生產狀態
    async fn set_production_status(
        &self,
        date: NaiveDate,
        product_name: &str,
        status: ProductionStatus,
    ) -> Result<()>;
}
