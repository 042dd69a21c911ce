//! # Kitchen Core
//!
//! 排產核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod inventory;
pub mod items;
pub mod order;
pub mod plan;

// Re-export 主要類型
pub use calendar::{FixedClock, PoolWindow, ReferenceClock, SystemClock};
pub use config::{ClientConfig, ConfigError, DeploymentProfile};
pub use inventory::{AvailabilityRecord, AvailabilitySnapshot, Product};
pub use items::{normalize_product_name, parse_items, LineItem, ProductKey};
pub use order::{Order, OrderId, ShippingStatus};
pub use plan::{CommitReceipt, CommitRequest, PlanEntry, ProductionPlan, ProductionStatus, StatusEntry};

/// 排產錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("缺少生產日期")]
    MissingManufacturingDate,

    #[error("缺少配送日期")]
    MissingDeliveryDate,

    #[error("未選擇任何訂單")]
    EmptySelection,

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("無效的生產數量: {product} = {quantity}")]
    InvalidQuantity { product: String, quantity: i64 },

    #[error("訂單 {order_id} 無法出貨: {reason}")]
    NotShippable { order_id: OrderId, reason: String },

    #[error("確認碼不符，已取消全部刪除")]
    ConfirmationMismatch,
}

impl PlanError {
    /// 是否為輸入驗證錯誤（在任何網路請求之前就會被拒絕）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingManufacturingDate
                | Self::MissingDeliveryDate
                | Self::EmptySelection
                | Self::InvalidDate(_)
                | Self::InvalidQuantity { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
