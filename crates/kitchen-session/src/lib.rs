//! # Kitchen Session
//!
//! 排產作業流程：載入訂單池、選取訂單、預覽淨需求、確認排產，
//! 以及生產狀態與出貨的操作。
//!
//! 選取與手動調整只存在於 [`SchedulingSession`] 之中，不會被保存。

pub mod availability;
pub mod committer;
pub mod pool;
pub mod selection;
pub mod session;
pub mod shipping;
pub mod status;

pub use committer::{PlanCommitter, PurgeAllCommand};
pub use pool::{DayOrders, OrderPool};
pub use selection::OrderSelection;
pub use session::SchedulingSession;
pub use shipping::ShippingDesk;
pub use status::StatusTracker;

use kitchen_core::PlanError;
use kitchen_store::StoreError;
use thiserror::Error;

/// 作業流程錯誤
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// 是否在送出任何請求之前就被拒絕
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Plan(err) if err.is_validation())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
