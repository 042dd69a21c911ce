//! # Kitchen
//!
//! 食品零售的每日排產系統：從未排產訂單池彙總需求，扣除現有庫存後
//! 得出生產數量，確認後寫入生產計劃，並追蹤生產狀態與出貨。
//!
//! ## 模塊
//!
//! - [`model`]：訂單、品項、庫存、計劃等資料模型
//! - [`calc`]：需求彙總、淨需求、出貨檢查
//! - [`store`]：資料服務介面與實作
//! - [`session`]：排產作業流程

pub mod logging;

pub use kitchen_calc as calc;
pub use kitchen_core as model;
pub use kitchen_session as session;
pub use kitchen_store as store;

pub use kitchen_calc::{NettingReport, ShipCheck};
pub use kitchen_core::{ClientConfig, FixedClock, Order, ReferenceClock, SystemClock};
pub use kitchen_session::{SchedulingSession, SessionError};
pub use kitchen_store::{HttpStore, InMemoryStore, ProductionStore};
