//! # Kitchen Calculation Engine
//!
//! 需求彙總、淨需求計算、出貨檢查與生產進度統計

pub mod adjustment;
pub mod aggregation;
pub mod netting;
pub mod shipping;
pub mod status;

// Re-export 主要類型
pub use adjustment::{AdjustedQuantity, ManualAdjustments};
pub use aggregation::{DemandAggregator, DemandLine, DemandTotals};
pub use netting::{NetRequirement, NettingCalculator};
pub use shipping::{ShipCheck, ShippingGate, Shortage};
pub use status::{DayOverview, ProductionLine};

use std::collections::BTreeMap;

/// 淨需求計算結果
#[derive(Debug, Clone)]
pub struct NettingReport {
    /// 各產品淨需求（目錄順序，目錄外產品排在最後）
    pub requirements: Vec<NetRequirement>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,
}

impl NettingReport {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            requirements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }

    /// 指定產品的淨需求（名稱不分大小寫）
    pub fn requirement(&self, product_name: &str) -> Option<&NetRequirement> {
        let key = kitchen_core::ProductKey::new(product_name);
        self.requirements.iter().find(|r| r.key == key)
    }

    /// 最終生產數量對照表
    pub fn final_quantities(&self) -> BTreeMap<String, i64> {
        self.requirements
            .iter()
            .map(|r| (r.product_name.clone(), r.final_required))
            .collect()
    }

    /// 需提交的生產數量：數量大於零，或操作員明確調整過的產品
    pub fn committable_quantities(&self) -> BTreeMap<String, i64> {
        self.requirements
            .iter()
            .filter(|r| r.final_required > 0 || r.is_adjusted())
            .map(|r| (r.product_name.clone(), r.final_required))
            .collect()
    }

    /// 總生產數量
    pub fn total_to_manufacture(&self) -> i64 {
        self.requirements.iter().map(|r| r.final_required).sum()
    }
}

/// 排產警告
#[derive(Debug, Clone)]
pub struct PlanWarning {
    pub product_name: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(product_name: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            product_name,
            message,
            severity,
        }
    }

    pub fn info(product_name: String, message: String) -> Self {
        Self::new(product_name, message, WarningSeverity::Info)
    }

    pub fn warning(product_name: String, message: String) -> Self {
        Self::new(product_name, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
}
